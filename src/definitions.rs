//! Item Definitions
//!
//! Loading of bundled default definitions and merging of user overrides

use std::io;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::endpoint::substitute_host;
use crate::error::{decode_utf8, Error, Result};
use crate::kind::ItemKind;

/// Extensions accepted for user definition files
pub const ALLOWED_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Item Definition
///
/// A named set of attributes describing one label or badge
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    /// Item name (unique within a set)
    pub name: String,

    /// Free-form attributes (e.g. color, description, link_url, image_url)
    pub attributes: Mapping,
}

impl ItemDefinition {
    /// Create a new definition
    pub fn new(name: impl Into<String>, attributes: Mapping) -> Self {
        Self {
            name: name.into(),
            attributes,
        }
    }

    /// Look up a string attribute
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }
}

/// Ordered set of definitions keyed by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionSet {
    items: Vec<ItemDefinition>,
}

impl DefinitionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemDefinition> {
        self.items.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ItemDefinition> {
        self.items.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.items.iter().map(|d| d.name.as_str()).collect()
    }

    /// Insert a definition, replacing a same-named entry wholesale
    ///
    /// A replaced entry keeps its position; new names are appended.
    pub fn upsert(&mut self, definition: ItemDefinition) {
        match self.items.iter_mut().find(|d| d.name == definition.name) {
            Some(existing) => *existing = definition,
            None => self.items.push(definition),
        }
    }

    /// Overlay another set on top of this one
    pub fn overlay(&mut self, other: DefinitionSet) {
        for definition in other.items {
            self.upsert(definition);
        }
    }

    /// Prefix templated attribute values with `host_url`
    fn substitute_host(&mut self, host_url: &str) {
        for definition in &mut self.items {
            let attributes = std::mem::take(&mut definition.attributes);
            definition.attributes = attributes
                .into_iter()
                .map(|(key, value)| {
                    let value = substitute_host(&value, host_url);
                    (key, value)
                })
                .collect();
        }
    }
}

impl<'a> IntoIterator for &'a DefinitionSet {
    type Item = &'a ItemDefinition;
    type IntoIter = std::slice::Iter<'a, ItemDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<ItemDefinition> for DefinitionSet {
    fn from_iter<I: IntoIterator<Item = ItemDefinition>>(iter: I) -> Self {
        let mut set = DefinitionSet::new();
        for definition in iter {
            set.upsert(definition);
        }
        set
    }
}

/// Parse a YAML document into a definition set
///
/// The document must be a mapping of name to attribute mapping. An empty
/// document yields an empty set.
///
/// # Errors
/// If the YAML is malformed or does not have the expected shape
pub fn parse_definitions(content: &str) -> Result<DefinitionSet> {
    if content.trim().is_empty() {
        return Ok(DefinitionSet::new());
    }
    let value: Value = serde_yaml::from_str(content)?;
    definitions_from_value(value)
}

fn definitions_from_value(value: Value) -> Result<DefinitionSet> {
    let mapping = match value {
        Value::Null => return Ok(DefinitionSet::new()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(Error::invalid_definition(
                "top level must be a mapping of name to attributes",
            ))
        }
    };

    let mut set = DefinitionSet::new();
    for (key, value) in mapping {
        let name = match key {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => {
                return Err(Error::invalid_definition(format!(
                    "definition names must be scalars, found {:?}",
                    other
                )))
            }
        };
        let attributes = match value {
            Value::Mapping(attributes) => attributes,
            Value::Null => Mapping::new(),
            _ => {
                return Err(Error::invalid_definition(format!(
                    "attributes of '{}' must be a mapping",
                    name
                )))
            }
        };
        set.upsert(ItemDefinition::new(name, attributes));
    }
    Ok(set)
}

/// Whether a path carries an accepted definition file extension
pub fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

/// Load a user definition file
///
/// # Errors
/// - `UnsupportedExtension` if the extension is not `.yaml` or `.yml`
/// - `DefinitionFileNotFound` if the file is missing or not readable
/// - `Read` on any other I/O failure
/// - `Parse` if the content is not UTF-8 or not YAML
/// - `InvalidDefinition` if the content is not a valid definition set
pub fn load_definition_file<P: AsRef<Path>>(path: P) -> Result<DefinitionSet> {
    let path = path.as_ref();

    if !has_allowed_extension(path) {
        return Err(Error::UnsupportedExtension(path.to_path_buf()));
    }

    let bytes = std::fs::read(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            Error::DefinitionFileNotFound(path.to_path_buf())
        }
        _ => Error::Read {
            path: path.to_path_buf(),
            source,
        },
    })?;
    let content = decode_utf8(path, bytes)?;

    if content.trim().is_empty() {
        return Ok(DefinitionSet::new());
    }
    let value: Value = serde_yaml::from_str(&content).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    definitions_from_value(value)
}

/// Bundled defaults for a kind, with host substitution applied for badges
///
/// # Errors
/// If the bundled dataset fails to parse
pub fn default_definitions(kind: ItemKind, host_url: &str) -> Result<DefinitionSet> {
    let mut defaults = parse_definitions(kind.default_definitions())?;
    if kind.substitutes_host() {
        defaults.substitute_host(host_url);
    }
    Ok(defaults)
}

/// What happened to the user override during a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideStatus {
    /// No override was given
    None,

    /// Override was parsed and merged
    Applied { path: PathBuf, count: usize },

    /// Override was ignored because of its extension
    Unsupported { path: PathBuf },
}

/// Result of a merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDefinitions {
    /// Final definitions in application order
    pub definitions: DefinitionSet,

    /// Outcome for the user override
    pub override_status: OverrideStatus,
}

/// Merge the bundled defaults for `kind` with an optional override file
///
/// Badge defaults are host-substituted before the override is applied, so
/// override values are sent as written.
///
/// # Errors
/// If the override cannot be read or parsed
pub fn merge(
    kind: ItemKind,
    host_url: &str,
    override_path: Option<&Path>,
) -> Result<MergedDefinitions> {
    let mut definitions = default_definitions(kind, host_url)?;
    tracing::debug!(kind = %kind, count = definitions.len(), "loaded default definitions");

    let override_status = match override_path {
        None => OverrideStatus::None,
        Some(path) => match load_definition_file(path) {
            Ok(custom) => {
                let count = custom.len();
                definitions.overlay(custom);
                tracing::debug!(path = %path.display(), count, "applied override definitions");
                OverrideStatus::Applied {
                    path: path.to_path_buf(),
                    count,
                }
            }
            Err(Error::UnsupportedExtension(path)) => {
                tracing::warn!(path = %path.display(), "unsupported definition file extension, using defaults");
                OverrideStatus::Unsupported { path }
            }
            Err(e) => return Err(e),
        },
    };

    Ok(MergedDefinitions {
        definitions,
        override_status,
    })
}
