//! Item Kinds
//!
//! The closed set of item categories labelx can provision

use std::fmt;

const DEFAULT_LABELS: &str = include_str!("../data/labels.yaml");
const DEFAULT_BADGES: &str = include_str!("../data/badges.yaml");

/// Kind of item being created
///
/// Determines the default dataset, the endpoint path segment and whether
/// host substitution applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Issue and merge request labels
    Label,

    /// Project or group badges
    Badge,
}

impl ItemKind {
    /// Endpoint path segment (`labels` / `badges`)
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Label => "labels",
            ItemKind::Badge => "badges",
        }
    }

    /// Singular noun used in progress output
    pub fn singular(self) -> &'static str {
        match self {
            ItemKind::Label => "label",
            ItemKind::Badge => "badge",
        }
    }

    /// Bundled default definitions (YAML)
    pub fn default_definitions(self) -> &'static str {
        match self {
            ItemKind::Label => DEFAULT_LABELS,
            ItemKind::Badge => DEFAULT_BADGES,
        }
    }

    /// Whether templated attribute values get the host URL prefixed
    pub fn substitutes_host(self) -> bool {
        matches!(self, ItemKind::Badge)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments() {
        assert_eq!(ItemKind::Label.as_str(), "labels");
        assert_eq!(ItemKind::Badge.as_str(), "badges");
        assert_eq!(ItemKind::Badge.to_string(), "badges");
    }

    #[test]
    fn test_only_badges_substitute_host() {
        assert!(ItemKind::Badge.substitutes_host());
        assert!(!ItemKind::Label.substitutes_host());
    }

    #[test]
    fn test_default_datasets_are_bundled() {
        assert!(ItemKind::Label.default_definitions().contains("color"));
        assert!(ItemKind::Badge.default_definitions().contains("image_url"));
    }
}
