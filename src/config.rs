//! Configuration Management
//!
//! Layered lookup of the connection configuration file

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{decode_utf8, Error, Result};
use crate::settings::Settings;

/// Connection Configuration
///
/// The `login` section of the configuration file
#[derive(Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConnectionConfig {
    /// URL scheme (e.g. `https`)
    #[serde(default)]
    pub protocol: String,

    /// Host name, optionally with port (e.g. `gitlab.com`)
    #[serde(default)]
    pub host: String,

    /// Private access token
    #[serde(default)]
    pub token: String,
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl ConnectionConfig {
    /// Create a new connection configuration
    pub fn new(
        protocol: impl Into<String>,
        host: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            protocol: protocol.into(),
            host: host.into(),
            token: token.into(),
        }
    }

    /// Validate connection configuration
    ///
    /// # Errors
    /// If any of protocol, host or token is empty
    pub fn validate(&self) -> Result<()> {
        if self.protocol.trim().is_empty() {
            return Err(Error::MissingConnectionField("login.protocol"));
        }
        if self.host.trim().is_empty() {
            return Err(Error::MissingConnectionField("login.host"));
        }
        if self.token.trim().is_empty() {
            return Err(Error::MissingConnectionField("login.token"));
        }
        Ok(())
    }

    /// `{protocol}://{host}`
    pub fn host_url(&self) -> String {
        format!("{}://{}", self.protocol, self.host)
    }
}

/// On-disk configuration file layout
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    login: ConnectionConfig,
}

/// Resolved Configuration
///
/// Parsed configuration plus metadata about where it came from
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Connection settings
    pub connection: ConnectionConfig,

    /// File that was actually used
    pub source: PathBuf,

    /// Parent directory of `source`
    pub base_directory: PathBuf,
}

/// State of a candidate scan
enum Scan {
    Scanning(usize),
    Found { path: PathBuf, content: Vec<u8> },
    Exhausted,
}

/// Configuration Resolver
///
/// Walks an ordered candidate list and parses the first readable file
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    candidates: Vec<PathBuf>,
}

impl ConfigResolver {
    /// Create a resolver over an explicit candidate list
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// Create a resolver for the given settings
    ///
    /// A non-empty `custom` list replaces the default search path entirely.
    pub fn from_settings(settings: &Settings, custom: Option<Vec<PathBuf>>) -> Self {
        match custom {
            Some(paths) if !paths.is_empty() => Self::new(paths),
            _ => Self::new(settings.config_files.clone()),
        }
    }

    /// Candidate paths in search order
    pub fn candidates(&self) -> &[PathBuf] {
        &self.candidates
    }

    /// Locate and parse the configuration file
    ///
    /// # Errors
    /// - `ConfigNotFound` if no candidate exists or is readable
    /// - `Parse` if the first readable candidate is malformed
    /// - `Read` if a candidate fails with an I/O error other than
    ///   not-found or permission-denied
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        self.resolve_with(|path| std::fs::read(path))
    }

    /// Locate and parse the configuration file using a custom reader
    ///
    /// Candidates must exist as regular files before `read` is consulted.
    pub fn resolve_with<F>(&self, mut read: F) -> Result<ResolvedConfig>
    where
        F: FnMut(&Path) -> io::Result<Vec<u8>>,
    {
        let mut state = Scan::Scanning(0);

        loop {
            state = match state {
                Scan::Scanning(index) => match self.candidates.get(index) {
                    None => Scan::Exhausted,
                    Some(path) => {
                        tracing::debug!(path = %path.display(), "searching for configuration");
                        match probe(path, &mut read)? {
                            Some(content) => Scan::Found {
                                path: path.clone(),
                                content,
                            },
                            None => Scan::Scanning(index + 1),
                        }
                    }
                },
                Scan::Found { path, content } => {
                    tracing::debug!(path = %path.display(), "using configuration");
                    return parse_config(&path, content);
                }
                Scan::Exhausted => {
                    return Err(Error::ConfigNotFound {
                        searched: self.candidates.clone(),
                    });
                }
            };
        }
    }
}

/// Read a candidate if it is an existing, readable regular file
///
/// Only missing and permission-denied candidates yield `None`; any other
/// read failure stops the scan.
fn probe<F>(path: &Path, read: &mut F) -> Result<Option<Vec<u8>>>
where
    F: FnMut(&Path) -> io::Result<Vec<u8>>,
{
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => {
            tracing::debug!(path = %path.display(), "not a regular file, skipping");
            return Ok(None);
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!(path = %path.display(), "permission denied reading configuration");
            return Ok(None);
        }
        Err(_) => return Ok(None),
    }

    match read(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!(path = %path.display(), "permission denied reading configuration");
            Ok(None)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(Error::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Parse configuration content read from `path`
fn parse_config(path: &Path, content: Vec<u8>) -> Result<ResolvedConfig> {
    let content = decode_utf8(path, content)?;
    let file: ConfigFile = if content.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(&content).map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?
    };

    let base_directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok(ResolvedConfig {
        connection: file.login,
        source: path.to_path_buf(),
        base_directory,
    })
}

/// Load configuration from the default search path or a custom list
///
/// # Errors
/// See [`ConfigResolver::resolve`]
pub fn load_config(settings: &Settings, custom: Option<Vec<PathBuf>>) -> Result<ResolvedConfig> {
    ConfigResolver::from_settings(settings, custom).resolve()
}
