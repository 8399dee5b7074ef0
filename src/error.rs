//! Error Handling
//!
//! Error type definitions used in labelx

use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Error types for labelx
#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not locate configuration file (searched: {})", format_paths(.searched))]
    ConfigNotFound { searched: Vec<PathBuf> },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Missing connection setting: {0}")]
    MissingConnectionField(&'static str),

    #[error("Invalid access token: cannot be used as a header value")]
    InvalidToken,

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Definition file not found: {}", .0.display())]
    DefinitionFileNotFound(PathBuf),

    #[error("Unsupported definition file extension: {} (expected .yaml or .yml)", .0.display())]
    UnsupportedExtension(PathBuf),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create a new invalid target error
    pub fn invalid_target<S: Into<String>>(message: S) -> Self {
        Error::InvalidTarget(message.into())
    }

    /// Create a new invalid definition error
    pub fn invalid_definition<S: Into<String>>(message: S) -> Self {
        Error::InvalidDefinition(message.into())
    }
}

/// Decode file content as UTF-8, reporting failures as a parse error for `path`
pub(crate) fn decode_utf8(path: &Path, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        source: <serde_yaml::Error as serde::de::Error>::custom(e),
    })
}

fn format_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "(none)".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
