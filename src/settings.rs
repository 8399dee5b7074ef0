//! Runtime Settings
//!
//! Fixed parameters shared by the resolver, the endpoint builder and the
//! batch driver

use std::path::{Path, PathBuf};

/// Name used for configuration directories
pub const PACKAGE_NAME: &str = "labelx";

/// GitLab REST API version
pub const API_VERSION: &str = "v4";

/// HTTP status codes treated as a successful creation
pub const ACCEPTED_STATUS_CODES: &[u16] = &[200, 201, 202];

/// Configuration file names tried inside every search location, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["config.yaml", "config.yml"];

/// Settings
///
/// Passed explicitly into every component instead of living in globals
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// API version path segment
    pub api_version: String,

    /// Status codes accepted as success
    pub accepted_status_codes: Vec<u16>,

    /// Default configuration search path
    pub config_files: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        let home = dirs::home_dir();
        let cwd = std::env::current_dir().ok();
        Self {
            api_version: API_VERSION.to_string(),
            accepted_status_codes: ACCEPTED_STATUS_CODES.to_vec(),
            config_files: default_config_files(home.as_deref(), cwd.as_deref()),
        }
    }
}

impl Settings {
    /// Whether a response status counts as success
    pub fn is_accepted(&self, status: u16) -> bool {
        self.accepted_status_codes.contains(&status)
    }
}

/// Build the default configuration search path
///
/// Precedence: per-user config directory, then the working directory, then
/// the system-wide directory. Each location contributes `config.yaml` before
/// `config.yml`.
///
/// # Arguments
/// - `home`: User home directory, if known
/// - `cwd`: Current working directory, if known
pub fn default_config_files(home: Option<&Path>, cwd: Option<&Path>) -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(home) = home {
        locations.push(home.join(".config").join(PACKAGE_NAME));
    }
    if let Some(cwd) = cwd {
        locations.push(cwd.join(PACKAGE_NAME));
    }
    locations.push(PathBuf::from("/etc").join(PACKAGE_NAME));

    locations
        .iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_files_order() {
        let files = default_config_files(Some(Path::new("/home/u")), Some(Path::new("/work")));
        assert_eq!(
            files,
            vec![
                PathBuf::from("/home/u/.config/labelx/config.yaml"),
                PathBuf::from("/home/u/.config/labelx/config.yml"),
                PathBuf::from("/work/labelx/config.yaml"),
                PathBuf::from("/work/labelx/config.yml"),
                PathBuf::from("/etc/labelx/config.yaml"),
                PathBuf::from("/etc/labelx/config.yml"),
            ]
        );
    }

    #[test]
    fn test_default_config_files_without_home() {
        let files = default_config_files(None, None);
        assert_eq!(files.len(), 2);
        assert!(files[0].starts_with("/etc/labelx"));
    }

    #[test]
    fn test_accepted_status_codes() {
        let settings = Settings::default();
        assert_eq!(settings.api_version, "v4");
        assert!(settings.is_accepted(200));
        assert!(settings.is_accepted(201));
        assert!(settings.is_accepted(202));
        assert!(!settings.is_accepted(204));
        assert!(!settings.is_accepted(404));
        assert!(!settings.is_accepted(409));
    }
}
