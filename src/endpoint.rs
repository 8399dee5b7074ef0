//! Endpoint Construction
//!
//! Builds the collection URL that receives created items

use serde_yaml::Value;

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use crate::kind::ItemKind;
use crate::settings::Settings;

/// Marker that identifies a GitLab placeholder (e.g. `%{project_path}`)
pub const TEMPLATE_MARKER: &str = "%{";

/// Target of an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Numeric project ID
    Project(u64),

    /// Numeric group ID
    Group(u64),
}

impl Target {
    /// Build a target from optional project and group IDs
    ///
    /// # Errors
    /// If both or neither ID is given, or if an ID is zero
    pub fn from_ids(project_id: Option<u64>, group_id: Option<u64>) -> Result<Self> {
        match (project_id, group_id) {
            (Some(_), Some(_)) => Err(Error::invalid_target(
                "Project ID and Group ID can not be used at the same time",
            )),
            (None, None) => Err(Error::invalid_target(
                "Either Project ID or Group ID is required",
            )),
            (Some(0), None) | (None, Some(0)) => {
                Err(Error::invalid_target("IDs must be positive integers"))
            }
            (Some(id), None) => Ok(Target::Project(id)),
            (None, Some(id)) => Ok(Target::Group(id)),
        }
    }

    /// Path segment for the target collection
    fn collection(&self) -> &'static str {
        match self {
            Target::Project(_) => "projects",
            Target::Group(_) => "groups",
        }
    }

    /// Numeric ID
    pub fn id(&self) -> u64 {
        match self {
            Target::Project(id) | Target::Group(id) => *id,
        }
    }
}

/// Endpoint Descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    /// Fully-qualified collection endpoint
    pub url: String,

    /// `{protocol}://{host}`
    pub host_url: String,
}

/// Build the endpoint for a kind and target
///
/// # Errors
/// If a connection field is missing
pub fn build(
    kind: ItemKind,
    target: Target,
    connection: &ConnectionConfig,
    settings: &Settings,
) -> Result<EndpointDescriptor> {
    connection.validate()?;

    let host_url = connection.host_url();
    let url = format!(
        "{}/api/{}/{}/{}/{}",
        host_url,
        settings.api_version,
        target.collection(),
        target.id(),
        kind.as_str()
    );
    tracing::debug!(%url, "API endpoint");

    Ok(EndpointDescriptor { url, host_url })
}

/// Prefix templated string values with the host URL
///
/// Non-string values and strings without [`TEMPLATE_MARKER`] are returned
/// unchanged.
pub fn substitute_host(value: &Value, host_url: &str) -> Value {
    match value {
        Value::String(s) if s.contains(TEMPLATE_MARKER) => {
            Value::String(format!("{}/{}", host_url, s))
        }
        other => other.clone(),
    }
}
