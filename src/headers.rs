//! Request Headers
//!
//! Authentication and content-type headers for the GitLab REST API

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};

use crate::config::ConnectionConfig;
use crate::error::{Error, Result};

/// Header carrying the private access token
///
/// Stored lowercase so it can back a static `HeaderName`; matching is
/// case-insensitive on the wire.
pub const PRIVATE_TOKEN: &str = "private-token";

/// Build per-request headers
///
/// # Errors
/// If the token is empty or not a valid header value
pub fn headers(connection: &ConnectionConfig) -> Result<HeaderMap> {
    if connection.token.trim().is_empty() {
        return Err(Error::MissingConnectionField("login.token"));
    }

    let mut token = HeaderValue::from_str(&connection.token).map_err(|_| Error::InvalidToken)?;
    token.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(HeaderName::from_static(PRIVATE_TOKEN), token);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}
