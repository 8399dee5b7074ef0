//! # labelx
//!
//! A fast and reliable GitLab label and badge provisioning library built with Rust
//!
//! ## Features
//! - Layered configuration lookup
//! - Bundled default labels and badges
//! - User definition overrides
//! - Project and group targets

pub mod apply;
pub mod config;
pub mod definitions;
pub mod endpoint;
pub mod error;
pub mod headers;
pub mod kind;
pub mod settings;
pub mod transport;

use std::path::PathBuf;

pub use apply::{ApplyObserver, ApplyResult, BatchApplier, ItemOutcome, NoopObserver, SkipReason};
pub use config::{ConfigResolver, ConnectionConfig, ResolvedConfig};
pub use definitions::{DefinitionSet, ItemDefinition, OverrideStatus};
pub use endpoint::{EndpointDescriptor, Target};
pub use error::{Error, Result};
pub use kind::ItemKind;
pub use settings::Settings;
pub use transport::{HttpTransport, Transport};

/// A single provisioning run
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    /// Kind of item to create
    pub kind: ItemKind,

    /// Project or group receiving the items
    pub target: Target,

    /// Custom configuration search path (replaces the default one)
    pub config_paths: Option<Vec<PathBuf>>,

    /// User definitions merged over the bundled defaults
    pub definitions_file: Option<PathBuf>,
}

/// Everything a provisioning run produced
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    /// Configuration that was used
    pub config: ResolvedConfig,

    /// Endpoint items were posted to
    pub endpoint: EndpointDescriptor,

    /// What happened to the user definitions file
    pub override_status: OverrideStatus,

    /// Per-item bookkeeping
    pub result: ApplyResult,
}

/// Main functionality of labelx
///
/// Resolves configuration, builds the endpoint and headers, merges
/// definitions and creates every item in order.
///
/// # Examples
///
/// ```rust,no_run
/// use labelx::{provision, HttpTransport, ItemKind, NoopObserver, ProvisionRequest, Settings, Target};
///
/// #[tokio::main]
/// async fn main() -> labelx::Result<()> {
///     let request = ProvisionRequest {
///         kind: ItemKind::Label,
///         target: Target::from_ids(Some(1234), None)?,
///         config_paths: None,
///         definitions_file: None,
///     };
///
///     let report = provision(request, &Settings::default(), HttpTransport::new(), &mut NoopObserver).await?;
///     println!("Skipped: {:?}", report.result.skipped);
///     Ok(())
/// }
/// ```
///
/// # Errors
/// On any fatal condition: missing or malformed configuration, unreadable
/// definitions, or a transport failure
pub async fn provision<T: Transport>(
    request: ProvisionRequest,
    settings: &Settings,
    transport: T,
    observer: &mut dyn ApplyObserver,
) -> Result<ProvisionReport> {
    let config = config::load_config(settings, request.config_paths)?;
    let endpoint = endpoint::build(request.kind, request.target, &config.connection, settings)?;
    let headers = headers::headers(&config.connection)?;

    let merged = definitions::merge(
        request.kind,
        &endpoint.host_url,
        request.definitions_file.as_deref(),
    )?;

    let applier = BatchApplier::new(transport, settings.clone());
    let result = applier
        .apply_with_observer(
            request.kind,
            &merged.definitions,
            &endpoint,
            &headers,
            observer,
        )
        .await?;

    Ok(ProvisionReport {
        config,
        endpoint,
        override_status: merged.override_status,
        result,
    })
}
