//! Batch Apply
//!
//! Sequential creation of every definition against a collection endpoint

use reqwest::header::HeaderMap;
use serde_yaml::Value;

use crate::definitions::{DefinitionSet, ItemDefinition};
use crate::endpoint::EndpointDescriptor;
use crate::error::Result;
use crate::kind::ItemKind;
use crate::settings::Settings;
use crate::transport::Transport;

/// Why an item was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Attributes could not be serialized; no request was sent
    Serialization(String),

    /// Remote answered with a status outside the accepted set
    Rejected { status: u16, reason: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Serialization(e) => write!(f, "serialization failed: {}", e),
            SkipReason::Rejected { status, reason } => write!(f, "{} {}", status, reason),
        }
    }
}

/// Outcome of one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Item was created
    Created { name: String, status: u16 },

    /// Item was skipped
    Skipped { name: String, reason: SkipReason },
}

impl ItemOutcome {
    pub fn name(&self) -> &str {
        match self {
            ItemOutcome::Created { name, .. } | ItemOutcome::Skipped { name, .. } => name,
        }
    }
}

/// Apply result
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyResult {
    /// Every processed item name, in order
    pub attempted: Vec<String>,

    /// Names of items that were not created, in order
    pub skipped: Vec<String>,

    /// Per-item outcomes
    pub outcomes: Vec<ItemOutcome>,
}

impl ApplyResult {
    /// Create a new empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an outcome and update bookkeeping
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.attempted.push(outcome.name().to_string());
        if let ItemOutcome::Skipped { name, .. } = &outcome {
            self.skipped.push(name.clone());
        }
        self.outcomes.push(outcome);
    }

    pub fn total_attempted(&self) -> usize {
        self.attempted.len()
    }

    pub fn total_skipped(&self) -> usize {
        self.skipped.len()
    }

    pub fn total_created(&self) -> usize {
        self.attempted.len() - self.skipped.len()
    }

    pub fn has_skips(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Progress callbacks for a batch run
pub trait ApplyObserver {
    /// Called before an item is processed
    fn on_item_start(&mut self, _kind: ItemKind, _name: &str) {}

    /// Called once an item has an outcome
    fn on_item_done(&mut self, _kind: ItemKind, _outcome: &ItemOutcome) {}
}

/// Observer that ignores all events
pub struct NoopObserver;

impl ApplyObserver for NoopObserver {}

/// Batch Apply Driver
///
/// Creates definitions one at a time through a [`Transport`]
pub struct BatchApplier<T: Transport> {
    transport: T,
    settings: Settings,
}

impl<T: Transport> BatchApplier<T> {
    /// Create a new driver
    pub fn new(transport: T, settings: Settings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Apply all definitions
    ///
    /// # Errors
    /// On the first transport-level failure; the batch is aborted
    pub async fn apply(
        &self,
        kind: ItemKind,
        definitions: &DefinitionSet,
        endpoint: &EndpointDescriptor,
        headers: &HeaderMap,
    ) -> Result<ApplyResult> {
        self.apply_with_observer(kind, definitions, endpoint, headers, &mut NoopObserver)
            .await
    }

    /// Apply all definitions, reporting progress to `observer`
    ///
    /// # Errors
    /// On the first transport-level failure; the batch is aborted
    pub async fn apply_with_observer(
        &self,
        kind: ItemKind,
        definitions: &DefinitionSet,
        endpoint: &EndpointDescriptor,
        headers: &HeaderMap,
        observer: &mut dyn ApplyObserver,
    ) -> Result<ApplyResult> {
        let mut result = ApplyResult::new();

        for definition in definitions {
            observer.on_item_start(kind, &definition.name);
            let outcome = self.apply_one(kind, definition, endpoint, headers).await?;
            observer.on_item_done(kind, &outcome);
            result.record(outcome);
        }

        tracing::info!(
            kind = %kind,
            attempted = result.total_attempted(),
            skipped = result.total_skipped(),
            "batch complete"
        );
        Ok(result)
    }

    async fn apply_one(
        &self,
        kind: ItemKind,
        definition: &ItemDefinition,
        endpoint: &EndpointDescriptor,
        headers: &HeaderMap,
    ) -> Result<ItemOutcome> {
        let name = definition.name.clone();

        let payload = match serialize_payload(definition) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(kind = %kind, name = %name, error = %e, "skipping item");
                return Ok(ItemOutcome::Skipped {
                    name,
                    reason: SkipReason::Serialization(e.to_string()),
                });
            }
        };

        tracing::debug!(
            kind = %kind,
            name = %name,
            payload = %String::from_utf8_lossy(&payload),
            "creating item"
        );
        let response = self.transport.post(&endpoint.url, headers, payload).await?;

        if self.settings.is_accepted(response.status) {
            Ok(ItemOutcome::Created {
                name,
                status: response.status,
            })
        } else {
            tracing::warn!(
                kind = %kind,
                name = %name,
                status = response.status,
                body = %response.body,
                "remote rejected item"
            );
            Ok(ItemOutcome::Skipped {
                name,
                reason: SkipReason::Rejected {
                    status: response.status,
                    reason: response.reason,
                },
            })
        }
    }
}

/// JSON request body: the attributes with the item's name injected
pub fn serialize_payload(definition: &ItemDefinition) -> serde_json::Result<Vec<u8>> {
    let mut attributes = definition.attributes.clone();
    attributes.insert(
        Value::String("name".to_string()),
        Value::String(definition.name.clone()),
    );
    serde_json::to_vec(&attributes)
}
