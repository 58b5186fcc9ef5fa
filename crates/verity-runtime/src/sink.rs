//! Action sinks: what happens after a record is routed.
//!
//! A verified record is persisted as verified; a flagged record is enqueued
//! for human review along with its discrepancies. Real deployments back this
//! with the provider database and a review queue.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use verity_core::{Assessment, Outcome, ProviderId};

/// Errors from action sinks.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to persist verification for provider {id}: {reason}")]
    PersistFailed { id: ProviderId, reason: String },

    #[error("Failed to enqueue review for provider {id}: {reason}")]
    EnqueueFailed { id: ProviderId, reason: String },
}

/// Performs the terminal action for a routed outcome.
#[async_trait]
pub trait ActionSink: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Apply the action for `outcome`.
    async fn apply(
        &self,
        id: ProviderId,
        outcome: Outcome,
        assessment: &Assessment,
    ) -> Result<(), SinkError>;
}

/// Sink that records actions as structured log events only.
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn apply(
        &self,
        id: ProviderId,
        outcome: Outcome,
        assessment: &Assessment,
    ) -> Result<(), SinkError> {
        match outcome {
            Outcome::Verified => {
                info!(
                    provider_id = %id,
                    confidence = assessment.confidence.value(),
                    "Updating database: provider verified"
                );
            }
            Outcome::Flagged => {
                warn!(
                    provider_id = %id,
                    confidence = assessment.confidence.value(),
                    discrepancies = assessment.discrepancy_count(),
                    "Flagging for human review"
                );
                for discrepancy in &assessment.discrepancies {
                    warn!(
                        provider_id = %id,
                        field = %discrepancy.field,
                        reference = %discrepancy.reference_value,
                        observed = %discrepancy.observed_value,
                        "Discrepancy"
                    );
                }
            }
        }
        Ok(())
    }
}
