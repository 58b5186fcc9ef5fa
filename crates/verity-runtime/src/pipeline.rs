//! Verification pipeline.
//!
//! Runs the fixed workflow for one provider:
//! - `fetch_provider`: reference record and baseline hint from the source
//! - `scrape_web`: observed record from the source
//! - `quality_assurance`: field comparison and scoring
//! - `update_db` or `flag_review`: routed terminal action via the sink
//!
//! The pipeline holds no per-request state. One instance is built at startup
//! and shared by handle.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use verity_core::{
    evaluate_with, outcome_message, Assessment, Comparator, FieldComparator, InvalidProviderId,
    Outcome, ProviderId, Record, RecordPair,
};

use crate::sink::{ActionSink, LogSink, SinkError};
use crate::source::{RecordSource, SourceError};

/// Errors from a pipeline run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{0}")]
    InvalidInput(#[from] InvalidProviderId),

    #[error("Record source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Action failed: {0}")]
    Sink(#[from] SinkError),

    #[error("Pipeline not configured: {0}")]
    NotConfigured(String),
}

impl PipelineError {
    /// Whether the caller supplied bad input, as opposed to the pipeline failing.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, PipelineError::InvalidInput(_))
    }
}

/// A named workflow step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    FetchProvider,
    ScrapeWeb,
    QualityAssurance,
    UpdateDb,
    FlagReview,
}

impl Step {
    /// The terminal step taken for an outcome.
    pub fn terminal(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Verified => Step::UpdateDb,
            Outcome::Flagged => Step::FlagReview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Step::FetchProvider => "fetch_provider",
            Step::ScrapeWeb => "scrape_web",
            Step::QualityAssurance => "quality_assurance",
            Step::UpdateDb => "update_db",
            Step::FlagReview => "flag_review",
        }
    }
}

/// Everything produced by one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRun {
    pub provider_id: ProviderId,
    pub outcome: Outcome,
    pub assessment: Assessment,
    pub reference: Record,
    pub observed: Record,

    /// Steps taken, in order
    pub steps: Vec<Step>,

    /// Human-readable summary of the outcome
    pub message: String,

    pub completed_at: DateTime<Utc>,
}

/// The verification pipeline.
pub struct Pipeline {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn ActionSink>,
    comparator: Arc<dyn Comparator>,
}

impl Pipeline {
    /// Create a pipeline with the rule-based comparator.
    pub fn new(source: Arc<dyn RecordSource>, sink: Arc<dyn ActionSink>) -> Self {
        Self {
            source,
            sink,
            comparator: Arc::new(FieldComparator::new()),
        }
    }

    /// Start building a pipeline.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the workflow for a raw identifier.
    ///
    /// Non-positive identifiers are rejected before any step runs.
    pub async fn run(&self, raw_id: i64) -> Result<PipelineRun, PipelineError> {
        let id = ProviderId::try_from(raw_id)?;
        self.run_for(id).await
    }

    /// Run the workflow for a validated identifier.
    pub async fn run_for(&self, id: ProviderId) -> Result<PipelineRun, PipelineError> {
        let mut steps = Vec::with_capacity(4);

        let reference = self.source.fetch_reference(id).await?;
        steps.push(Step::FetchProvider);
        info!(provider_id = %id, source = self.source.name(), "Retrieved reference record");

        let observed = self.source.fetch_observed(id).await?;
        steps.push(Step::ScrapeWeb);
        info!(provider_id = %id, source = self.source.name(), "Retrieved observed record");

        let pair = RecordPair {
            reference: reference.record,
            observed,
            baseline: reference.baseline,
        };
        let evaluation = evaluate_with(self.comparator.as_ref(), &pair);
        steps.push(Step::QualityAssurance);
        info!(
            provider_id = %id,
            comparator = self.comparator.name(),
            confidence = evaluation.assessment.confidence.value(),
            discrepancies = evaluation.assessment.discrepancy_count(),
            "Quality assurance complete"
        );

        let terminal = Step::terminal(evaluation.outcome);
        debug!(provider_id = %id, step = terminal.as_str(), "Routing");
        self.sink
            .apply(id, evaluation.outcome, &evaluation.assessment)
            .await?;
        steps.push(terminal);

        Ok(PipelineRun {
            provider_id: id,
            outcome: evaluation.outcome,
            message: outcome_message(id, evaluation.outcome),
            assessment: evaluation.assessment,
            reference: pair.reference,
            observed: pair.observed,
            steps,
            completed_at: evaluation.evaluated_at,
        })
    }
}

/// Builder for [`Pipeline`].
pub struct PipelineBuilder {
    source: Option<Arc<dyn RecordSource>>,
    sink: Option<Arc<dyn ActionSink>>,
    comparator: Option<Arc<dyn Comparator>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            sink: None,
            comparator: None,
        }
    }

    /// Set the record source (required).
    pub fn source(mut self, source: Arc<dyn RecordSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the action sink (defaults to [`LogSink`]).
    pub fn sink(mut self, sink: Arc<dyn ActionSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the comparator (defaults to [`FieldComparator`]).
    pub fn comparator(mut self, comparator: Arc<dyn Comparator>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    /// Build the pipeline.
    pub fn build(self) -> Result<Pipeline, PipelineError> {
        let source = self
            .source
            .ok_or_else(|| PipelineError::NotConfigured("No record source set".to_string()))?;

        Ok(Pipeline {
            source,
            sink: self.sink.unwrap_or_else(|| Arc::new(LogSink::new())),
            comparator: self
                .comparator
                .unwrap_or_else(|| Arc::new(FieldComparator::new())),
        })
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
