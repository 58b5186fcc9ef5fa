//! Provider validation endpoint

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use verity_core::{Confidence, Discrepancy, Outcome, ProviderId, Record};
use verity_runtime::{PipelineRun, Step};

use crate::error::ApiError;
use crate::AppState;

/// Validation request body
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// Raw identifier; positivity is checked by the pipeline
    #[serde(alias = "id")]
    pub provider_id: i64,
}

/// Validation response body
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub id: ProviderId,

    /// Same value as `id`, named like the request field
    pub provider_id: ProviderId,
    pub outcome: Outcome,
    pub confidence: Confidence,
    pub reference_data: Record,
    pub observed_data: Record,
    pub discrepancies: Vec<Discrepancy>,
    pub workflow_steps: Vec<Step>,
    pub message: String,
    pub completed_at: DateTime<Utc>,
}

impl From<PipelineRun> for ValidateResponse {
    fn from(run: PipelineRun) -> Self {
        Self {
            success: true,
            id: run.provider_id,
            provider_id: run.provider_id,
            outcome: run.outcome,
            confidence: run.assessment.confidence,
            reference_data: run.reference,
            observed_data: run.observed,
            discrepancies: run.assessment.discrepancies,
            workflow_steps: run.steps,
            message: run.message,
            completed_at: run.completed_at,
        }
    }
}

/// POST /api/validate
///
/// Runs the verification workflow for one provider. A body that is not
/// JSON or lacks an integer `provider_id` is rejected as invalid input.
pub async fn validate_provider(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let run = state.pipeline.run(request.provider_id).await?;
    info!(
        provider_id = %run.provider_id,
        outcome = %run.outcome,
        confidence = run.assessment.confidence.value(),
        "Validation complete"
    );

    Ok(Json(ValidateResponse::from(run)))
}
