//! Fixture catalog endpoint
//!
//! Lists the provider ids the fixture table knows about so callers can
//! discover demo inputs.

use axum::{extract::State, Json};
use serde::Serialize;

use verity_core::Confidence;
use verity_runtime::Fixture;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProviderSummary {
    pub provider_id: u64,
    pub name: String,
    pub scenario: String,
    pub baseline: Option<Confidence>,
}

#[derive(Debug, Serialize)]
pub struct ProvidersResponse {
    pub providers: Vec<ProviderSummary>,

    /// Scenario served for any id not listed
    pub fallback_scenario: Option<String>,
}

impl From<&Fixture> for ProviderSummary {
    fn from(fixture: &Fixture) -> Self {
        Self {
            provider_id: fixture.reference.id,
            name: fixture.reference.name.clone(),
            scenario: fixture.scenario.clone(),
            baseline: fixture.baseline,
        }
    }
}

/// GET /api/providers
///
/// Empty when the pipeline is not backed by a fixture table.
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let Some(catalog) = state.catalog() else {
        return Json(ProvidersResponse {
            providers: Vec::new(),
            fallback_scenario: None,
        });
    };

    Json(ProvidersResponse {
        providers: catalog.fixtures().map(ProviderSummary::from).collect(),
        fallback_scenario: catalog.fallback().map(|f| f.scenario.clone()),
    })
}
