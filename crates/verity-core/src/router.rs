//! Router: maps a confidence score to a terminal outcome.
//!
//! The rule is strict and not configurable:
//! 1. confidence > 80 → verified
//! 2. otherwise → flagged
//!
//! Exactly 80 is flagged. There is no hysteresis and no state.

use crate::types::{Confidence, Outcome};

/// Scores strictly above this value are verified.
pub const VERIFY_THRESHOLD: u8 = 80;

/// Route a confidence score to an outcome.
pub fn route(confidence: Confidence) -> Outcome {
    if confidence.value() > VERIFY_THRESHOLD {
        Outcome::Verified
    } else {
        Outcome::Flagged
    }
}

/// Human-readable message describing an outcome.
pub fn outcome_message(provider_id: impl std::fmt::Display, outcome: Outcome) -> String {
    match outcome {
        Outcome::Verified => format!(
            "Provider {} has been verified and updated in the database.",
            provider_id
        ),
        Outcome::Flagged => format!(
            "Provider {} has been flagged for human review due to data discrepancies.",
            provider_id
        ),
    }
}
