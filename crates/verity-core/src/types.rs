//! Shared value types for record verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::record::{Field, Record};

/// Integer confidence score, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Confidence(u8);

impl Confidence {
    pub const MIN: Confidence = Confidence(0);
    pub const MAX: Confidence = Confidence(100);

    /// Build a confidence, clamping into `0..=100`.
    pub fn clamped(score: i64) -> Self {
        Self(score.clamp(0, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for Confidence {
    fn from(score: i64) -> Self {
        Self::clamped(score)
    }
}

impl From<Confidence> for u8 {
    fn from(confidence: Confidence) -> Self {
        confidence.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal outcome of a verification run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Records reconcile; persist as verified.
    Verified,
    /// Records disagree; enqueue for human review.
    Flagged,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Verified => "verified",
            Outcome::Flagged => "flagged",
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Outcome::Verified)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field judged meaningfully different between the two records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub field: Field,

    /// Original (non-normalized) reference value
    pub reference_value: String,

    /// Original (non-normalized) observed value
    pub observed_value: String,
}

/// Result of comparing a reference record against an observed record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub confidence: Confidence,

    /// Discrepancies in field order
    pub discrepancies: Vec<Discrepancy>,
}

impl Assessment {
    pub fn discrepancy_count(&self) -> usize {
        self.discrepancies.len()
    }

    pub fn has_discrepancy(&self, field: Field) -> bool {
        self.discrepancies.iter().any(|d| d.field == field)
    }
}

/// The two records under comparison plus an optional baseline hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPair {
    pub reference: Record,
    pub observed: Record,

    /// Precomputed starting confidence, penalized per discrepancy
    #[serde(default)]
    pub baseline: Option<Confidence>,
}

/// A provider identifier rejected at the boundary.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Provider ID must be a positive integer (got {0})")]
pub struct InvalidProviderId(pub i64);

/// A validated, strictly positive provider identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ProviderId(u64);

impl ProviderId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for ProviderId {
    type Error = InvalidProviderId;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        if raw > 0 {
            Ok(Self(raw as u64))
        } else {
            Err(InvalidProviderId(raw))
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Assessment plus routed outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Evaluation {
    pub assessment: Assessment,
    pub outcome: Outcome,

    /// When the evaluation was performed
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_clamps() {
        assert_eq!(Confidence::clamped(-15).value(), 0);
        assert_eq!(Confidence::clamped(140).value(), 100);
        assert_eq!(Confidence::clamped(73).value(), 73);
    }

    #[test]
    fn test_confidence_serde() {
        let c: Confidence = serde_json::from_str("250").unwrap();
        assert_eq!(c, Confidence::MAX);
        assert_eq!(serde_json::to_string(&Confidence::clamped(88)).unwrap(), "88");
    }

    #[test]
    fn test_provider_id_rejects_non_positive() {
        assert_eq!(ProviderId::try_from(0), Err(InvalidProviderId(0)));
        assert_eq!(ProviderId::try_from(-3), Err(InvalidProviderId(-3)));
        assert_eq!(ProviderId::try_from(1001).unwrap().get(), 1001);
    }

    #[test]
    fn test_outcome_wire_names() {
        assert_eq!(serde_json::to_string(&Outcome::Verified).unwrap(), "\"verified\"");
        assert_eq!(serde_json::to_string(&Outcome::Flagged).unwrap(), "\"flagged\"");
    }
}
