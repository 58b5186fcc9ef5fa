//! # verity-core
//!
//! Deterministic provider record verification.
//!
//! This crate answers one question for a healthcare provider directory
//! entry: does the system-of-record data agree with independently observed
//! data well enough to be marked verified?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same record pair always produces the same assessment
//! 2. **No I/O**: Comparison and routing are pure functions
//! 3. **Strict schema**: Records reject unknown and missing fields
//!
//! ## Example
//!
//! ```rust,ignore
//! use verity_core::{evaluate, Record, RecordPair, Outcome};
//!
//! let pair = RecordPair {
//!     reference: Record::from_path("reference.yaml")?,
//!     observed: Record::from_path("observed.yaml")?,
//!     baseline: None,
//! };
//! let evaluation = evaluate(&pair);
//!
//! match evaluation.outcome {
//!     Outcome::Verified => println!("OK ({})", evaluation.assessment.confidence),
//!     Outcome::Flagged => println!("REVIEW: {} discrepancies", evaluation.assessment.discrepancy_count()),
//! }
//! ```

pub mod comparator;
pub mod record;
pub mod router;
pub mod types;

// Re-export main types at crate root
pub use comparator::{compare, Comparator, FieldComparator, FieldVerdict, Variation};
pub use record::{Field, Record, RecordError};
pub use router::{outcome_message, route, VERIFY_THRESHOLD};
pub use types::{
    Assessment, Confidence, Discrepancy, Evaluation, InvalidProviderId, Outcome, ProviderId,
    RecordPair,
};

use chrono::Utc;

/// Compare a record pair with the rule-based comparator and route the result.
///
/// This is the main entry point for verification.
pub fn evaluate(pair: &RecordPair) -> Evaluation {
    evaluate_with(&FieldComparator::new(), pair)
}

/// Compare a record pair with the given comparator and route the result.
pub fn evaluate_with(comparator: &dyn Comparator, pair: &RecordPair) -> Evaluation {
    let assessment = comparator.compare(pair);
    let outcome = route(assessment.confidence);

    Evaluation {
        assessment,
        outcome,
        evaluated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str = r#"
id: 1003
name: "Dr. Amit Patel"
specialty: "Orthopedics"
phone: "+91-79-2658-1234"
address: "C-789, Satellite"
city: "Ahmedabad"
state: "Gujarat"
zip: "380015"
license_number: "MCI/GUJ/34567/2015"
npi: "7654321098"
"#;

    #[test]
    fn test_identical_records_verified() {
        let record = Record::from_yaml(REFERENCE).unwrap();
        let pair = RecordPair {
            reference: record.clone(),
            observed: record,
            baseline: None,
        };
        let evaluation = evaluate(&pair);

        assert_eq!(evaluation.assessment.confidence.value(), 95);
        assert_eq!(evaluation.outcome, Outcome::Verified);
    }

    #[test]
    fn test_phone_mismatch_flagged() {
        let reference = Record::from_yaml(REFERENCE).unwrap();
        let observed = reference.clone().with(Field::Phone, "+91-79-2658-1235");
        let evaluation = evaluate(&RecordPair {
            reference,
            observed,
            baseline: None,
        });

        assert_eq!(evaluation.assessment.confidence.value(), 75);
        assert_eq!(evaluation.outcome, Outcome::Flagged);
    }

    #[test]
    fn test_baseline_drives_outcome() {
        let reference = Record::from_yaml(REFERENCE).unwrap();
        let observed = reference.clone().with(Field::Address, "C-789, Satellite Area");
        let evaluation = evaluate(&RecordPair {
            reference,
            observed,
            baseline: Some(Confidence::clamped(88)),
        });

        assert!(evaluation.assessment.discrepancies.is_empty());
        assert_eq!(evaluation.assessment.confidence.value(), 88);
        assert_eq!(evaluation.outcome, Outcome::Verified);
    }
}
