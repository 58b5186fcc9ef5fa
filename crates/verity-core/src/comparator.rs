//! Field comparator: turns a record pair into an assessment.
//!
//! Each field is normalized (trimmed, lowercased) and accepted when the two
//! values are equal or differ only by a minor variation:
//! - one value contains the other
//! - for `address`, the observed value has exactly one extra word
//!
//! Containment is deliberately loose. `"1"` is contained in `"100-1"` and an
//! empty value is contained in everything, so both compare as equivalent.

use crate::record::{Field, Record};
use crate::types::{Assessment, Confidence, Discrepancy, RecordPair};

/// Confidence with no discrepancies and no baseline.
pub const CLEAN_CONFIDENCE: u8 = 95;

/// Confidence with exactly one discrepancy and no baseline.
pub const SINGLE_DISCREPANCY_CONFIDENCE: u8 = 75;

/// Points deducted per discrepancy when scoring without a baseline (n >= 2).
pub const DISCREPANCY_WEIGHT: i64 = 20;

/// Points deducted per discrepancy from a baseline hint.
pub const BASELINE_PENALTY: i64 = 5;

/// How a single field compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldVerdict {
    /// Normalized values are identical
    Equal,
    /// Values differ but are accepted as the same
    MinorVariation(Variation),
    /// Values differ meaningfully
    Mismatch,
}

/// Which minor-variation rule accepted a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variation {
    /// One normalized value is a substring of the other
    Containment,
    /// Observed address has exactly one more word than the reference
    InsertedWord,
}

impl FieldVerdict {
    pub fn is_discrepancy(&self) -> bool {
        matches!(self, FieldVerdict::Mismatch)
    }
}

/// Trait at the comparison seam.
///
/// The shipped implementation is rule-based; a model-backed comparator can
/// slot in behind the same contract.
pub trait Comparator: Send + Sync {
    fn name(&self) -> &'static str;

    fn compare(&self, pair: &RecordPair) -> Assessment;
}

/// Rule-based comparator over the fixed field set.
pub struct FieldComparator;

impl FieldComparator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FieldComparator {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparator for FieldComparator {
    fn name(&self) -> &'static str {
        "field"
    }

    fn compare(&self, pair: &RecordPair) -> Assessment {
        compare(&pair.reference, &pair.observed, pair.baseline)
    }
}

/// Lowercase and trim surrounding whitespace.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Classify one field of a record pair.
pub fn field_verdict(field: Field, reference: &str, observed: &str) -> FieldVerdict {
    let reference = normalize(reference);
    let observed = normalize(observed);

    if reference == observed {
        return FieldVerdict::Equal;
    }

    if reference.contains(observed.as_str()) || observed.contains(reference.as_str()) {
        return FieldVerdict::MinorVariation(Variation::Containment);
    }

    if field == Field::Address
        && observed.split_whitespace().count() == reference.split_whitespace().count() + 1
    {
        return FieldVerdict::MinorVariation(Variation::InsertedWord);
    }

    FieldVerdict::Mismatch
}

/// Compare two records and score the result.
pub fn compare(reference: &Record, observed: &Record, baseline: Option<Confidence>) -> Assessment {
    let mut discrepancies = Vec::new();

    for field in Field::ALL {
        let reference_value = reference.get(field);
        let observed_value = observed.get(field);

        match field_verdict(field, reference_value, observed_value) {
            FieldVerdict::Equal => {}
            FieldVerdict::MinorVariation(variation) => {
                tracing::debug!(%field, ?variation, "Accepted minor variation");
            }
            FieldVerdict::Mismatch => discrepancies.push(Discrepancy {
                field,
                reference_value: reference_value.to_string(),
                observed_value: observed_value.to_string(),
            }),
        }
    }

    let confidence = score(discrepancies.len(), baseline);

    Assessment {
        confidence,
        discrepancies,
    }
}

/// Confidence for a discrepancy count.
///
/// With a baseline: `baseline - 5n`. Without: 95, 75, then `100 - 20n`.
/// Always clamped into `0..=100`.
pub fn score(discrepancy_count: usize, baseline: Option<Confidence>) -> Confidence {
    let n = discrepancy_count as i64;

    match baseline {
        Some(baseline) => Confidence::clamped(i64::from(baseline.value()) - n * BASELINE_PENALTY),
        None => match discrepancy_count {
            0 => Confidence::clamped(i64::from(CLEAN_CONFIDENCE)),
            1 => Confidence::clamped(i64::from(SINGLE_DISCREPANCY_CONFIDENCE)),
            _ => Confidence::clamped(100 - n * DISCREPANCY_WEIGHT),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_record() -> Record {
        Record {
            id: 1001,
            name: "Dr. Rajesh Kumar".to_string(),
            specialty: "Cardiology".to_string(),
            phone: "+91-11-2658-3456".to_string(),
            address: "A-123, Green Park".to_string(),
            city: "New Delhi".to_string(),
            state: "Delhi".to_string(),
            zip: "110016".to_string(),
            license_number: "MCI/DEL/12345/2010".to_string(),
            npi: "9876543210".to_string(),
        }
    }

    #[test]
    fn test_identical_records_score_95() {
        let record = sample_record();
        let assessment = compare(&record, &record.clone(), None);

        assert!(assessment.discrepancies.is_empty());
        assert_eq!(assessment.confidence.value(), 95);
    }

    #[test]
    fn test_single_phone_mismatch_scores_75() {
        let reference = sample_record();
        let observed = sample_record().with(Field::Phone, "+91-11-2658-3457");
        let assessment = compare(&reference, &observed, None);

        assert_eq!(assessment.discrepancy_count(), 1);
        assert!(assessment.has_discrepancy(Field::Phone));
        assert_eq!(assessment.confidence.value(), 75);
        assert_eq!(assessment.discrepancies[0].reference_value, "+91-11-2658-3456");
        assert_eq!(assessment.discrepancies[0].observed_value, "+91-11-2658-3457");
    }

    #[test]
    fn test_appended_word_in_address_accepted() {
        let reference = sample_record().with(Field::Address, "C-789, Satellite");
        let observed = sample_record().with(Field::Address, "C-789, Satellite Area");
        let assessment = compare(&reference, &observed, None);

        assert!(!assessment.has_discrepancy(Field::Address));
    }

    #[test]
    fn test_inserted_address_word_accepted() {
        assert_eq!(
            field_verdict(Field::Address, "12 Main Road", "12 Old Main Road"),
            FieldVerdict::MinorVariation(Variation::InsertedWord)
        );
        // The word-count rule is address-only.
        assert_eq!(
            field_verdict(Field::City, "12 Main Road", "12 Old Main Road"),
            FieldVerdict::Mismatch
        );
        // Observed must be the longer one.
        assert_eq!(
            field_verdict(Field::Address, "12 Old Main Road", "12 Main Road"),
            FieldVerdict::Mismatch
        );
    }

    #[test]
    fn test_reworded_address_is_discrepancy() {
        assert_eq!(
            field_verdict(Field::Address, "F-987, T. Nagar", "F-987, Thyagaraya Nagar"),
            FieldVerdict::Mismatch
        );
    }

    #[test]
    fn test_case_and_whitespace_ignored() {
        assert_eq!(
            field_verdict(Field::City, "  new delhi ", "New Delhi"),
            FieldVerdict::Equal
        );
    }

    #[test]
    fn test_loose_containment_preserved() {
        assert!(!field_verdict(Field::Zip, "1", "100-1").is_discrepancy());
        assert!(!field_verdict(Field::Phone, "", "+91-11-2658-3456").is_discrepancy());
    }

    #[test]
    fn test_discrepancies_in_field_order() {
        let reference = sample_record();
        let observed = sample_record()
            .with(Field::Npi, "0000000000")
            .with(Field::Name, "Dr. Someone Else")
            .with(Field::Phone, "+91-11-9999-0000");
        let assessment = compare(&reference, &observed, None);

        let fields: Vec<Field> = assessment.discrepancies.iter().map(|d| d.field).collect();
        assert_eq!(fields, vec![Field::Name, Field::Phone, Field::Npi]);
        assert_eq!(assessment.confidence.value(), 40);
    }

    #[test]
    fn test_empty_records_compare_clean() {
        let assessment = compare(&Record::empty(1), &Record::empty(1), None);
        assert!(assessment.discrepancies.is_empty());
        assert_eq!(assessment.confidence.value(), 95);
    }

    #[test]
    fn test_baseline_penalized_per_discrepancy() {
        assert_eq!(score(0, Some(Confidence::clamped(88))).value(), 88);
        assert_eq!(score(1, Some(Confidence::clamped(78))).value(), 73);
        assert_eq!(score(2, Some(Confidence::clamped(65))).value(), 55);
        assert_eq!(score(9, Some(Confidence::clamped(20))).value(), 0);
    }

    #[test]
    fn test_score_without_baseline() {
        assert_eq!(score(0, None).value(), 95);
        assert_eq!(score(1, None).value(), 75);
        assert_eq!(score(2, None).value(), 60);
        assert_eq!(score(5, None).value(), 0);
        assert_eq!(score(9, None).value(), 0);
    }

    #[test]
    fn test_comparator_trait_uses_baseline() {
        let pair = RecordPair {
            reference: sample_record(),
            observed: sample_record().with(Field::Phone, "+91-11-2658-3457"),
            baseline: Some(Confidence::clamped(75)),
        };
        let assessment = FieldComparator::new().compare(&pair);
        assert_eq!(assessment.confidence.value(), 70);
    }

    proptest! {
        #[test]
        fn normalized_equal_values_never_discrepant(
            value in "[A-Za-z0-9 ,./-]{0,24}",
            left_pad in " {0,3}",
            right_pad in " {0,3}",
        ) {
            let padded = format!("{}{}{}", left_pad, value.to_uppercase(), right_pad);
            for field in Field::ALL {
                prop_assert!(!field_verdict(field, &value, &padded).is_discrepancy());
            }
        }

        #[test]
        fn containment_is_symmetric(
            inner in "[a-z0-9-]{1,12}",
            prefix in "[a-z ]{0,6}",
            suffix in "[a-z ]{0,6}",
        ) {
            let outer = format!("{}{}{}", prefix, inner, suffix);
            for field in Field::ALL {
                prop_assert!(!field_verdict(field, &inner, &outer).is_discrepancy());
                prop_assert!(!field_verdict(field, &outer, &inner).is_discrepancy());
            }
        }

        #[test]
        fn confidence_always_in_range(
            count in 0usize..20,
            baseline in proptest::option::of(-50i64..200),
        ) {
            let confidence = score(count, baseline.map(Confidence::clamped));
            prop_assert!(confidence.value() <= 100);
        }
    }
}
