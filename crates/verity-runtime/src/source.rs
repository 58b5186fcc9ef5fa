//! Record sources: where reference and observed records come from.
//!
//! In a real deployment the reference record comes from the provider
//! database and the observed record from a web scrape. The shipped
//! [`FixtureSource`] serves both from a YAML fixture table.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use verity_core::{Confidence, ProviderId, Record, RecordError, RecordPair};

/// Fixture table compiled into the binary.
const BUILTIN_FIXTURES: &str = include_str!("../fixtures/providers.yaml");

/// Errors from record sources.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read fixture file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse fixtures: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid record: {0}")]
    Record(#[from] RecordError),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("No record found for provider {0}")]
    NotFound(ProviderId),

    #[error("Record source unavailable: {0}")]
    Unavailable(String),
}

/// A system-of-record entry with its optional baseline hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceRecord {
    pub record: Record,
    pub baseline: Option<Confidence>,
}

/// Supplies the two records compared for a provider.
///
/// # Contract
/// - Both methods are idempotent for the same id
/// - Returned records carry the requested id
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Fetch the system-of-record entry.
    async fn fetch_reference(&self, id: ProviderId) -> Result<ReferenceRecord, SourceError>;

    /// Fetch the independently observed entry.
    async fn fetch_observed(&self, id: ProviderId) -> Result<Record, SourceError>;

    /// Fetch both records as a pair.
    async fn fetch_pair(&self, id: ProviderId) -> Result<RecordPair, SourceError> {
        let reference = self.fetch_reference(id).await?;
        let observed = self.fetch_observed(id).await?;
        Ok(RecordPair {
            reference: reference.record,
            observed,
            baseline: reference.baseline,
        })
    }
}

/// A single fixture scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Short description of what the scenario exercises
    pub scenario: String,
    pub baseline: Option<Confidence>,
    pub reference: Record,
    pub observed: Record,
}

impl Fixture {
    fn for_id(&self, id: u64) -> Self {
        let mut fixture = self.clone();
        fixture.reference.id = id;
        fixture.observed.id = id;
        fixture
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixture {
    scenario: String,
    #[serde(default)]
    baseline: Option<i64>,
    reference: serde_json::Value,
    observed: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFixtureFile {
    #[serde(default)]
    providers: Vec<RawFixture>,
    #[serde(default)]
    fallback: Option<RawFixture>,
}

impl TryFrom<RawFixture> for Fixture {
    type Error = SourceError;

    fn try_from(raw: RawFixture) -> Result<Self, Self::Error> {
        let reference = Record::from_value(raw.reference)?;
        let observed = Record::from_value(raw.observed)?;

        if reference.id != observed.id {
            return Err(SourceError::InvalidFixture(format!(
                "scenario '{}': reference id {} does not match observed id {}",
                raw.scenario, reference.id, observed.id
            )));
        }

        Ok(Self {
            scenario: raw.scenario,
            baseline: raw.baseline.map(Confidence::clamped),
            reference,
            observed,
        })
    }
}

/// Record source backed by a fixture table.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    entries: BTreeMap<u64, Fixture>,
    fallback: Option<Fixture>,
}

impl FixtureSource {
    /// The fixture table compiled into the binary.
    pub fn builtin() -> Result<Self, SourceError> {
        Self::from_yaml(BUILTIN_FIXTURES)
    }

    /// Parse a fixture table from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, SourceError> {
        let raw: RawFixtureFile = serde_yaml::from_str(yaml)?;

        let mut entries = BTreeMap::new();
        for raw_fixture in raw.providers {
            let fixture = Fixture::try_from(raw_fixture)?;
            let id = fixture.reference.id;
            if id == 0 {
                return Err(SourceError::InvalidFixture(format!(
                    "scenario '{}': provider id must be positive",
                    fixture.scenario
                )));
            }
            if entries.insert(id, fixture).is_some() {
                return Err(SourceError::InvalidFixture(format!(
                    "Duplicate provider id: {}",
                    id
                )));
            }
        }

        let fallback = raw.fallback.map(Fixture::try_from).transpose()?;

        Ok(Self { entries, fallback })
    }

    /// Parse a fixture table from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Look up the fixture for an id, falling back to the template entry.
    pub fn lookup(&self, id: ProviderId) -> Result<Fixture, SourceError> {
        if let Some(fixture) = self.entries.get(&id.get()) {
            return Ok(fixture.clone());
        }

        self.fallback
            .as_ref()
            .map(|fallback| fallback.for_id(id.get()))
            .ok_or(SourceError::NotFound(id))
    }

    /// Listed fixtures in id order.
    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.entries.values()
    }

    /// The template served for unlisted ids, if any.
    pub fn fallback(&self) -> Option<&Fixture> {
        self.fallback.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RecordSource for FixtureSource {
    fn name(&self) -> &str {
        "fixtures"
    }

    async fn fetch_reference(&self, id: ProviderId) -> Result<ReferenceRecord, SourceError> {
        let fixture = self.lookup(id)?;
        Ok(ReferenceRecord {
            record: fixture.reference,
            baseline: fixture.baseline,
        })
    }

    async fn fetch_observed(&self, id: ProviderId) -> Result<Record, SourceError> {
        Ok(self.lookup(id)?.observed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: i64) -> ProviderId {
        ProviderId::try_from(raw).unwrap()
    }

    #[test]
    fn test_builtin_fixtures_load() {
        let source = FixtureSource::builtin().unwrap();
        assert_eq!(source.len(), 8);
        assert!(source.fallback().is_some());

        let ids: Vec<u64> = source.fixtures().map(|f| f.reference.id).collect();
        assert_eq!(ids, vec![1001, 1002, 1003, 2001, 2002, 3001, 3002, 4001]);
    }

    #[test]
    fn test_lookup_known_id() {
        let source = FixtureSource::builtin().unwrap();
        let fixture = source.lookup(id(2001)).unwrap();

        assert_eq!(fixture.reference.name, "Dr. Anjali Reddy");
        assert_eq!(fixture.observed.phone, "+91-40-2789-4568");
        assert_eq!(fixture.baseline, Some(Confidence::clamped(78)));
    }

    #[test]
    fn test_fallback_takes_requested_id() {
        let source = FixtureSource::builtin().unwrap();
        let fixture = source.lookup(id(77)).unwrap();

        assert_eq!(fixture.reference.id, 77);
        assert_eq!(fixture.observed.id, 77);
        assert_eq!(fixture.reference.name, "Dr. Arjun Mehta");
    }

    #[test]
    fn test_missing_fallback_is_not_found() {
        let source = FixtureSource::from_yaml("providers: []\n").unwrap();
        assert!(matches!(source.lookup(id(5)), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_mismatched_ids_rejected() {
        let yaml = r#"
providers:
  - scenario: "Broken"
    reference: { id: 1, name: "", specialty: "", phone: "", address: "", city: "", state: "", zip: "", license_number: "", npi: "" }
    observed: { id: 2, name: "", specialty: "", phone: "", address: "", city: "", state: "", zip: "", license_number: "", npi: "" }
"#;
        let result = FixtureSource::from_yaml(yaml);
        assert!(matches!(result, Err(SourceError::InvalidFixture(_))));
    }

    #[test]
    fn test_fixture_record_schema_enforced() {
        let yaml = r#"
providers:
  - scenario: "Missing fields"
    reference: { id: 1, name: "Dr. A" }
    observed: { id: 1, name: "Dr. A" }
"#;
        let result = FixtureSource::from_yaml(yaml);
        assert!(matches!(result, Err(SourceError::Record(_))));
    }

    #[test]
    fn test_baseline_clamped() {
        let yaml = r#"
providers:
  - scenario: "Overconfident"
    baseline: 140
    reference: { id: 9, name: "", specialty: "", phone: "", address: "", city: "", state: "", zip: "", license_number: "", npi: "" }
    observed: { id: 9, name: "", specialty: "", phone: "", address: "", city: "", state: "", zip: "", license_number: "", npi: "" }
"#;
        let source = FixtureSource::from_yaml(yaml).unwrap();
        assert_eq!(source.lookup(id(9)).unwrap().baseline, Some(Confidence::MAX));
    }

    #[tokio::test]
    async fn test_fetch_pair_combines_records() {
        let source = FixtureSource::builtin().unwrap();
        let pair = source.fetch_pair(id(1003)).await.unwrap();

        assert_eq!(pair.reference.address, "C-789, Satellite");
        assert_eq!(pair.observed.address, "C-789, Satellite Area");
        assert_eq!(pair.baseline, Some(Confidence::clamped(88)));
    }
}
