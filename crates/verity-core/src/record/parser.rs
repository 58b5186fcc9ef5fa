//! Record parsing from YAML/JSON.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::schema::validate_record_schema;

/// Errors that can occur when parsing records.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read record file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Record does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),
}

/// The fixed set of compared provider fields, in comparison order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Specialty,
    Phone,
    Address,
    City,
    State,
    Zip,
    LicenseNumber,
    Npi,
}

impl Field {
    /// Every field, in the order discrepancies are reported.
    pub const ALL: [Field; 9] = [
        Field::Name,
        Field::Specialty,
        Field::Phone,
        Field::Address,
        Field::City,
        Field::State,
        Field::Zip,
        Field::LicenseNumber,
        Field::Npi,
    ];

    /// Wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Specialty => "specialty",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::City => "city",
            Field::State => "state",
            Field::Zip => "zip",
            Field::LicenseNumber => "license_number",
            Field::Npi => "npi",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A provider directory record.
///
/// Serializes as a flat map keyed by field name, which is also the shape
/// returned as `reference_data` / `observed_data` over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Record {
    /// Provider identifier
    pub id: u64,

    #[serde(deserialize_with = "coerce_to_string")]
    pub name: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub specialty: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub phone: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub address: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub city: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub state: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub zip: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub license_number: String,

    #[serde(deserialize_with = "coerce_to_string")]
    pub npi: String,
}

impl Record {
    /// A record with every field empty.
    pub fn empty(id: u64) -> Self {
        Self {
            id,
            name: String::new(),
            specialty: String::new(),
            phone: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            license_number: String::new(),
            npi: String::new(),
        }
    }

    /// Value of a field.
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Specialty => &self.specialty,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::City => &self.city,
            Field::State => &self.state,
            Field::Zip => &self.zip,
            Field::LicenseNumber => &self.license_number,
            Field::Npi => &self.npi,
        }
    }

    /// Replace the value of a field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Specialty => &mut self.specialty,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::City => &mut self.city,
            Field::State => &mut self.state,
            Field::Zip => &mut self.zip,
            Field::LicenseNumber => &mut self.license_number,
            Field::Npi => &mut self.npi,
        };
        *slot = value.into();
    }

    /// Builder-style variant of [`Record::set`].
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Parse a record from a JSON value, validating it against the schema first.
    pub fn from_value(value: serde_json::Value) -> Result<Self, RecordError> {
        validate_record_schema(&value).map_err(RecordError::SchemaError)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Parse a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse a record from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, RecordError> {
        let value: serde_json::Value = serde_yaml::from_str(yaml)?;
        Self::from_value(value)
    }

    /// Parse a record file. `.yaml` / `.yml` are read as YAML, anything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents),
            _ => Self::from_json(&contents),
        }
    }
}

/// Accept strings as-is and numbers in text form.
///
/// Integers are written in decimal. Floats keep their decimal point, so
/// `110016.0` becomes `"110016.0"` rather than collapsing to the integer
/// spelling; very large or small floats use exponent form (`1e20`).
fn coerce_to_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FieldValue {
        Text(String),
        Unsigned(u64),
        Signed(i64),
        Float(f64),
    }

    Ok(match FieldValue::deserialize(deserializer)? {
        FieldValue::Text(s) => s,
        FieldValue::Unsigned(n) => n.to_string(),
        FieldValue::Signed(n) => n.to_string(),
        FieldValue::Float(n) => format!("{:?}", n),
    })
}
