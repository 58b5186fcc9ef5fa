//! Provider records and their schema.
//!
//! Records carry a fixed field set. They are parsed from YAML/JSON and
//! validated against an embedded JSON Schema before deserialization, so an
//! unknown or missing field is an error rather than an empty string.

mod parser;
mod schema;

pub use parser::{Field, Record, RecordError};
pub use schema::validate_record_schema;
