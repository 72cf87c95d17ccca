//! Claim schema errors
//!
//! Error code: PROOF_SCHEMA_INVALID (REJECT)

use std::fmt;

use thiserror::Error;

/// What is wrong with the offending field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    /// Required field absent, null, or empty
    Missing,
    /// Field present with the wrong JSON type
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
    /// Extension attribute uses a name owned by the core record
    Reserved,
    /// The submitted claim is not a JSON object
    NotAnObject { actual: &'static str },
    /// Field and its alias both present with different values
    Conflict { alias: &'static str },
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaViolation::Missing => write!(f, "required field is missing"),
            SchemaViolation::WrongType { expected, actual } => {
                write!(f, "expected {}, got {}", expected, actual)
            }
            SchemaViolation::Reserved => write!(f, "name is reserved for the core record"),
            SchemaViolation::NotAnObject { actual } => {
                write!(f, "expected object, got {}", actual)
            }
            SchemaViolation::Conflict { alias } => {
                write!(f, "disagrees with its alias '{}'", alias)
            }
        }
    }
}

/// A claim failed the schema check; nothing was stored.
///
/// Names the first offending field only.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid claim field '{field}': {violation}")]
pub struct SchemaError {
    field: String,
    violation: SchemaViolation,
}

impl SchemaError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            violation: SchemaViolation::Missing,
        }
    }

    pub fn wrong_type(
        field: impl Into<String>,
        expected: &'static str,
        actual: &'static str,
    ) -> Self {
        Self {
            field: field.into(),
            violation: SchemaViolation::WrongType { expected, actual },
        }
    }

    pub fn reserved(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            violation: SchemaViolation::Reserved,
        }
    }

    pub fn not_an_object(actual: &'static str) -> Self {
        Self {
            field: "$root".into(),
            violation: SchemaViolation::NotAnObject { actual },
        }
    }

    pub fn conflict(field: impl Into<String>, alias: &'static str) -> Self {
        Self {
            field: field.into(),
            violation: SchemaViolation::Conflict { alias },
        }
    }

    /// The offending field
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn violation(&self) -> &SchemaViolation {
        &self.violation
    }

    pub fn code(&self) -> &'static str {
        "PROOF_SCHEMA_INVALID"
    }
}
