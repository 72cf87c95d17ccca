//! Claim schema check
//!
//! Required fields, checked in this order:
//! - event (string)
//! - predicate (string)
//! - passed (bool, no coercion)
//! - correlation_id (string, `correlationId` accepted as an alias)
//! - scope (string)
//!
//! `channel` is optional but must be a string when present. Every other
//! key becomes an extension attribute. Empty strings count as missing.
//! `timestamp` is engine-assigned and may not be supplied.

use serde_json::{Map, Value};

use super::errors::SchemaError;
use super::types::{Attributes, NewClaim};

/// Field names owned by the core claim record
pub const RESERVED_FIELDS: [&str; 7] = [
    "event",
    "predicate",
    "passed",
    "correlation_id",
    "scope",
    "channel",
    "timestamp",
];

const CORRELATION_ALIAS: &str = "correlationId";

/// Checks a typed submission.
pub fn check_claim(claim: &NewClaim) -> Result<(), SchemaError> {
    require_non_empty("event", &claim.event)?;
    require_non_empty("predicate", &claim.predicate)?;
    require_non_empty("correlation_id", &claim.correlation_id)?;
    require_non_empty("scope", &claim.scope)?;

    for key in claim.attributes.keys() {
        if is_reserved(key) {
            return Err(SchemaError::reserved(key.as_str()));
        }
    }

    Ok(())
}

/// Checks a raw JSON claim and converts it into a submission.
pub fn parse_claim(value: &Value) -> Result<NewClaim, SchemaError> {
    let obj = value
        .as_object()
        .ok_or_else(|| SchemaError::not_an_object(json_type_name(value)))?;

    let event = require_string(obj.get("event"), "event")?;
    let predicate = require_string(obj.get("predicate"), "predicate")?;
    let passed = require_bool(obj.get("passed"), "passed")?;
    let correlation_id = require_string(correlation_value(obj)?, "correlation_id")?;
    let scope = require_string(obj.get("scope"), "scope")?;

    let channel = match obj.get("channel") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            return Err(SchemaError::wrong_type("channel", "string", json_type_name(other)))
        }
    };

    if obj.contains_key("timestamp") {
        return Err(SchemaError::reserved("timestamp"));
    }

    let mut attributes = Attributes::new();
    for (key, val) in obj {
        if is_reserved(key) || key == CORRELATION_ALIAS {
            continue;
        }
        attributes.insert(key.clone(), val.clone());
    }

    Ok(NewClaim {
        event,
        predicate,
        passed,
        correlation_id,
        scope,
        channel,
        attributes,
    })
}

/// The first non-null of `correlation_id` and its alias; both set to
/// different values is a conflict.
fn correlation_value(obj: &Map<String, Value>) -> Result<Option<&Value>, SchemaError> {
    let canonical = obj.get("correlation_id").filter(|v| !v.is_null());
    let alias = obj.get(CORRELATION_ALIAS).filter(|v| !v.is_null());
    match (canonical, alias) {
        (Some(a), Some(b)) if a != b => {
            Err(SchemaError::conflict("correlation_id", CORRELATION_ALIAS))
        }
        (Some(v), _) | (None, Some(v)) => Ok(Some(v)),
        (None, None) => Ok(None),
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_FIELDS.contains(&key)
}

fn require_non_empty(field: &str, value: &str) -> Result<(), SchemaError> {
    if value.is_empty() {
        return Err(SchemaError::missing(field));
    }
    Ok(())
}

fn require_string(value: Option<&Value>, field: &str) -> Result<String, SchemaError> {
    match value {
        None | Some(Value::Null) => Err(SchemaError::missing(field)),
        Some(Value::String(s)) if s.is_empty() => Err(SchemaError::missing(field)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(SchemaError::wrong_type(field, "string", json_type_name(other))),
    }
}

fn require_bool(value: Option<&Value>, field: &str) -> Result<bool, SchemaError> {
    match value {
        None | Some(Value::Null) => Err(SchemaError::missing(field)),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(SchemaError::wrong_type(field, "bool", json_type_name(other))),
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::SchemaViolation;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "event": "user authenticated",
            "predicate": "auth_ok",
            "passed": true,
            "correlation_id": "r1",
            "scope": "domain.auth"
        })
    }

    #[test]
    fn test_valid_claim_parses() {
        let claim = parse_claim(&valid()).unwrap();
        assert_eq!(claim.predicate, "auth_ok");
        assert!(claim.passed);
        assert!(claim.channel.is_none());
        assert!(claim.attributes.is_empty());
    }

    #[test]
    fn test_first_missing_field_named() {
        let err = parse_claim(&json!({ "predicate": "x", "passed": true })).unwrap_err();
        assert_eq!(err.field(), "event");
        assert_eq!(err.violation(), &SchemaViolation::Missing);
    }

    #[test]
    fn test_passed_must_be_bool() {
        let mut doc = valid();
        doc["passed"] = json!("true");
        let err = parse_claim(&doc).unwrap_err();
        assert_eq!(err.field(), "passed");
        assert_eq!(
            err.violation(),
            &SchemaViolation::WrongType { expected: "bool", actual: "string" }
        );

        doc["passed"] = json!(1);
        assert_eq!(parse_claim(&doc).unwrap_err().field(), "passed");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let mut doc = valid();
        doc["scope"] = Value::Null;
        let err = parse_claim(&doc).unwrap_err();
        assert_eq!(err.field(), "scope");
        assert_eq!(err.violation(), &SchemaViolation::Missing);
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut doc = valid();
        doc["correlation_id"] = json!("");
        assert_eq!(parse_claim(&doc).unwrap_err().field(), "correlation_id");
    }

    #[test]
    fn test_camel_case_correlation_alias() {
        let doc = json!({
            "event": "e",
            "predicate": "p",
            "passed": false,
            "correlationId": "r7",
            "scope": "s"
        });
        let claim = parse_claim(&doc).unwrap();
        assert_eq!(claim.correlation_id, "r7");
        assert!(claim.attributes.is_empty());
    }

    #[test]
    fn test_extra_fields_become_attributes() {
        let mut doc = valid();
        doc["error"] = json!("timeout");
        doc["status"] = json!(200);
        doc["channel"] = json!("api");
        let claim = parse_claim(&doc).unwrap();
        assert_eq!(claim.channel.as_deref(), Some("api"));
        assert_eq!(claim.attributes.len(), 2);
        assert_eq!(claim.attributes["status"], json!(200));
    }

    #[test]
    fn test_channel_must_be_string() {
        let mut doc = valid();
        doc["channel"] = json!(3);
        assert_eq!(parse_claim(&doc).unwrap_err().field(), "channel");
    }

    #[test]
    fn test_client_timestamp_rejected() {
        let mut doc = valid();
        doc["timestamp"] = json!("2024-01-01T00:00:00Z");
        let err = parse_claim(&doc).unwrap_err();
        assert_eq!(err.field(), "timestamp");
        assert_eq!(err.violation(), &SchemaViolation::Reserved);
    }

    #[test]
    fn test_non_object_rejected() {
        let err = parse_claim(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field(), "$root");
    }

    #[test]
    fn test_typed_check_rejects_reserved_attribute() {
        let claim = NewClaim::passed("e", "p", "r1", "s").with_attribute("predicate", "other");
        let err = check_claim(&claim).unwrap_err();
        assert_eq!(err.field(), "predicate");
        assert_eq!(err.violation(), &SchemaViolation::Reserved);
    }

    #[test]
    fn test_typed_check_field_order() {
        let claim = NewClaim::new("", "", true, "", "");
        assert_eq!(check_claim(&claim).unwrap_err().field(), "event");

        let claim = NewClaim::new("e", "p", true, "r1", "");
        assert_eq!(check_claim(&claim).unwrap_err().field(), "scope");
    }

    #[test]
    fn test_null_correlation_id_falls_back_to_alias() {
        let mut doc = valid();
        doc["correlation_id"] = Value::Null;
        doc["correlationId"] = json!("r7");

        let claim = parse_claim(&doc).unwrap();
        assert_eq!(claim.correlation_id, "r7");
        assert!(claim.attributes.is_empty());
    }

    #[test]
    fn test_conflicting_correlation_ids_rejected() {
        let mut doc = valid();
        doc["correlationId"] = json!("r2");

        let err = parse_claim(&doc).unwrap_err();
        assert_eq!(err.field(), "correlation_id");
        assert_eq!(
            err.violation(),
            &SchemaViolation::Conflict { alias: "correlationId" }
        );

        doc["correlationId"] = json!("r1");
        assert_eq!(parse_claim(&doc).unwrap().correlation_id, "r1");
    }
}
