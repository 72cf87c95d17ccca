//! Claim records
//!
//! A claim is one recorded assertion that a predicate did or did not hold
//! within a run. `NewClaim` is what callers submit; `Claim` is what the
//! store holds once the engine has stamped it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open extension map carried alongside the core fields
pub type Attributes = Map<String, Value>;

/// A claim as submitted, before the engine assigns a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    /// Free-form description of what was checked
    pub event: String,
    pub predicate: String,
    pub passed: bool,
    /// One per execution run
    #[serde(alias = "correlationId")]
    pub correlation_id: String,
    /// Dotted classification, e.g. `domain.auth`
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl NewClaim {
    pub fn new(
        event: impl Into<String>,
        predicate: impl Into<String>,
        passed: bool,
        correlation_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            event: event.into(),
            predicate: predicate.into(),
            passed,
            correlation_id: correlation_id.into(),
            scope: scope.into(),
            channel: None,
            attributes: Attributes::new(),
        }
    }

    /// Shorthand for a passed claim
    pub fn passed(
        event: impl Into<String>,
        predicate: impl Into<String>,
        correlation_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(event, predicate, true, correlation_id, scope)
    }

    /// Shorthand for a failed claim
    pub fn failed(
        event: impl Into<String>,
        predicate: impl Into<String>,
        correlation_id: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self::new(event, predicate, false, correlation_id, scope)
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Adds an extension attribute such as `error` or `status`.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// A stored claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub event: String,
    pub predicate: String,
    pub passed: bool,
    #[serde(alias = "correlationId")]
    pub correlation_id: String,
    pub scope: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Assigned by the engine at acceptance
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub attributes: Attributes,
}

impl Claim {
    /// Stamps a submission with its acceptance time.
    pub fn stamp(claim: NewClaim, timestamp: DateTime<Utc>) -> Self {
        Self {
            event: claim.event,
            predicate: claim.predicate,
            passed: claim.passed,
            correlation_id: claim.correlation_id,
            scope: claim.scope,
            channel: claim.channel,
            timestamp,
            attributes: claim.attributes,
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}
