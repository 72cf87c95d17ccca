//! Claim Validation Tests
//!
//! Submission-time guarantees of the engine:
//! 1. Schema rejection stores nothing
//! 2. A passed claim needs every parent passed earlier in the run
//! 3. Failed claims bypass the hierarchy check
//! 4. Parents are per run, never shared across runs

use prooflog::claim::NewClaim;
use prooflog::config::EngineConfig;
use prooflog::observability::Severity;
use prooflog::validator::ClaimError;
use prooflog::Engine;
use serde_json::json;

fn engine() -> Engine {
    Engine::with_config(&EngineConfig {
        min_log_severity: Severity::Fatal,
        ..EngineConfig::default()
    })
}

/// A <- B
fn chain_engine() -> Engine {
    let engine = engine();
    engine.register("A", &[]).unwrap();
    engine.register("B", &["A"]).unwrap();
    engine
}

// =============================================================================
// SCHEMA
// =============================================================================

/// Test: A record without a scope never reaches the store.
#[test]
fn test_missing_scope_rejected() {
    let engine = chain_engine();

    let err = engine
        .log_json(&json!({
            "event": "auth checked",
            "predicate": "A",
            "passed": true,
            "correlation_id": "r1"
        }))
        .unwrap_err();

    assert!(err.is_schema());
    assert_eq!(err.code(), "PROOF_SCHEMA_INVALID");
    assert!(err.to_string().contains("scope"));
    assert!(engine.get_logs_for_run("r1").unwrap().is_empty());
    assert!(engine.run_ids().is_empty());
}

/// Test: A bare predicate/outcome pair names the first missing field.
#[test]
fn test_bare_record_rejected() {
    let engine = chain_engine();

    let err = engine.log_json(&json!({ "predicate": "x", "passed": true })).unwrap_err();
    match &err {
        ClaimError::Schema(e) => assert_eq!(e.field(), "event"),
        other => panic!("expected schema error, got {:?}", other),
    }
    assert!(engine.run_ids().is_empty());
}

/// Test: `passed` must be a real boolean.
#[test]
fn test_string_passed_rejected() {
    let engine = chain_engine();

    let err = engine
        .log_json(&json!({
            "event": "e",
            "predicate": "A",
            "passed": "true",
            "correlation_id": "r1",
            "scope": "domain.auth"
        }))
        .unwrap_err();

    match err {
        ClaimError::Schema(e) => assert_eq!(e.field(), "passed"),
        other => panic!("expected schema error, got {:?}", other),
    }
    assert!(engine.get_logs_for_run("r1").unwrap().is_empty());
}

/// Test: Empty identifiers count as missing.
#[test]
fn test_empty_correlation_id_rejected() {
    let engine = chain_engine();
    let err = engine.log(NewClaim::passed("e", "A", "", "domain.auth")).unwrap_err();
    assert!(err.is_schema());
}

/// Test: The camelCase alias is honoured but may not contradict the canonical name.
#[test]
fn test_correlation_alias_handling() {
    let engine = chain_engine();

    engine
        .log_json(&json!({
            "event": "e",
            "predicate": "A",
            "passed": true,
            "correlation_id": null,
            "correlationId": "r1",
            "scope": "domain.auth"
        }))
        .unwrap();
    assert_eq!(engine.get_logs_for_run("r1").unwrap().len(), 1);

    let err = engine
        .log_json(&json!({
            "event": "e",
            "predicate": "A",
            "passed": true,
            "correlation_id": "r1",
            "correlationId": "r2",
            "scope": "domain.auth"
        }))
        .unwrap_err();
    assert!(err.is_schema());
    assert_eq!(engine.get_logs_for_run("r1").unwrap().len(), 1);
    assert!(engine.get_logs_for_run("r2").unwrap().is_empty());
}

/// Test: Extension attributes are kept; reserved names are not allowed.
#[test]
fn test_extension_attributes() {
    let engine = chain_engine();

    engine
        .log_json(&json!({
            "event": "token valid",
            "predicate": "A",
            "passed": true,
            "correlationId": "r1",
            "scope": "domain.auth",
            "channel": "ops",
            "user": "u-17",
            "latency_ms": 42
        }))
        .unwrap();

    let logs = engine.get_logs_for_run("r1").unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].channel.as_deref(), Some("ops"));
    assert_eq!(logs[0].attribute("user"), Some(&json!("u-17")));
    assert_eq!(logs[0].attribute("latency_ms"), Some(&json!(42)));

    let stamped =
        NewClaim::passed("e", "A", "r1", "domain.auth").with_attribute("timestamp", "now");
    let err = engine.log(stamped).unwrap_err();
    assert!(err.is_schema());
    assert_eq!(engine.get_logs_for_run("r1").unwrap().len(), 1);
}

// =============================================================================
// HIERARCHY ORDER
// =============================================================================

/// Test: B before A is rejected, naming both predicates; A alone is stored.
#[test]
fn test_child_before_parent_rejected() {
    let engine = chain_engine();

    let err = engine.log(NewClaim::passed("fetched", "B", "r1", "domain.io")).unwrap_err();
    assert!(err.is_hierarchy());
    assert_eq!(err.code(), "PROOF_HIERARCHY_VIOLATION");

    let message = err.to_string();
    assert!(message.contains("'B'"));
    assert!(message.contains("A"));

    match &err {
        ClaimError::Hierarchy(v) => {
            assert_eq!(v.predicate, "B");
            assert_eq!(v.correlation_id, "r1");
            assert_eq!(v.missing, vec!["A".to_string()]);
        }
        other => panic!("expected hierarchy violation, got {:?}", other),
    }

    engine.log(NewClaim::passed("authed", "A", "r1", "domain.auth")).unwrap();

    let logs = engine.get_logs_for_run("r1").unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0].predicate, "A");
}

/// Test: A then B is accepted and stored in that order.
#[test]
fn test_parent_then_child_accepted() {
    let engine = chain_engine();

    engine.log(NewClaim::passed("authed", "A", "r1", "domain.auth")).unwrap();
    engine.log(NewClaim::passed("fetched", "B", "r1", "domain.io")).unwrap();

    let predicates: Vec<String> = engine
        .get_logs_for_run("r1")
        .unwrap()
        .into_iter()
        .map(|c| c.predicate)
        .collect();
    assert_eq!(predicates, vec!["A", "B"]);
}

/// Test: A failed A does not satisfy B.
#[test]
fn test_failed_parent_does_not_count() {
    let engine = chain_engine();

    engine.log(NewClaim::failed("auth failed", "A", "r1", "domain.auth")).unwrap();
    let err = engine.log(NewClaim::passed("fetched", "B", "r1", "domain.io")).unwrap_err();
    assert!(err.is_hierarchy());
}

/// Test: Failed claims are accepted with no parents present.
#[test]
fn test_failure_bypasses_hierarchy() {
    let engine = chain_engine();

    engine.log(NewClaim::failed("fetch failed", "B", "r1", "domain.io")).unwrap();

    let logs = engine.get_logs_for_run("r1").unwrap();
    assert_eq!(logs.len(), 1);
    assert!(!logs[0].passed);
}

/// Test: Every parent must hold, not just one.
#[test]
fn test_parents_are_conjunctive() {
    let engine = engine();
    engine.register("A", &[]).unwrap();
    engine.register("C", &[]).unwrap();
    engine.register("B", &["A", "C"]).unwrap();

    engine.log(NewClaim::passed("e", "A", "r1", "s")).unwrap();
    let err = engine.log(NewClaim::passed("e", "B", "r1", "s")).unwrap_err();
    match err {
        ClaimError::Hierarchy(v) => assert_eq!(v.missing, vec!["C".to_string()]),
        other => panic!("expected hierarchy violation, got {:?}", other),
    }

    engine.log(NewClaim::passed("e", "C", "r1", "s")).unwrap();
    engine.log(NewClaim::passed("e", "B", "r1", "s")).unwrap();
    assert_eq!(engine.get_logs_for_run("r1").unwrap().len(), 3);
}

/// Test: A parent held in one run does not satisfy another run.
#[test]
fn test_parents_scoped_to_run() {
    let engine = chain_engine();

    engine.log(NewClaim::passed("e", "A", "r1", "s")).unwrap();
    assert!(engine.log(NewClaim::passed("e", "B", "r2", "s")).is_err());
    assert!(engine.get_logs_for_run("r2").unwrap().is_empty());
}

/// Test: Predicates never registered have no prerequisites.
#[test]
fn test_unregistered_predicate_accepted() {
    let engine = chain_engine();
    engine.log(NewClaim::passed("e", "cache_warm", "r1", "domain.cache")).unwrap();
    assert_eq!(engine.get_logs_for_run("r1").unwrap().len(), 1);
}

/// Test: Rejections are counted by kind.
#[test]
fn test_rejection_metrics() {
    let engine = chain_engine();

    let _ = engine.log(NewClaim::passed("e", "B", "r1", "s"));
    let _ = engine.log_json(&json!({ "event": "e" }));
    engine.log(NewClaim::passed("e", "A", "r1", "s")).unwrap();

    let snap = engine.metrics();
    assert_eq!(snap.claims_accepted, 1);
    assert_eq!(snap.claims_rejected_hierarchy, 1);
    assert_eq!(snap.claims_rejected_schema, 1);
}
