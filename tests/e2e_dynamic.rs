//! End-to-end tests for ad-hoc queries.
//!
//! Each test exercises: compile -> bind -> snapshot -> execute against
//! MemoryRegistries, through `QueryEngine::build_query()` and `query()`.

mod fixtures;

use fixtures::{ids, oracle, sample_asset, sample_engine, ASSET, PARTICIPANT};
use pretty_assertions::assert_eq;
use resource_query::{params, Error, Params, Value};

fn dynamic_text() -> String {
    format!("SELECT {ASSET} WHERE (stringValue == _$inputStringValue)")
}

// ============================================================================
// 1. Parameterized equality over 32 resources
// ============================================================================

#[tokio::test]
async fn test_parameter_equality_matches_oracle() {
    let engine = sample_engine(32);
    let all: Vec<_> = (0..32).map(sample_asset).collect();

    let q = engine.build_query(&dynamic_text()).unwrap();
    let hits = engine.query(q, &params([("inputStringValue", "string 0")])).await.unwrap();

    assert_eq!(hits.len(), 8);
    assert_eq!(ids(&hits), oracle(&all, "stringValue", &Value::from("string 0")));
    // Identifier order is lexicographic, not numeric.
    assert_eq!(&ids(&hits)[..3], &["ASSET_0", "ASSET_12", "ASSET_16"]);
}

// ============================================================================
// 2. Changing the parameter moves the result set exactly
// ============================================================================

#[tokio::test]
async fn test_parameter_change_moves_results() {
    let engine = sample_engine(32);
    let all: Vec<_> = (0..32).map(sample_asset).collect();
    let q = engine.build_query(&dynamic_text()).unwrap();

    let zero = engine.query(q.clone(), &params([("inputStringValue", "string 0")])).await.unwrap();
    let one = engine.query(q, &params([("inputStringValue", "string 1")])).await.unwrap();

    let (zero, one) = (ids(&zero), ids(&one));
    assert_eq!(zero, oracle(&all, "stringValue", &Value::from("string 0")));
    assert_eq!(one, oracle(&all, "stringValue", &Value::from("string 1")));
    assert!(zero.iter().all(|id| !one.contains(id)));
}

// ============================================================================
// 3. Nested concept paths
// ============================================================================

#[tokio::test]
async fn test_nested_path_is_independent_of_top_level() {
    let engine = sample_engine(8);
    let q = engine
        .build_query(&format!("SELECT {ASSET} WHERE (conceptValue.stringValue == _$v)"))
        .unwrap();
    let hits = engine.query(q, &params([("v", "string 0")])).await.unwrap();

    // (i + 1) % 4 == 0
    assert_eq!(ids(&hits), vec!["ASSET_3", "ASSET_7"]);
}

// ============================================================================
// 4. Empty and absent
// ============================================================================

#[tokio::test]
async fn test_empty_registry_gives_empty_result() {
    let engine = sample_engine(0);
    let q = engine.build_query(&dynamic_text()).unwrap();
    let hits = engine.query(q, &params([("inputStringValue", "string 0")])).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_absent_field_gives_empty_result() {
    let engine = sample_engine(8);
    let q = engine.build_query(&format!("SELECT {ASSET} WHERE (missingValue == 'string 0')")).unwrap();
    assert!(engine.query(q, &Params::new()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_declared_type_without_resources_gives_empty_result() {
    let engine = sample_engine(4);
    let q = engine.build_query(&format!("SELECT {PARTICIPANT}")).unwrap();
    assert!(engine.query(q, &Params::new()).await.unwrap().is_empty());
    assert!(engine.provider().get_or_create(PARTICIPANT).unwrap().is_empty());
}

// ============================================================================
// 5. Failures
// ============================================================================

#[tokio::test]
async fn test_missing_parameter_fails_before_registry_lookup() {
    let engine = sample_engine(4);
    // No registry exists for this type; binding must fail first.
    let q = engine.build_query("SELECT org.acme.Nothing WHERE (x == _$p)").unwrap();
    let err = engine.query(q, &Params::new()).await.unwrap_err();
    assert!(matches!(err, Error::MissingParameter(ref name) if name == "p"));
}

#[tokio::test]
async fn test_unknown_registry() {
    let engine = sample_engine(4);
    let q = engine.build_query("SELECT org.acme.Nothing").unwrap();
    let err = engine.query(q, &Params::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnknownRegistry(_)));
}

#[tokio::test]
async fn test_syntax_error_reports_position() {
    let engine = sample_engine(0);
    match engine.build_query(&format!("SELECT {ASSET} WHERE (stringValue = 'x')")) {
        Err(Error::SyntaxError { position, .. }) => assert_eq!(position, 54),
        other => panic!("Expected SyntaxError, got {other:?}"),
    }
}

// ============================================================================
// 6. Idempotence and stats
// ============================================================================

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let engine = sample_engine(32);
    let q = engine.build_query(&dynamic_text()).unwrap();
    let p = params([("inputStringValue", "string 2")]);
    let first = engine.query(q.clone(), &p).await.unwrap();
    let second = engine.query(q, &p).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_query_with_stats() {
    let engine = sample_engine(32);
    let q = engine.build_query(&dynamic_text()).unwrap();
    let result = engine
        .query_with_stats(q, &params([("inputStringValue", "string 3")]))
        .await
        .unwrap();
    assert_eq!(result.stats.scanned, 32);
    assert_eq!(result.stats.matched, 8);
}

// ============================================================================
// 7. Other field kinds
// ============================================================================

#[tokio::test]
async fn test_datetime_against_iso_string() {
    let engine = sample_engine(8);
    let q = engine
        .build_query(&format!("SELECT {ASSET} WHERE (dateTimeValue < '2017-09-12T00:00:00Z')"))
        .unwrap();
    assert_eq!(ids(&engine.query(q, &Params::new()).await.unwrap()), vec!["ASSET_0", "ASSET_1", "ASSET_2"]);
}

#[tokio::test]
async fn test_relationship_against_uri() {
    let engine = sample_engine(6);
    let q = engine
        .build_query(&format!(
            "SELECT {ASSET} WHERE (owner == 'resource:org.acme.sample.SampleParticipant#P1')"
        ))
        .unwrap();
    assert_eq!(ids(&engine.query(q, &Params::new()).await.unwrap()), vec!["ASSET_1", "ASSET_3", "ASSET_5"]);
}

#[tokio::test]
async fn test_boolean_and_numeric_conjunction() {
    let engine = sample_engine(8);
    let q = engine
        .build_query(&format!(
            "SELECT {ASSET} WHERE (booleanValue == true AND (doubleValue > 4 OR longValue == 0))"
        ))
        .unwrap();
    assert_eq!(ids(&engine.query(q, &Params::new()).await.unwrap()), vec!["ASSET_0", "ASSET_4", "ASSET_6"]);
}
