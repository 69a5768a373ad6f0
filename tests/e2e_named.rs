//! End-to-end tests for catalog queries and their equivalence with
//! ad-hoc queries.

mod fixtures;

use std::sync::Arc;

use fixtures::{ids, sample_asset, sample_catalog, sample_schema, ASSET};
use pretty_assertions::assert_eq;
use resource_query::{params, EngineConfig, Error, NamedQueryCatalog, Params, QueryEngine, QueryRef};

const QUERY_FILE: &str = r#"
/**
 * Sample queries
 */
query SelectByString {
  description: "Assets by top-level string"
  statement: SELECT org.acme.sample.SampleAsset WHERE (stringValue == _$inputStringValue)
}

query SelectByNestedString {
  description: "Assets by concept string"
  statement: SELECT org.acme.sample.SampleAsset WHERE (conceptValue.stringValue == _$inputStringValue)
}

query SelectAll {
  statement: SELECT org.acme.sample.SampleAsset
}
"#;

fn engine_with(catalog: NamedQueryCatalog, count: usize) -> QueryEngine<resource_query::MemoryRegistries> {
    let engine = QueryEngine::open_memory(catalog, sample_schema(), EngineConfig::default());
    engine.provider().get_or_create(ASSET).unwrap().add_all((0..count).map(sample_asset)).unwrap();
    engine
}

// ============================================================================
// 1. Named and dynamic queries agree
// ============================================================================

#[tokio::test]
async fn test_named_and_dynamic_are_equivalent() {
    let engine = engine_with(sample_catalog(), 32);
    let dynamic = engine
        .build_query(&format!("SELECT {ASSET} WHERE (stringValue == _$inputStringValue)"))
        .unwrap();

    for value in ["string 0", "string 1", "string 2", "string 3", "string 9"] {
        let p = params([("inputStringValue", value)]);
        let named = engine.query("Q1", &p).await.unwrap();
        let adhoc = engine.query(dynamic.clone(), &p).await.unwrap();
        assert_eq!(named, adhoc, "diverged for {value}");
    }
}

#[tokio::test]
async fn test_compiled_query_can_be_shared() {
    let engine = engine_with(sample_catalog(), 8);
    let q = Arc::new(engine.build_query(&format!("SELECT {ASSET} WHERE (integerValue >= 6)")).unwrap());
    let first = engine.query(Arc::clone(&q), &Params::new()).await.unwrap();
    let second = engine.query(QueryRef::Compiled(q), &Params::new()).await.unwrap();
    assert_eq!(ids(&first), vec!["ASSET_6", "ASSET_7"]);
    assert_eq!(first, second);
}

// ============================================================================
// 2. Failures
// ============================================================================

#[tokio::test]
async fn test_unknown_query() {
    let engine = engine_with(sample_catalog(), 4);
    let err = engine.query("Q404", &Params::new()).await.unwrap_err();
    assert!(matches!(err, Error::UnknownQuery(ref name) if name == "Q404"));
}

#[tokio::test]
async fn test_named_query_missing_parameter() {
    let engine = engine_with(sample_catalog(), 4);
    let err = engine.query("Q1", &params([("somethingElse", "string 0")])).await.unwrap_err();
    assert!(matches!(err, Error::MissingParameter(ref name) if name == "inputStringValue"));
}

#[test]
fn test_redefinition_is_rejected() {
    let mut catalog = sample_catalog();
    let err = catalog.define("Q1", ASSET, "(integerValue == 1)").unwrap_err();
    assert!(matches!(err, Error::DuplicateQuery(_)));
}

// ============================================================================
// 3. Query definition files
// ============================================================================

#[tokio::test]
async fn test_query_file_round_trip() {
    let mut catalog = NamedQueryCatalog::new();
    assert_eq!(catalog.load_definitions(QUERY_FILE).unwrap(), 3);
    assert_eq!(catalog.description("SelectByString"), Some("Assets by top-level string"));
    assert_eq!(catalog.description("SelectAll"), None);

    let engine = engine_with(catalog, 8);
    let p = params([("inputStringValue", "string 0")]);
    assert_eq!(ids(&engine.query("SelectByString", &p).await.unwrap()), vec!["ASSET_0", "ASSET_4"]);
    assert_eq!(ids(&engine.query("SelectByNestedString", &p).await.unwrap()), vec!["ASSET_3", "ASSET_7"]);
    assert_eq!(engine.query("SelectAll", &Params::new()).await.unwrap().len(), 8);
}

#[test]
fn test_query_file_syntax_error_loads_nothing() {
    let mut catalog = NamedQueryCatalog::new();
    let broken = "query Good { statement: SELECT a.B }\nquery Bad { statement: SELECT a.B WHERE (x = 1) }";
    assert!(matches!(catalog.load_definitions(broken), Err(Error::SyntaxError { .. })));
    assert!(catalog.is_empty());
}
