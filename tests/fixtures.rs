//! Sample business network shared by the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use resource_query::{
    ClassDecl, Concept, EngineConfig, FieldDecl, FieldKind, MemoryRegistries, NamedQueryCatalog,
    QueryEngine, RelationshipRef, Resource, Schema, Value,
};

pub const ASSET: &str = "org.acme.sample.SampleAsset";
pub const CONCEPT: &str = "org.acme.sample.SampleConcept";
pub const PARTICIPANT: &str = "org.acme.sample.SampleParticipant";

pub fn sample_schema() -> Arc<Schema> {
    let mut schema = Schema::new();
    schema
        .add_class(ClassDecl::concept(CONCEPT).with_field(FieldDecl::new("stringValue", FieldKind::String)))
        .add_class(
            ClassDecl::resource(PARTICIPANT, "participantId")
                .with_field(FieldDecl::new("name", FieldKind::String)),
        )
        .add_class(
            ClassDecl::resource(ASSET, "assetId")
                .with_field(FieldDecl::new("stringValue", FieldKind::String))
                .with_field(FieldDecl::new("integerValue", FieldKind::Integer))
                .with_field(FieldDecl::new("longValue", FieldKind::Long).optional())
                .with_field(FieldDecl::new("doubleValue", FieldKind::Double).optional())
                .with_field(FieldDecl::new("booleanValue", FieldKind::Boolean).optional())
                .with_field(FieldDecl::new("dateTimeValue", FieldKind::DateTime).optional())
                .with_field(FieldDecl::new("conceptValue", FieldKind::Concept(CONCEPT.into())).optional())
                .with_field(FieldDecl::new("owner", FieldKind::Relationship(PARTICIPANT.into())).optional()),
        );
    Arc::new(schema)
}

/// `ASSET_{i}` with `stringValue = "string {i % 4}"` and a nested concept
/// whose `stringValue` is shifted by one.
pub fn sample_asset(i: usize) -> Resource {
    let base = Utc.with_ymd_and_hms(2017, 9, 9, 0, 0, 0).unwrap();
    Resource::new(ASSET, "assetId", format!("ASSET_{i}"))
        .with_field("stringValue", format!("string {}", i % 4))
        .with_field("integerValue", i as i32)
        .with_field("longValue", (i as i64) * 1_000_000_000)
        .with_field("doubleValue", i as f64 + 0.5)
        .with_field("booleanValue", i % 2 == 0)
        .with_field("dateTimeValue", base + Duration::days(i as i64))
        .with_field(
            "conceptValue",
            Concept::new(CONCEPT).with_field("stringValue", format!("string {}", (i + 1) % 4)),
        )
        .with_field("owner", RelationshipRef::new(PARTICIPANT, format!("P{}", i % 2)))
}

pub fn sample_catalog() -> NamedQueryCatalog {
    let mut catalog = NamedQueryCatalog::new();
    catalog.define("Q1", ASSET, "(stringValue == _$inputStringValue)").unwrap();
    catalog
}

/// Strict engine with `count` sample assets in the asset registry.
pub fn sample_engine(count: usize) -> QueryEngine<MemoryRegistries> {
    let engine = QueryEngine::open_memory(sample_catalog(), sample_schema(), EngineConfig::default());
    let registry = engine.provider().get_or_create(ASSET).unwrap();
    registry.add_all((0..count).map(sample_asset)).unwrap();
    engine
}

/// Ids of `resources` whose top-level `key` equals `expected`, sorted.
pub fn oracle(resources: &[Resource], key: &str, expected: &Value) -> Vec<String> {
    let mut ids: Vec<String> = resources
        .iter()
        .filter(|r| r.get(key) == Some(expected))
        .map(|r| r.id().to_string())
        .collect();
    ids.sort();
    ids
}

pub fn ids(resources: &[Resource]) -> Vec<String> {
    resources.iter().map(|r| r.id().to_string()).collect()
}
