//! # resource-query: Typed Resource Query Engine
//!
//! Selects resources of one declared type from their registry, in ascending
//! identifier order, using either a named query from a catalog or an ad-hoc
//! query string. Both kinds compile to the same `CompiledQuery`.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `RegistryProvider` is the contract between the engine and registry storage
//! 2. **One compiled form**: named and dynamic queries share binder and executor
//! 3. **Compiler owns nothing**: query text → `CompiledQuery` is a pure function
//! 4. **Absent is not an error**: an unresolvable path simply does not match
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use resource_query::{params, EngineConfig, NamedQueryCatalog, QueryEngine, Resource, Schema};
//!
//! # async fn example() -> resource_query::Result<()> {
//! let mut catalog = NamedQueryCatalog::new();
//! catalog.define(
//!     "Q1",
//!     "org.acme.sample.SampleAsset",
//!     "(stringValue == _$inputStringValue)",
//! )?;
//!
//! let engine = QueryEngine::open_memory(catalog, Arc::new(Schema::new()), EngineConfig::lenient());
//! let registry = engine.provider().get_or_create("org.acme.sample.SampleAsset")?;
//! registry.add(
//!     Resource::new("org.acme.sample.SampleAsset", "assetId", "ASSET_0")
//!         .with_field("stringValue", "string 0"),
//! )?;
//!
//! let hits = engine.query("Q1", &params([("inputStringValue", "string 0")])).await?;
//! assert_eq!(hits.len(), 1);
//!
//! let dynamic = engine.build_query(
//!     "SELECT org.acme.sample.SampleAsset WHERE (stringValue == _$inputStringValue)",
//! )?;
//! let same = engine.query(dynamic, &params([("inputStringValue", "string 0")])).await?;
//! assert_eq!(hits, same);
//! # Ok(())
//! # }
//! ```
//!
//! ## Registry Providers
//!
//! | Provider | Description |
//! |----------|-------------|
//! | `MemoryRegistries` | In-memory registries for testing/embedding |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod query;
pub mod binder;
pub mod execution;
pub mod registry;
pub mod catalog;
pub mod serializer;
pub mod config;

use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Resource, Concept, RelationshipRef, FieldPath, Value, FieldMap,
    Schema, ClassDecl, EnumDecl, FieldDecl, FieldKind,
};

// ============================================================================
// Re-exports: Query pipeline
// ============================================================================

pub use query::ast::{CompiledQuery, QueryOrigin, Predicate, Operand, CompareOp};
pub use binder::{bind, params, BoundQuery, Params};
pub use execution::{ExecutionStats, QueryResult};
pub use catalog::NamedQueryCatalog;

// ============================================================================
// Re-exports: Registries, serialization, config
// ============================================================================

pub use registry::{MemoryRegistries, Registry, RegistryProvider, RegistrySnapshot};
pub use serializer::Serializer;
pub use config::{EngineConfig, ValidationMode};

// ============================================================================
// Query references
// ============================================================================

/// What to run: a catalog name or an already compiled query.
#[derive(Debug, Clone)]
pub enum QueryRef {
    Named(String),
    Compiled(Arc<CompiledQuery>),
}

impl From<&str> for QueryRef {
    fn from(name: &str) -> Self {
        QueryRef::Named(name.to_string())
    }
}

impl From<String> for QueryRef {
    fn from(name: String) -> Self {
        QueryRef::Named(name)
    }
}

impl From<CompiledQuery> for QueryRef {
    fn from(query: CompiledQuery) -> Self {
        QueryRef::Compiled(Arc::new(query))
    }
}

impl From<Arc<CompiledQuery>> for QueryRef {
    fn from(query: Arc<CompiledQuery>) -> Self {
        QueryRef::Compiled(query)
    }
}

// ============================================================================
// Top-level QueryEngine handle
// ============================================================================

/// The primary entry point. A `QueryEngine` wraps a registry provider and a
/// named query catalog.
pub struct QueryEngine<P: RegistryProvider> {
    provider: P,
    catalog: Arc<NamedQueryCatalog>,
    config: EngineConfig,
}

impl<P: RegistryProvider> QueryEngine<P> {
    pub fn new(provider: P, catalog: NamedQueryCatalog) -> Self {
        Self::with_config(provider, catalog, EngineConfig::default())
    }

    pub fn with_config(provider: P, catalog: NamedQueryCatalog, config: EngineConfig) -> Self {
        Self { provider, catalog: Arc::new(catalog), config }
    }

    /// Compile an ad-hoc query. Every call compiles afresh.
    pub fn build_query(&self, text: &str) -> Result<CompiledQuery> {
        query::compile(text)
    }

    /// Run a named or compiled query and return the matching resources.
    pub async fn query(&self, q: impl Into<QueryRef>, params: &Params) -> Result<Vec<Resource>> {
        Ok(self.query_with_stats(q, params).await?.resources)
    }

    pub async fn query_with_stats(&self, q: impl Into<QueryRef>, params: &Params) -> Result<QueryResult> {
        let started = Instant::now();

        // Phase 1: Resolve
        let compiled = match q.into() {
            QueryRef::Named(name) => self.catalog.resolve(&name)?,
            QueryRef::Compiled(compiled) => compiled,
        };

        // Phase 2: Bind (fails before any registry access)
        let bound = bind(compiled, params)?;

        // Phase 3: Snapshot the target registry
        let registry = self.provider.get_registry(&bound.query().target_type).await?;
        let snapshot = registry.snapshot();

        // Phase 4: Execute
        let result = execution::execute(&bound, &snapshot)?;

        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        if let Some(threshold) = self.config.slow_query_threshold_ms {
            if elapsed_ms > threshold {
                tracing::warn!(
                    query = bound.query().name().unwrap_or("<dynamic>"),
                    target_type = %bound.query().target_type,
                    elapsed_ms,
                    threshold_ms = threshold,
                    scanned = result.stats.scanned,
                    "slow query"
                );
            }
        }

        Ok(result)
    }

    pub fn catalog(&self) -> &NamedQueryCatalog {
        &self.catalog
    }

    /// Access the underlying provider (to populate registries).
    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// In-memory engine for testing and embedding.
impl QueryEngine<MemoryRegistries> {
    pub fn open_memory(catalog: NamedQueryCatalog, schema: Arc<Schema>, config: EngineConfig) -> Self {
        let provider = MemoryRegistries::from_config(&config, schema);
        Self::with_config(provider, catalog, config)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Query syntax error at position {position} near '{fragment}': {message}")]
    SyntaxError { position: usize, fragment: String, message: String },

    #[error("Unknown query: {0}")]
    UnknownQuery(String),

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Query already defined: {0}")]
    DuplicateQuery(String),

    #[error("Duplicate identifier '{id}' in registry {registry}")]
    DuplicateIdentifier { registry: String, id: String },

    #[error("Unknown registry: {0}")]
    UnknownRegistry(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
