//! # Registries
//!
//! A `Registry` holds the resources of one declared type, ordered by
//! identifier. `RegistryProvider` is the contract between the query engine
//! and whatever owns the registries (an in-memory set, a network client).
//!
//! ## Implementations
//!
//! | Provider | Module | Description |
//! |----------|--------|-------------|
//! | `MemoryRegistries` | `memory` | In-memory, for testing and embedding |

pub mod memory;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::model::{Resource, Schema};
use crate::{Error, Result};

pub use memory::MemoryRegistries;

// ============================================================================
// RegistryProvider Trait
// ============================================================================

/// Access to registries by declared type name.
#[async_trait]
pub trait RegistryProvider: Send + Sync + 'static {
    /// Fails with `UnknownRegistry` when no registry exists for the type.
    async fn get_registry(&self, type_name: &str) -> Result<Arc<Registry>>;

    /// Declared types that have a registry, sorted.
    async fn registry_names(&self) -> Result<Vec<String>>;
}

// ============================================================================
// Registry
// ============================================================================

type ResourceMap = BTreeMap<String, Resource>;

/// Resources of exactly one declared type, keyed by identifier.
///
/// Enumeration is ascending lexicographic identifier order. Inserts are
/// copy-on-write: readers holding a snapshot never see a partial batch.
pub struct Registry {
    declared_type: String,
    resources: RwLock<Arc<ResourceMap>>,
    /// When set, every inserted resource must validate against it.
    schema: Option<Arc<Schema>>,
}

impl Registry {
    pub fn new(declared_type: impl Into<String>) -> Self {
        Self {
            declared_type: declared_type.into(),
            resources: RwLock::new(Arc::new(ResourceMap::new())),
            schema: None,
        }
    }

    pub fn with_schema(declared_type: impl Into<String>, schema: Arc<Schema>) -> Self {
        Self { schema: Some(schema), ..Self::new(declared_type) }
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn add(&self, resource: Resource) -> Result<()> {
        self.add_all([resource]).map(|_| ())
    }

    /// Insert a batch atomically. Any invalid, mistyped or duplicate
    /// resource rejects the whole batch and leaves the registry unchanged.
    pub fn add_all(&self, resources: impl IntoIterator<Item = Resource>) -> Result<usize> {
        let mut batch = ResourceMap::new();
        for resource in resources {
            if resource.class() != self.declared_type {
                return Err(Error::TypeMismatch {
                    expected: self.declared_type.clone(),
                    got: resource.class().to_string(),
                });
            }
            if let Some(schema) = &self.schema {
                schema.validate_resource(&resource)?;
            }
            if batch.contains_key(resource.id()) {
                return Err(self.duplicate(resource.id()));
            }
            batch.insert(resource.id().to_string(), resource);
        }

        let mut guard = self.resources.write();
        if let Some(id) = batch.keys().find(|id| guard.contains_key(id.as_str())) {
            return Err(self.duplicate(id));
        }
        let count = batch.len();
        // Clones only when a snapshot is still alive.
        Arc::make_mut(&mut guard).extend(batch);
        drop(guard);

        tracing::debug!(registry = %self.declared_type, added = count, "registry batch inserted");
        Ok(count)
    }

    fn duplicate(&self, id: &str) -> Error {
        Error::DuplicateIdentifier {
            registry: self.declared_type.clone(),
            id: id.to_string(),
        }
    }

    pub fn get(&self, id: &str) -> Option<Resource> {
        self.resources.read().get(id).cloned()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.resources.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.resources.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.read().is_empty()
    }

    /// Immutable view of the current contents.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            declared_type: self.declared_type.clone(),
            resources: Arc::clone(&self.resources.read()),
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("declared_type", &self.declared_type)
            .field("len", &self.len())
            .field("validated", &self.schema.is_some())
            .finish()
    }
}

// ============================================================================
// RegistrySnapshot
// ============================================================================

/// A point-in-time, read-only view of a registry.
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    declared_type: String,
    resources: Arc<ResourceMap>,
}

impl RegistrySnapshot {
    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    /// Resources in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
