//! In-memory registry provider.
//!
//! The reference implementation of `RegistryProvider`: a map of declared
//! type name to `Registry`, protected by an RwLock.
//!
//! ## Limitations
//!
//! - **No persistence**: contents live as long as the provider.
//! - **No remove/update**: registries only grow. The query path is
//!   read-only, so nothing here needs more.
//!
//! Use this provider for:
//! - Testing the compiler, binder and executor
//! - Embedding the engine where registries are built in-process

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::config::{EngineConfig, ValidationMode};
use crate::model::Schema;
use crate::{Error, Result};
use super::{Registry, RegistryProvider};

/// In-memory set of registries, one per declared type.
pub struct MemoryRegistries {
    registries: RwLock<hashbrown::HashMap<String, Arc<Registry>>>,
    /// Attached to every registry created here.
    schema: Option<Arc<Schema>>,
}

impl MemoryRegistries {
    /// Registries without schema validation.
    pub fn new() -> Self {
        Self {
            registries: RwLock::new(hashbrown::HashMap::new()),
            schema: None,
        }
    }

    /// Registries that validate every insert against `schema`.
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self { schema: Some(schema), ..Self::new() }
    }

    /// Strict validation attaches the schema; lenient only checks type names.
    pub fn from_config(config: &EngineConfig, schema: Arc<Schema>) -> Self {
        match config.validation {
            ValidationMode::Strict => Self::with_schema(schema),
            ValidationMode::Lenient => Self::new(),
        }
    }

    /// Create the registry for `type_name`. Fails if it already exists.
    pub fn add_registry(&self, type_name: &str) -> Result<Arc<Registry>> {
        if self.registries.read().contains_key(type_name) {
            return Err(Error::Validation(format!("Registry '{type_name}' already exists")));
        }
        self.get_or_create(type_name)
    }

    /// Return the registry for `type_name`, creating it if needed.
    ///
    /// With a schema attached, the type must be a declared resource type.
    pub fn get_or_create(&self, type_name: &str) -> Result<Arc<Registry>> {
        if let Some(existing) = self.registries.read().get(type_name) {
            return Ok(Arc::clone(existing));
        }

        if let Some(schema) = &self.schema {
            let decl = schema.require_class(type_name)?;
            if decl.identifier.is_none() {
                return Err(Error::Validation(format!(
                    "Type '{type_name}' is a concept and has no registry"
                )));
            }
        }

        let mut registries = self.registries.write();
        let registry = registries
            .entry(type_name.to_string())
            .or_insert_with(|| {
                tracing::debug!(registry = %type_name, "registry created");
                Arc::new(match &self.schema {
                    Some(schema) => Registry::with_schema(type_name, Arc::clone(schema)),
                    None => Registry::new(type_name),
                })
            });
        Ok(Arc::clone(registry))
    }
}

impl Default for MemoryRegistries {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RegistryProvider for MemoryRegistries {
    /// A resource type declared by the attached schema always has a
    /// registry, created empty on first lookup.
    async fn get_registry(&self, type_name: &str) -> Result<Arc<Registry>> {
        if let Some(existing) = self.registries.read().get(type_name) {
            return Ok(Arc::clone(existing));
        }
        let declared = self
            .schema
            .as_ref()
            .and_then(|schema| schema.class(type_name))
            .is_some_and(|decl| decl.identifier.is_some());
        if declared {
            self.get_or_create(type_name)
        } else {
            Err(Error::UnknownRegistry(type_name.to_string()))
        }
    }

    async fn registry_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.registries.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}
