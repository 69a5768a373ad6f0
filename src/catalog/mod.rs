//! Named query catalog.
//!
//! Maps a logical query name to a query compiled once at definition time.
//! Populate it while defining the network, then hand it to the engine;
//! the engine only reads from it.

use std::sync::Arc;

use crate::query::ast::{CompiledQuery, QueryOrigin};
use crate::query::{compile_condition, parse_definitions};
use crate::{Error, Result};

#[derive(Debug, Clone)]
struct CatalogEntry {
    query: Arc<CompiledQuery>,
    description: Option<String>,
}

/// Named, precompiled queries.
#[derive(Debug, Clone, Default)]
pub struct NamedQueryCatalog {
    entries: hashbrown::HashMap<String, CatalogEntry>,
}

impl NamedQueryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile `template` (a condition body over `target_type`) and store it
    /// under `name`. A name can be defined only once.
    pub fn define(&mut self, name: &str, target_type: &str, template: &str) -> Result<()> {
        self.define_with_description(name, target_type, template, None)
    }

    pub fn define_with_description(
        &mut self,
        name: &str,
        target_type: &str,
        template: &str,
        description: Option<String>,
    ) -> Result<()> {
        if self.entries.contains_key(name) {
            return Err(Error::DuplicateQuery(name.to_string()));
        }
        let query = compile_condition(target_type, template, QueryOrigin::Named(name.to_string()))?;
        tracing::debug!(name, target_type, params = ?query.parameters, "named query defined");
        self.entries.insert(name.to_string(), CatalogEntry { query: Arc::new(query), description });
        Ok(())
    }

    /// Define every query in a query definition file. On any error nothing
    /// from the file is kept.
    pub fn load_definitions(&mut self, source: &str) -> Result<usize> {
        let defs = parse_definitions(source)?;
        let mut staged = self.clone();
        for def in &defs {
            staged.define_with_description(&def.name, &def.target_type, &def.condition, def.description.clone())?;
        }
        *self = staged;
        Ok(defs.len())
    }

    pub fn resolve(&self, name: &str) -> Result<Arc<CompiledQuery>> {
        self.entries
            .get(name)
            .map(|entry| Arc::clone(&entry.query))
            .ok_or_else(|| Error::UnknownQuery(name.to_string()))
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.entries.get(name)?.description.as_deref()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Defined names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
