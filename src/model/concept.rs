//! Concept: a nested structured value without identity.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FieldMap, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub class: String,
    pub fields: FieldMap,
}

impl Concept {
    pub fn new(class: impl Into<String>) -> Self {
        Self { class: class.into(), fields: FieldMap::new() }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

impl fmt::Display for Concept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Sorted for stable output; the map itself is unordered.
        let mut keys: Vec<_> = self.fields.keys().collect();
        keys.sort();
        write!(f, "{}{{", self.class)?;
        for (i, k) in keys.iter().enumerate() {
            if i > 0 { write!(f, ", ")?; }
            write!(f, "{k}: {}", self.fields[k.as_str()])?;
        }
        write!(f, "}}")
    }
}
