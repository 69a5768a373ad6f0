//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How registries check inserted resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Validate every resource against the schema.
    #[default]
    Strict,
    /// Only check the declared type name.
    Lenient,
}

/// Configuration for a `QueryEngine` and the registries built for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub validation: ValidationMode,
    /// Queries slower than this are logged at WARN.
    pub slow_query_threshold_ms: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            validation: ValidationMode::Strict,
            slow_query_threshold_ms: Some(250),
        }
    }
}

impl EngineConfig {
    /// Defaults, but registries only check type names.
    pub fn lenient() -> Self {
        Self { validation: ValidationMode::Lenient, ..Self::default() }
    }

    /// Load from JSON. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }
}
