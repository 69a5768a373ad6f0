//! Relationship reference to another resource.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// URI scheme used on the wire for relationship fields.
pub const RESOURCE_SCHEME: &str = "resource:";

/// A typed reference to another resource, by type name and identifier.
///
/// References are never resolved eagerly; the target may not exist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipRef {
    pub type_name: String,
    pub id: String,
}

impl RelationshipRef {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>) -> Self {
        Self { type_name: type_name.into(), id: id.into() }
    }

    /// `resource:<type>#<identifier>`
    pub fn to_uri(&self) -> String {
        format!("{RESOURCE_SCHEME}{}#{}", self.type_name, self.id)
    }

    /// Parse a `resource:<type>#<identifier>` URI. The identifier is
    /// everything after the first `#`.
    pub fn parse_uri(uri: &str) -> Result<Self> {
        let rest = uri.strip_prefix(RESOURCE_SCHEME).ok_or_else(|| {
            Error::Serialization(format!("Relationship URI must start with '{RESOURCE_SCHEME}': {uri}"))
        })?;
        let (type_name, id) = rest.split_once('#').ok_or_else(|| {
            Error::Serialization(format!("Relationship URI is missing '#<identifier>': {uri}"))
        })?;
        if type_name.is_empty() || id.is_empty() {
            return Err(Error::Serialization(format!("Malformed relationship URI: {uri}")));
        }
        Ok(Self::new(type_name, id))
    }
}

impl std::fmt::Display for RelationshipRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_uri())
    }
}
