//! Resource: a typed record with an identity.

use std::borrow::Cow;

use super::{FieldMap, FieldPath, Value};

/// A resource instance (asset or participant).
///
/// The identifier is held apart from the field map and cannot change after
/// construction. `Serializer` is the only wire form.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    class: String,
    id_field: String,
    id: String,
    fields: FieldMap,
}

impl Resource {
    /// `class` is the fully qualified type name, `id_field` the name of the
    /// identifying field on that type.
    pub fn new(class: impl Into<String>, id_field: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            id_field: id_field.into(),
            id: id.into(),
            fields: FieldMap::new(),
        }
    }

    /// Set a field. Attempts to set the identifier field are ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_field(key, value);
        self
    }

    /// Returns `false` (and changes nothing) for the identifier field.
    pub fn set_field(&mut self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        if key == self.id_field {
            return false;
        }
        self.fields.insert(key, value.into());
        true
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Non-identifier fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Resolve a dotted path: the first segment against the resource (the
    /// identifier included), later segments through nested concepts.
    ///
    /// `None` when a field is absent or traversal hits a non-concept value.
    pub fn resolve(&self, path: &FieldPath) -> Option<Cow<'_, Value>> {
        if path.first() == self.id_field {
            return path
                .rest()
                .is_empty()
                .then(|| Cow::Owned(Value::String(self.id.clone())));
        }
        let mut current = self.fields.get(path.first())?;
        for segment in path.rest() {
            current = current.as_concept()?.get(segment)?;
        }
        Some(Cow::Borrowed(current))
    }

    /// `resource:<class>#<id>` reference to this resource.
    pub fn to_relationship(&self) -> super::RelationshipRef {
        super::RelationshipRef::new(self.class.clone(), self.id.clone())
    }
}
