//! Type declarations: the shape a model imposes on resource instances.
//!
//! This is not a modeling language. It only records what the serializer
//! needs to decode fields and what the registry needs to reject
//! ill-shaped resources.

use serde::{Deserialize, Serialize};

use super::{Concept, FieldMap, Resource, Value};
use crate::{Error, Result};

/// Declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    String,
    Double,
    Integer,
    Long,
    DateTime,
    Boolean,
    /// Enumeration, by declared enum name.
    Enum(String),
    /// Nested concept, by declared class name.
    Concept(String),
    /// Reference to a resource of the named type.
    Relationship(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub kind: FieldKind,
    pub optional: bool,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), kind, optional: false }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// An asset, participant or concept declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    /// Identifying field. `None` for concepts.
    pub identifier: Option<String>,
    pub fields: Vec<FieldDecl>,
}

impl ClassDecl {
    pub fn resource(name: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self { name: name.into(), identifier: Some(identifier.into()), fields: Vec::new() }
    }

    pub fn concept(name: impl Into<String>) -> Self {
        Self { name: name.into(), identifier: None, fields: Vec::new() }
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub symbols: Vec<String>,
}

impl EnumDecl {
    pub fn new(name: impl Into<String>, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self { name: name.into(), symbols: symbols.into_iter().map(Into::into).collect() }
    }

    pub fn has_symbol(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }
}

/// All declarations known to a business network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    classes: hashbrown::HashMap<String, ClassDecl>,
    enums: hashbrown::HashMap<String, EnumDecl>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, decl: ClassDecl) -> &mut Self {
        self.classes.insert(decl.name.clone(), decl);
        self
    }

    pub fn add_enum(&mut self, decl: EnumDecl) -> &mut Self {
        self.enums.insert(decl.name.clone(), decl);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassDecl> {
        self.classes.get(name)
    }

    pub fn enumeration(&self, name: &str) -> Option<&EnumDecl> {
        self.enums.get(name)
    }

    /// Look up a class, failing with a validation error naming the type.
    pub fn require_class(&self, name: &str) -> Result<&ClassDecl> {
        self.class(name)
            .ok_or_else(|| Error::Validation(format!("Type '{name}' is not declared")))
    }

    /// Check that a resource has exactly the shape its type declares.
    pub fn validate_resource(&self, resource: &Resource) -> Result<()> {
        let decl = self.require_class(resource.class())?;
        match &decl.identifier {
            Some(id_field) if id_field == resource.id_field() => {}
            Some(id_field) => {
                return Err(Error::Validation(format!(
                    "Type '{}' is identified by '{id_field}', not '{}'",
                    decl.name,
                    resource.id_field()
                )));
            }
            None => {
                return Err(Error::Validation(format!(
                    "Type '{}' is a concept and cannot be a resource",
                    decl.name
                )));
            }
        }
        if resource.id().is_empty() {
            return Err(Error::Validation(format!("Resource of type '{}' has an empty identifier", decl.name)));
        }
        self.validate_fields(decl, resource.fields())
    }

    fn validate_concept(&self, type_name: &str, concept: &Concept) -> Result<()> {
        if concept.class != type_name {
            return Err(Error::Validation(format!(
                "Expected concept of type '{type_name}', got '{}'",
                concept.class
            )));
        }
        let decl = self.require_class(type_name)?;
        self.validate_fields(decl, &concept.fields)
    }

    fn validate_fields(&self, decl: &ClassDecl, fields: &FieldMap) -> Result<()> {
        for key in fields.keys() {
            if decl.field(key).is_none() {
                return Err(Error::Validation(format!(
                    "Field '{key}' is not declared on type '{}'",
                    decl.name
                )));
            }
        }
        for field in &decl.fields {
            match fields.get(&field.name) {
                Some(value) => self.validate_value(decl, field, value)?,
                None if field.optional => {}
                None => {
                    return Err(Error::Validation(format!(
                        "Missing required field '{}' on type '{}'",
                        field.name, decl.name
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_value(&self, decl: &ClassDecl, field: &FieldDecl, value: &Value) -> Result<()> {
        let ok = match (&field.kind, value) {
            (FieldKind::String, Value::String(_))
            | (FieldKind::Double, Value::Double(_))
            | (FieldKind::Integer, Value::Integer(_))
            | (FieldKind::Long, Value::Long(_))
            | (FieldKind::DateTime, Value::DateTime(_))
            | (FieldKind::Boolean, Value::Boolean(_)) => true,
            (FieldKind::Enum(enum_name), Value::Enum(symbol)) => {
                let decl = self.enumeration(enum_name).ok_or_else(|| {
                    Error::Validation(format!("Enumeration '{enum_name}' is not declared"))
                })?;
                if !decl.has_symbol(symbol) {
                    return Err(Error::Validation(format!(
                        "'{symbol}' is not a symbol of enumeration '{enum_name}'"
                    )));
                }
                true
            }
            (FieldKind::Concept(type_name), Value::Concept(concept)) => {
                self.validate_concept(type_name, concept)?;
                true
            }
            (FieldKind::Relationship(type_name), Value::Relationship(r)) => r.type_name == *type_name,
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "Field '{}' on type '{}' expects {:?}, got {}",
                field.name,
                decl.name,
                field.kind,
                value.type_name()
            )))
        }
    }
}
