//! # Resource Model
//!
//! Typed records held in registries and read by the query engine.
//! These types cross every boundary: serializer ↔ registry ↔ executor ↔ user.
//!
//! Design rule: this module is pure data. It does no I/O and takes no locks.

pub mod resource;
pub mod concept;
pub mod relationship;
pub mod path;
pub mod value;
pub mod field_map;
pub mod schema;

pub use resource::Resource;
pub use concept::Concept;
pub use relationship::{RelationshipRef, RESOURCE_SCHEME};
pub use path::FieldPath;
pub use value::Value;
pub use field_map::{FieldMap, field_map};
pub use schema::{ClassDecl, EnumDecl, FieldDecl, FieldKind, Schema};
