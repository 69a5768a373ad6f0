//! JSON serialization for resources.
//!
//! Wire form, as exchanged with the rest of the platform:
//!
//! ```text
//! {
//!   "$class": "org.acme.sample.SampleAsset",
//!   "assetId": "ASSET_1",
//!   "dateTimeValue": "2017-09-09T00:00:00.000Z",
//!   "conceptValue": { "$class": "org.acme.sample.SampleConcept", "stringValue": "x" },
//!   "owner": "resource:org.acme.sample.SampleParticipant#alice"
//! }
//! ```
//!
//! Decoding is directed by the schema; encoding validates first, so
//! `from_json(to_json(r)) == r` for anything `to_json` accepts.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use serde_json::{Map, Number, Value as Json};

use crate::model::{ClassDecl, Concept, FieldKind, FieldMap, RelationshipRef, Resource, Schema, Value};
use crate::{Error, Result};

/// Discriminator key carrying the declared type name.
pub const CLASS_KEY: &str = "$class";

/// Converts between JSON objects and typed resources.
#[derive(Debug, Clone)]
pub struct Serializer {
    schema: Arc<Schema>,
}

impl Serializer {
    pub fn new(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn from_json_str(&self, json: &str) -> Result<Resource> {
        let value: Json = serde_json::from_str(json)?;
        self.from_json(&value)
    }

    pub fn from_json(&self, json: &Json) -> Result<Resource> {
        let obj = as_object(json, "resource")?;
        let decl = self.class_of(obj)?;
        let id_field = decl.identifier.as_deref().ok_or_else(|| {
            Error::Serialization(format!("Type '{}' is a concept, not a resource", decl.name))
        })?;
        let id = obj
            .get(id_field)
            .and_then(Json::as_str)
            .ok_or_else(|| Error::Serialization(format!("Missing string identifier '{id_field}' on '{}'", decl.name)))?;

        let fields = self.decode_fields(decl, obj, Some(id_field))?;
        let mut resource = Resource::new(decl.name.clone(), id_field, id);
        for (key, value) in fields {
            resource.set_field(key, value);
        }
        Ok(resource)
    }

    pub fn to_json(&self, resource: &Resource) -> Result<Json> {
        self.schema.validate_resource(resource)?;
        let mut obj = Map::new();
        obj.insert(CLASS_KEY.to_string(), Json::String(resource.class().to_string()));
        obj.insert(resource.id_field().to_string(), Json::String(resource.id().to_string()));
        encode_fields(resource.fields(), &mut obj)?;
        Ok(Json::Object(obj))
    }

    fn class_of(&self, obj: &Map<String, Json>) -> Result<&ClassDecl> {
        let class = obj
            .get(CLASS_KEY)
            .and_then(Json::as_str)
            .ok_or_else(|| Error::Serialization(format!("Missing '{CLASS_KEY}'")))?;
        self.schema
            .class(class)
            .ok_or_else(|| Error::Serialization(format!("Type '{class}' is not declared")))
    }

    fn decode_fields(&self, decl: &ClassDecl, obj: &Map<String, Json>, id_field: Option<&str>) -> Result<FieldMap> {
        let mut fields = FieldMap::with_capacity(obj.len());
        for (key, json) in obj {
            if key == CLASS_KEY || Some(key.as_str()) == id_field {
                continue;
            }
            let field = decl.field(key).ok_or_else(|| {
                Error::Serialization(format!("Field '{key}' is not declared on type '{}'", decl.name))
            })?;
            let value = self
                .decode_value(&field.kind, json)
                .map_err(|e| Error::Serialization(format!("Field '{key}' on '{}': {}", decl.name, detail(e))))?;
            fields.insert(key.clone(), value);
        }
        if let Some(missing) = decl.fields.iter().find(|f| !f.optional && !fields.contains_key(&f.name)) {
            return Err(Error::Serialization(format!(
                "Missing required field '{}' on type '{}'",
                missing.name, decl.name
            )));
        }
        Ok(fields)
    }

    fn decode_value(&self, kind: &FieldKind, json: &Json) -> Result<Value> {
        let value = match kind {
            FieldKind::String => Value::String(expect_str(json)?.to_string()),
            FieldKind::Double => Value::Double(json.as_f64().ok_or_else(|| shape("number", json))?),
            FieldKind::Integer => {
                let n = json.as_i64().ok_or_else(|| shape("integer", json))?;
                Value::Integer(i32::try_from(n).map_err(|_| Error::Serialization(format!("{n} is out of range for Integer")))?)
            }
            FieldKind::Long => Value::Long(json.as_i64().ok_or_else(|| shape("integer", json))?),
            FieldKind::DateTime => {
                let s = expect_str(json)?;
                let dt = DateTime::parse_from_rfc3339(s)
                    .map_err(|e| Error::Serialization(format!("Invalid DateTime '{s}': {e}")))?;
                Value::DateTime(dt.with_timezone(&Utc))
            }
            FieldKind::Boolean => Value::Boolean(json.as_bool().ok_or_else(|| shape("boolean", json))?),
            FieldKind::Enum(enum_name) => {
                let symbol = expect_str(json)?;
                let decl = self.schema.enumeration(enum_name).ok_or_else(|| {
                    Error::Serialization(format!("Enumeration '{enum_name}' is not declared"))
                })?;
                if !decl.has_symbol(symbol) {
                    return Err(Error::Serialization(format!("'{symbol}' is not a symbol of '{enum_name}'")));
                }
                Value::Enum(symbol.to_string())
            }
            FieldKind::Concept(type_name) => {
                let obj = as_object(json, "concept")?;
                let decl = self.class_of(obj)?;
                if decl.name != *type_name {
                    return Err(Error::Serialization(format!(
                        "Expected concept '{type_name}', got '{}'",
                        decl.name
                    )));
                }
                let fields = self.decode_fields(decl, obj, None)?;
                Value::Concept(Box::new(Concept { class: decl.name.clone(), fields }))
            }
            FieldKind::Relationship(type_name) => {
                let r = RelationshipRef::parse_uri(expect_str(json)?)?;
                if r.type_name != *type_name {
                    return Err(Error::Serialization(format!(
                        "Expected relationship to '{type_name}', got '{}'",
                        r.type_name
                    )));
                }
                Value::Relationship(r)
            }
        };
        Ok(value)
    }
}

fn encode_fields(fields: &FieldMap, obj: &mut Map<String, Json>) -> Result<()> {
    for (key, value) in fields {
        obj.insert(key.clone(), encode_value(value)?);
    }
    Ok(())
}

fn encode_value(value: &Value) -> Result<Json> {
    Ok(match value {
        Value::String(s) | Value::Enum(s) => Json::String(s.clone()),
        Value::Double(f) => Json::Number(
            Number::from_f64(*f).ok_or_else(|| Error::Serialization(format!("{f} has no JSON form")))?,
        ),
        Value::Integer(i) => Json::Number(Number::from(*i)),
        Value::Long(l) => Json::Number(Number::from(*l)),
        Value::DateTime(dt) => Json::String(format_instant(dt)),
        Value::Boolean(b) => Json::Bool(*b),
        Value::Concept(c) => {
            let mut obj = Map::new();
            obj.insert(CLASS_KEY.to_string(), Json::String(c.class.clone()));
            encode_fields(&c.fields, &mut obj)?;
            Json::Object(obj)
        }
        Value::Relationship(r) => Json::String(r.to_uri()),
    })
}

/// Millisecond precision unless the instant carries more.
fn format_instant(dt: &DateTime<Utc>) -> String {
    let format = if dt.nanosecond() % 1_000_000 == 0 { SecondsFormat::Millis } else { SecondsFormat::AutoSi };
    dt.to_rfc3339_opts(format, true)
}

fn as_object<'a>(json: &'a Json, what: &str) -> Result<&'a Map<String, Json>> {
    json.as_object()
        .ok_or_else(|| Error::Serialization(format!("Expected {what} object, got {}", json_kind(json))))
}

fn expect_str(json: &Json) -> Result<&str> {
    json.as_str().ok_or_else(|| shape("string", json))
}

fn shape(expected: &str, json: &Json) -> Error {
    Error::Serialization(format!("expected {expected}, got {}", json_kind(json)))
}

/// Nested serializer errors are re-wrapped with field context.
fn detail(err: Error) -> String {
    match err {
        Error::Serialization(msg) => msg,
        other => other.to_string(),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
