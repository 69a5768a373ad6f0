//! FieldMap: the name-to-value store on resources and concepts.

use super::Value;

/// A map of field names to values.
pub type FieldMap = hashbrown::HashMap<String, Value>;

/// Collect `(name, value)` pairs into a FieldMap.
pub fn field_map<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> FieldMap
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
