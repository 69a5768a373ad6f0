//! Parameter binding.
//!
//! Checks the caller's parameters against a compiled query's declared
//! parameter list before anything is evaluated. Binding is permissive:
//! extra parameters are dropped, and value types are not checked here
//! (a mismatched type simply never compares equal).

use std::sync::Arc;

use crate::model::Value;
use crate::query::ast::CompiledQuery;
use crate::{Error, Result};

/// Invocation-time parameter values, by name.
pub type Params = hashbrown::HashMap<String, Value>;

/// Collect `(name, value)` pairs into Params.
pub fn params<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Params
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// A compiled query with every declared parameter resolved.
#[derive(Debug, Clone)]
pub struct BoundQuery {
    query: Arc<CompiledQuery>,
    bindings: Params,
}

impl BoundQuery {
    pub fn query(&self) -> &CompiledQuery {
        &self.query
    }

    /// Bound value for a declared parameter.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> &Params {
        &self.bindings
    }
}

/// Bind `params` to `query`. Fails with `MissingParameter` naming the first
/// declared parameter (in first-reference order) that has no value.
pub fn bind(query: Arc<CompiledQuery>, params: &Params) -> Result<BoundQuery> {
    let mut bindings = Params::with_capacity(query.parameters.len());
    for name in &query.parameters {
        let value = params
            .get(name)
            .ok_or_else(|| Error::MissingParameter(name.clone()))?;
        bindings.insert(name.clone(), value.clone());
    }

    let unused = params.len().saturating_sub(bindings.len());
    if unused > 0 {
        tracing::trace!(unused, "ignoring parameters not referenced by the query");
    }

    Ok(BoundQuery { query, bindings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::compile;

    fn query() -> Arc<CompiledQuery> {
        Arc::new(compile("SELECT org.acme.Asset WHERE (a == _$first AND b == _$second)").unwrap())
    }

    #[test]
    fn test_bind_all() {
        let bound = bind(query(), &params([("first", "x"), ("second", "y")])).unwrap();
        assert_eq!(bound.value("first"), Some(&Value::from("x")));
        assert_eq!(bound.value("second"), Some(&Value::from("y")));
    }

    #[test]
    fn test_first_missing_is_reported() {
        match bind(query(), &Params::new()) {
            Err(Error::MissingParameter(name)) => assert_eq!(name, "first"),
            other => panic!("Expected MissingParameter, got {other:?}"),
        }
        match bind(query(), &params([("first", "x")])) {
            Err(Error::MissingParameter(name)) => assert_eq!(name, "second"),
            other => panic!("Expected MissingParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_extra_parameters_are_ignored() {
        let bound = bind(query(), &params([("first", "x"), ("second", "y"), ("third", "z")])).unwrap();
        assert_eq!(bound.bindings().len(), 2);
        assert!(bound.value("third").is_none());
    }

    #[test]
    fn test_types_are_not_checked() {
        let bound = bind(query(), &params([("first", Value::Integer(1)), ("second", Value::Boolean(true))]));
        assert!(bound.is_ok());
    }
}
