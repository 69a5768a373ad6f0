//! Query execution engine.
//!
//! Evaluates a bound query against a registry snapshot, one resource at a
//! time in identifier order. Evaluation is synchronous and never fails per
//! resource: an unresolvable path or an incomparable pair is "no match".

use std::borrow::Cow;
use std::time::Instant;

use crate::binder::BoundQuery;
use crate::model::{Resource, Value};
use crate::query::ast::{CompareOp, Operand, Predicate};
use crate::registry::RegistrySnapshot;
use crate::{Error, Result};

/// Query execution result.
#[derive(Debug, Clone)]
pub struct QueryResult {
    /// Matching resources, in ascending identifier order.
    pub resources: Vec<Resource>,
    pub stats: ExecutionStats,
}

impl QueryResult {
    pub fn ids(&self) -> Vec<&str> {
        self.resources.iter().map(Resource::id).collect()
    }
}

/// Execution statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    pub scanned: u64,
    pub matched: u64,
    pub elapsed_us: u64,
}

/// Execute a bound query against a snapshot of its target registry.
pub fn execute(bound: &BoundQuery, snapshot: &RegistrySnapshot) -> Result<QueryResult> {
    let query = bound.query();
    if snapshot.declared_type() != query.target_type {
        return Err(Error::TypeMismatch {
            expected: query.target_type.clone(),
            got: snapshot.declared_type().to_string(),
        });
    }

    let started = Instant::now();
    let mut stats = ExecutionStats::default();
    let mut resources = Vec::new();

    for resource in snapshot.iter() {
        stats.scanned += 1;
        let matched = match &query.predicate {
            Some(predicate) => evaluate(predicate, resource, bound),
            None => true,
        };
        if matched {
            resources.push(resource.clone());
        }
    }

    stats.matched = resources.len() as u64;
    stats.elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);

    tracing::debug!(
        target_type = %query.target_type,
        query = query.name().unwrap_or("<dynamic>"),
        scanned = stats.scanned,
        matched = stats.matched,
        elapsed_us = stats.elapsed_us,
        "query executed"
    );

    Ok(QueryResult { resources, stats })
}

/// Evaluate a predicate against one resource.
pub fn evaluate(predicate: &Predicate, resource: &Resource, bound: &BoundQuery) -> bool {
    match predicate {
        Predicate::Compare { left, op, right } => {
            match (operand_value(left, resource, bound), operand_value(right, resource, bound)) {
                (Some(l), Some(r)) => compare(&l, *op, &r),
                _ => false,
            }
        }
        Predicate::And(a, b) => evaluate(a, resource, bound) && evaluate(b, resource, bound),
        Predicate::Or(a, b) => evaluate(a, resource, bound) || evaluate(b, resource, bound),
    }
}

fn operand_value<'a>(operand: &'a Operand, resource: &'a Resource, bound: &'a BoundQuery) -> Option<Cow<'a, Value>> {
    match operand {
        Operand::Literal(value) => Some(Cow::Borrowed(value)),
        Operand::Path(path) => resource.resolve(path),
        Operand::Parameter(name) => bound.value(name).map(Cow::Borrowed),
    }
}

fn compare(left: &Value, op: CompareOp, right: &Value) -> bool {
    use std::cmp::Ordering::*;
    match op {
        CompareOp::Eq => left.loose_eq(right) == Some(true),
        CompareOp::Neq => left.loose_eq(right) == Some(false),
        CompareOp::Lt => left.loose_cmp(right) == Some(Less),
        CompareOp::Lte => matches!(left.loose_cmp(right), Some(Less | Equal)),
        CompareOp::Gt => left.loose_cmp(right) == Some(Greater),
        CompareOp::Gte => matches!(left.loose_cmp(right), Some(Greater | Equal)),
    }
}
