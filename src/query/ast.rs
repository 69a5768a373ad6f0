//! Compiled query representation.
//!
//! Pure data: no registry references or evaluation logic. A compiled
//! query can be evaluated against any registry of its target type.

use std::fmt;

use crate::model::{FieldPath, Value};

/// Where a compiled query came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOrigin {
    /// Defined in the catalog under this name.
    Named(String),
    /// Built from query text at invocation time.
    Dynamic,
}

/// An immutable, executable query.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub target_type: String,
    /// Distinct parameter names in first-reference order.
    pub parameters: Vec<String>,
    /// `None` selects every resource.
    pub predicate: Option<Predicate>,
    pub source: String,
    pub origin: QueryOrigin,
}

impl CompiledQuery {
    pub fn name(&self) -> Option<&str> {
        match &self.origin {
            QueryOrigin::Named(name) => Some(name),
            QueryOrigin::Dynamic => None,
        }
    }
}

/// Predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Compare { left: Operand, op: CompareOp, right: Operand },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Visit every operand, left to right.
    pub fn for_each_operand<'a>(&'a self, f: &mut impl FnMut(&'a Operand)) {
        match self {
            Predicate::Compare { left, right, .. } => {
                f(left);
                f(right);
            }
            Predicate::And(a, b) | Predicate::Or(a, b) => {
                a.for_each_operand(f);
                b.for_each_operand(f);
            }
        }
    }
}

/// Comparison operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Field path: `stringValue`, `conceptValue.stringValue`
    Path(FieldPath),
    /// Literal: `'string 0'`, `42`, `true`
    Literal(Value),
    /// Parameter: `_$inputStringValue`
    Parameter(String),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq, Neq, Lt, Lte, Gt, Gte,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CompareOp::Eq => "==",
            CompareOp::Neq => "!=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        })
    }
}
