//! # Predicate Compiler
//!
//! Query text → `CompiledQuery`. Pure functions: no I/O, no registry access,
//! no caching. Compilation is all-or-nothing.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod definitions;

use crate::Result;
use ast::{CompiledQuery, Operand, Predicate, QueryOrigin};

pub use definitions::{parse_definitions, QueryDefinition};

/// Compile a dynamic `SELECT <type> [WHERE <condition>]` query.
pub fn compile(text: &str) -> Result<CompiledQuery> {
    let tokens = lexer::tokenize(text)?;
    let (target_type, predicate) = parser::parse_select(&tokens, text)?;
    let query = finish(target_type, predicate, text, QueryOrigin::Dynamic);
    tracing::trace!(target_type = %query.target_type, params = ?query.parameters, "compiled dynamic query");
    Ok(query)
}

/// Compile a named template: `target_type` fixed by the definition, the
/// condition body given as text. Empty text selects every resource.
pub fn compile_condition(target_type: &str, condition: &str, origin: QueryOrigin) -> Result<CompiledQuery> {
    // The type name must itself be a dotted identifier.
    parse_type_name(target_type)?;
    let tokens = lexer::tokenize(condition)?;
    let predicate = parser::parse_condition(&tokens, condition)?;
    Ok(finish(target_type.to_string(), predicate, condition, origin))
}

fn parse_type_name(target_type: &str) -> Result<()> {
    crate::model::FieldPath::parse(target_type).map(|_| ())
}

fn finish(target_type: String, predicate: Option<Predicate>, source: &str, origin: QueryOrigin) -> CompiledQuery {
    let parameters = predicate.as_ref().map(collect_parameters).unwrap_or_default();
    CompiledQuery {
        target_type,
        parameters,
        predicate,
        source: source.to_string(),
        origin,
    }
}

/// Distinct parameter names, in order of first reference.
fn collect_parameters(predicate: &Predicate) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    predicate.for_each_operand(&mut |operand| {
        if let Operand::Parameter(name) = operand {
            if !names.iter().any(|n| n == name) {
                names.push(name.clone());
            }
        }
    });
    names
}
