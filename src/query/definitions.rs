//! Query definition files.
//!
//! ```text
//! query SelectByString {
//!   description: "Select assets by string value"
//!   statement:
//!     SELECT org.acme.sample.SampleAsset
//!     WHERE (stringValue == _$inputStringValue)
//! }
//! ```
//!
//! `query`, `description` and `statement` are contextual: they stay
//! usable as field names inside conditions.

use super::lexer::{tokenize, TokenKind};
use super::parser::{parse_condition_expr, parse_select_head, Parser};
use crate::Result;

/// One `query` block, not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryDefinition {
    pub name: String,
    pub description: Option<String>,
    pub target_type: String,
    /// Source text of the WHERE condition; empty when there is none.
    pub condition: String,
}

/// Parse every `query` block in a definition file.
pub fn parse_definitions(source: &str) -> Result<Vec<QueryDefinition>> {
    let tokens = tokenize(source)?;
    let mut p = Parser::new(&tokens, source);
    let mut defs = Vec::new();

    while !p.at(TokenKind::Eof) {
        defs.push(parse_definition(&mut p, source)?);
    }

    Ok(defs)
}

fn parse_definition(p: &mut Parser, source: &str) -> Result<QueryDefinition> {
    let kw = p.expect(TokenKind::Identifier)?;
    if kw.text != "query" {
        return Err(error_at(source, kw.span.start, format!("Expected 'query', got '{}'", kw.text)));
    }
    let name = p.expect(TokenKind::Identifier)?.text.clone();
    p.expect(TokenKind::LBrace)?;

    let mut description = None;
    let mut statement = None;

    while !p.at(TokenKind::RBrace) {
        let key = p.expect(TokenKind::Identifier)?;
        p.expect(TokenKind::Colon)?;
        match key.text.as_str() {
            "description" if description.is_none() => {
                description = Some(p.expect(TokenKind::StringLiteral)?.text.clone());
            }
            "statement" if statement.is_none() => {
                let target_type = parse_select_head(p)?;
                let condition = if p.eat(TokenKind::Where) {
                    let start = p.position();
                    parse_condition_expr(p)?;
                    source.get(start..p.position()).unwrap_or_default().trim().to_string()
                } else {
                    String::new()
                };
                statement = Some((target_type, condition));
            }
            other => {
                return Err(error_at(
                    source,
                    key.span.start,
                    format!("Unexpected or repeated key '{other}' in query '{name}'"),
                ));
            }
        }
    }
    let close = p.expect(TokenKind::RBrace)?;

    let (target_type, condition) = statement.ok_or_else(|| {
        error_at(source, close.span.start, format!("Query '{name}' has no statement"))
    })?;

    Ok(QueryDefinition { name, description, target_type, condition })
}

fn error_at(source: &str, position: usize, message: String) -> crate::Error {
    super::lexer::syntax_error(source, position, message)
}
