//! Query recursive descent parser.
//!
//! Parses token streams into predicate trees. Supports:
//! - `SELECT <type> [WHERE <condition>]`
//! - bare conditions for named templates
//! - `==`, `!=`, `<`, `<=`, `>`, `>=`
//! - `AND` / `OR` with parentheses (`AND` binds tighter)
//!
//! Keywords are case-insensitive. They still work as field names: any
//! keyword may start a path in a condition or follow a `.`, except that a
//! bare `true`/`false` is the boolean literal.

use super::ast::*;
use super::lexer::{syntax_error, Token, TokenKind};
use crate::model::{FieldPath, Value};
use crate::{Error, Result};

/// Parser state: wraps a token slice with cursor.
pub(crate) struct Parser<'t> {
    tokens: &'t [Token],
    input: &'t str,
    pos: usize,
}

impl<'t> Parser<'t> {
    pub(crate) fn new(tokens: &'t [Token], input: &'t str) -> Self {
        Self { tokens, input, pos: 0 }
    }

    pub(crate) fn peek(&self) -> &'t Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn peek_next_kind(&self) -> TokenKind {
        self.tokens[(self.pos + 1).min(self.tokens.len() - 1)].kind
    }

    pub(crate) fn advance(&mut self) -> &'t Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<&'t Token> {
        let tok = self.peek();
        if tok.kind == kind {
            Ok(self.advance())
        } else {
            Err(self.error(format!("Expected {:?}, got {:?} '{}'", kind, tok.kind, tok.text)))
        }
    }

    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Byte offset of the current token.
    pub(crate) fn position(&self) -> usize {
        self.peek().span.start
    }

    pub(crate) fn error(&self, msg: String) -> Error {
        syntax_error(self.input, self.peek().span.start, msg)
    }

    pub(crate) fn expect_eof(&self) -> Result<()> {
        if self.at(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.error(format!("Unexpected token after query: {:?} '{}'", self.peek_kind(), self.peek().text)))
        }
    }
}

/// Parse a complete `SELECT` statement.
pub fn parse_select(tokens: &[Token], input: &str) -> Result<(String, Option<Predicate>)> {
    let mut p = Parser::new(tokens, input);
    let parsed = parse_select_body(&mut p)?;
    p.expect_eof()?;
    Ok(parsed)
}

/// Parse a bare condition (a named template body). Empty input selects all.
pub fn parse_condition(tokens: &[Token], input: &str) -> Result<Option<Predicate>> {
    let mut p = Parser::new(tokens, input);
    p.eat(TokenKind::Where);
    if p.at(TokenKind::Eof) {
        return Ok(None);
    }
    let predicate = parse_or_expr(&mut p)?;
    p.expect_eof()?;
    Ok(Some(predicate))
}

/// `SELECT <type> [WHERE <condition>]`, leaving the cursor on the next token.
pub(crate) fn parse_select_body(p: &mut Parser) -> Result<(String, Option<Predicate>)> {
    let target_type = parse_select_head(p)?;
    let predicate = if p.eat(TokenKind::Where) {
        Some(parse_condition_expr(p)?)
    } else {
        None
    };
    Ok((target_type, predicate))
}

/// `SELECT <type>`
pub(crate) fn parse_select_head(p: &mut Parser) -> Result<String> {
    p.expect(TokenKind::Select)?;
    Ok(parse_dotted_name(p)?.join("."))
}

pub(crate) fn parse_condition_expr(p: &mut Parser) -> Result<Predicate> {
    parse_or_expr(p)
}

fn parse_dotted_name(p: &mut Parser) -> Result<Vec<String>> {
    let first = p.expect(TokenKind::Identifier)?.text.clone();
    parse_segments(p, first)
}

/// Remaining `.segment`s after `first`. Keywords are plain segments here.
fn parse_segments(p: &mut Parser, first: String) -> Result<Vec<String>> {
    let mut segments = vec![first];
    while p.eat(TokenKind::Dot) {
        if !is_word(p.peek_kind()) {
            return Err(p.error(format!("Expected field name after '.', got {:?} '{}'", p.peek_kind(), p.peek().text)));
        }
        segments.push(p.advance().text.clone());
    }
    Ok(segments)
}

fn is_word(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Identifier
            | TokenKind::Select
            | TokenKind::Where
            | TokenKind::And
            | TokenKind::Or
            | TokenKind::True
            | TokenKind::False
    )
}

// ============================================================================
// Condition parsing (precedence climbing)
// ============================================================================

fn parse_or_expr(p: &mut Parser) -> Result<Predicate> {
    let mut left = parse_and_expr(p)?;
    while p.eat(TokenKind::Or) {
        let right = parse_and_expr(p)?;
        left = Predicate::Or(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_and_expr(p: &mut Parser) -> Result<Predicate> {
    let mut left = parse_primary(p)?;
    while p.eat(TokenKind::And) {
        let right = parse_primary(p)?;
        left = Predicate::And(Box::new(left), Box::new(right));
    }
    Ok(left)
}

fn parse_primary(p: &mut Parser) -> Result<Predicate> {
    if p.eat(TokenKind::LParen) {
        let inner = parse_or_expr(p)?;
        p.expect(TokenKind::RParen)?;
        return Ok(inner);
    }
    parse_comparison(p)
}

fn parse_comparison(p: &mut Parser) -> Result<Predicate> {
    let start = p.peek().span.start;
    let left = parse_operand(p)?;

    let op = match p.peek_kind() {
        TokenKind::EqEq => CompareOp::Eq,
        TokenKind::Neq => CompareOp::Neq,
        TokenKind::Lt => CompareOp::Lt,
        TokenKind::Lte => CompareOp::Lte,
        TokenKind::Gt => CompareOp::Gt,
        TokenKind::Gte => CompareOp::Gte,
        _ => return Err(p.error(format!("Expected comparison operator, got {:?} '{}'", p.peek_kind(), p.peek().text))),
    };
    p.advance();

    let right = parse_operand(p)?;

    if !matches!(left, Operand::Path(_)) && !matches!(right, Operand::Path(_)) {
        return Err(syntax_error(p.input, start, "Comparison must reference a field"));
    }

    Ok(Predicate::Compare { left, op, right })
}

fn parse_operand(p: &mut Parser) -> Result<Operand> {
    match p.peek_kind() {
        TokenKind::Integer => {
            let tok = p.advance();
            let val = tok.text.parse::<i64>()
                .map_err(|_| syntax_error(p.input, tok.span.start, "Invalid integer"))?;
            Ok(Operand::Literal(Value::Long(val)))
        }
        TokenKind::Float => {
            let tok = p.advance();
            let val = tok.text.parse::<f64>()
                .map_err(|_| syntax_error(p.input, tok.span.start, "Invalid number"))?;
            Ok(Operand::Literal(Value::Double(val)))
        }
        TokenKind::StringLiteral => Ok(Operand::Literal(Value::String(p.advance().text.clone()))),
        TokenKind::True | TokenKind::False if p.peek_next_kind() != TokenKind::Dot => {
            let value = p.advance().kind == TokenKind::True;
            Ok(Operand::Literal(Value::Boolean(value)))
        }
        TokenKind::Parameter => Ok(Operand::Parameter(p.advance().text.clone())),
        kind if is_word(kind) => {
            let first = p.advance().text.clone();
            Ok(Operand::Path(FieldPath::from_segments(parse_segments(p, first)?)))
        }
        _ => Err(p.error(format!("Unexpected token in condition: {:?} '{}'", p.peek_kind(), p.peek().text))),
    }
}

// ============================================================================
// Tests
// ============================================================================
