//! Query lexer. Tokenizes query text and query definition files.

use crate::{Error, Result};

/// A token from the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub text: String,
}

/// Source span (byte offsets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// Token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Select, Where, And, Or, True, False,

    // Literals
    Integer, Float, StringLiteral,

    // Identifiers and parameters
    Identifier,
    Parameter,  // _$name

    // Punctuation
    LParen, RParen, LBrace, RBrace, Dot, Colon,

    // Operators
    EqEq, Neq, Lt, Lte, Gt, Gte,

    Eof,
}

/// Longest source fragment quoted back in a syntax error.
const FRAGMENT_LEN: usize = 24;

/// Build a syntax error quoting the source from `position`.
pub(crate) fn syntax_error(input: &str, position: usize, message: impl Into<String>) -> Error {
    let fragment = input
        .get(position..)
        .unwrap_or_default()
        .chars()
        .take(FRAGMENT_LEN)
        .collect();
    Error::SyntaxError { position, fragment, message: message.into() }
}

/// Tokenize query text.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(pos, ch)) = chars.peek() {
        match ch {
            c if c.is_whitespace() => { chars.next(); }

            // Block comments /* ... */
            '/' if matches!(chars.clone().nth(1), Some((_, '*'))) => {
                chars.next();
                chars.next();
                loop {
                    match chars.next() {
                        Some((_, '*')) => {
                            if matches!(chars.peek(), Some(&(_, '/'))) {
                                chars.next();
                                break;
                            }
                        }
                        Some(_) => {}
                        None => return Err(syntax_error(input, pos, "Unterminated block comment")),
                    }
                }
            }

            // Line comments
            '/' if matches!(chars.clone().nth(1), Some((_, '/'))) => {
                while chars.peek().is_some_and(|&(_, c)| c != '\n') {
                    chars.next();
                }
            }

            // String literals, single or double quoted
            '\'' | '"' => {
                let quote = ch;
                chars.next();
                let mut s = String::new();
                loop {
                    match chars.next() {
                        Some((_, '\\')) => match chars.next() {
                            Some((_, 'n')) => s.push('\n'),
                            Some((_, 't')) => s.push('\t'),
                            Some((_, '\\')) => s.push('\\'),
                            Some((_, c)) if c == quote => s.push(c),
                            Some((_, c)) => { s.push('\\'); s.push(c); }
                            None => return Err(syntax_error(input, pos, "Unterminated string literal")),
                        },
                        Some((end, c)) if c == quote => {
                            tokens.push(Token {
                                kind: TokenKind::StringLiteral,
                                span: Span { start: pos, end: end + 1 },
                                text: s,
                            });
                            break;
                        }
                        Some((_, c)) => s.push(c),
                        None => return Err(syntax_error(input, pos, "Unterminated string literal")),
                    }
                }
            }

            // Numbers, with an optional leading minus
            c if c.is_ascii_digit() || (c == '-' && next_is_digit(&chars)) => {
                let mut num = String::new();
                if c == '-' {
                    num.push('-');
                    chars.next();
                }
                let mut is_float = false;
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_ascii_digit() {
                        num.push(c);
                        chars.next();
                    } else if c == '.' && !is_float && next_is_digit(&chars) {
                        is_float = true;
                        num.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    kind: if is_float { TokenKind::Float } else { TokenKind::Integer },
                    span: Span { start: pos, end: pos + num.len() },
                    text: num,
                });
            }

            // Parameter: _$name
            '_' if matches!(chars.clone().nth(1), Some((_, '$'))) => {
                chars.next();
                chars.next();
                let name = take_ident(&mut chars);
                if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(syntax_error(input, pos, "Expected parameter name after '_$'"));
                }
                tokens.push(Token {
                    kind: TokenKind::Parameter,
                    span: Span { start: pos, end: pos + name.len() + 2 },
                    text: name,
                });
            }

            // Identifiers and keywords
            c if c.is_alphabetic() || c == '_' => {
                let ident = take_ident(&mut chars);
                tokens.push(Token {
                    kind: keyword_or_ident(&ident),
                    span: Span { start: pos, end: pos + ident.len() },
                    text: ident,
                });
            }

            '(' => { chars.next(); tokens.push(punct(TokenKind::LParen, pos, "(")); }
            ')' => { chars.next(); tokens.push(punct(TokenKind::RParen, pos, ")")); }
            '{' => { chars.next(); tokens.push(punct(TokenKind::LBrace, pos, "{")); }
            '}' => { chars.next(); tokens.push(punct(TokenKind::RBrace, pos, "}")); }
            '.' => { chars.next(); tokens.push(punct(TokenKind::Dot, pos, ".")); }
            ':' => { chars.next(); tokens.push(punct(TokenKind::Colon, pos, ":")); }
            '=' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(punct(TokenKind::EqEq, pos, "=="));
                } else {
                    return Err(syntax_error(input, pos, "Unexpected '=', use '==' for equality"));
                }
            }
            '!' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(punct(TokenKind::Neq, pos, "!="));
                } else {
                    return Err(syntax_error(input, pos, "Unexpected '!', use '!=' for inequality"));
                }
            }
            '<' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(punct(TokenKind::Lte, pos, "<="));
                } else {
                    tokens.push(punct(TokenKind::Lt, pos, "<"));
                }
            }
            '>' => {
                chars.next();
                if matches!(chars.peek(), Some(&(_, '='))) {
                    chars.next();
                    tokens.push(punct(TokenKind::Gte, pos, ">="));
                } else {
                    tokens.push(punct(TokenKind::Gt, pos, ">"));
                }
            }

            other => {
                return Err(syntax_error(input, pos, format!("Unexpected character: '{other}'")));
            }
        }
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span { start: input.len(), end: input.len() },
        text: String::new(),
    });

    Ok(tokens)
}

fn next_is_digit(chars: &std::iter::Peekable<std::str::CharIndices<'_>>) -> bool {
    matches!(chars.clone().nth(1), Some((_, c)) if c.is_ascii_digit())
}

fn take_ident(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if c.is_alphanumeric() || c == '_' {
            ident.push(c);
            chars.next();
        } else {
            break;
        }
    }
    ident
}

fn punct(kind: TokenKind, pos: usize, text: &str) -> Token {
    Token {
        kind,
        span: Span { start: pos, end: pos + text.len() },
        text: text.to_string(),
    }
}

fn keyword_or_ident(s: &str) -> TokenKind {
    match s.to_uppercase().as_str() {
        "SELECT" => TokenKind::Select,
        "WHERE" => TokenKind::Where,
        "AND" => TokenKind::And,
        "OR" => TokenKind::Or,
        "TRUE" => TokenKind::True,
        "FALSE" => TokenKind::False,
        _ => TokenKind::Identifier,
    }
}
