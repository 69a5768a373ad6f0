//! FieldPath: a dotted path into a resource's fields.

use smallvec::SmallVec;

use crate::{Error, Result};

/// A field path: `stringValue`, `conceptValue.stringValue`, ...
///
/// The first segment names a field on the resource; every further segment
/// names a field on the concept reached so far.
///
/// Always has at least one segment: only `parse` and the parser build one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[String; 4]>,
}

impl FieldPath {
    /// Parse and validate dotted path syntax. Resolution against a type is
    /// left to evaluation.
    pub fn parse(text: &str) -> Result<Self> {
        let mut segments = SmallVec::new();
        let mut offset = 0;
        for segment in text.split('.') {
            if !is_identifier(segment) {
                return Err(Error::SyntaxError {
                    position: offset,
                    fragment: text.to_string(),
                    message: format!("Invalid field path segment '{segment}'"),
                });
            }
            segments.push(segment.to_string());
            offset += segment.len() + 1;
        }
        Ok(Self { segments })
    }

    /// Build from segments the lexer has already validated.
    pub(crate) fn from_segments(segments: impl IntoIterator<Item = String>) -> Self {
        Self { segments: segments.into_iter().collect() }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> &str {
        // Non-empty by construction.
        &self.segments[0]
    }

    pub fn rest(&self) -> &[String] {
        &self.segments[1..]
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => chars.all(|c| c.is_alphanumeric() || c == '_'),
        _ => false,
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let path = FieldPath::parse("conceptValue.stringValue").unwrap();
        assert_eq!(path.first(), "conceptValue");
        assert_eq!(path.rest(), ["stringValue".to_string()]);
        assert_eq!(path.to_string(), "conceptValue.stringValue");
        assert_eq!(path.segments(), ["conceptValue".to_string(), "stringValue".to_string()]);
    }

    #[test]
    fn test_single_segment_has_empty_rest() {
        let path = FieldPath::parse("stringValue").unwrap();
        assert_eq!(path.segments().len(), 1);
        assert_eq!(path.first(), "stringValue");
        assert!(path.rest().is_empty());
    }

    #[test]
    fn test_parse_rejects_bad_syntax() {
        assert!(FieldPath::parse("").is_err());
        assert!(FieldPath::parse("a..b").is_err());
        assert!(FieldPath::parse("a.").is_err());
        assert!(FieldPath::parse("1abc").is_err());
    }

    #[test]
    fn test_error_position_points_at_segment() {
        match FieldPath::parse("conceptValue.9x") {
            Err(Error::SyntaxError { position, .. }) => assert_eq!(position, 13),
            other => panic!("Expected SyntaxError, got {other:?}"),
        }
    }
}
