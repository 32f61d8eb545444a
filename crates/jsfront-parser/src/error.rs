use serde::Serialize;
use thiserror::Error;

use crate::span::{Marker, Span};

/// Which phase rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed token: unterminated literal, bad escape, invalid character.
    Lexical,
    /// The token stream does not match the grammar.
    Syntax,
    /// Grammatically valid but forbidden by a static rule.
    Early,
    /// Valid ECMAScript that the current options switch off.
    Unsupported,
    /// Nesting exceeded the configured depth limit.
    Resource,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lexical => "lexical error",
            Self::Syntax => "syntax error",
            Self::Early => "early error",
            Self::Unsupported => "unsupported syntax",
            Self::Resource => "resource limit",
        };
        f.write_str(name)
    }
}

/// The single error a failed parse reports.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{message} ({line}:{column})")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub message: String,
    /// Byte offset of the offending token or node.
    pub offset: u32,
    /// 1-based line.
    pub line: u32,
    /// 0-based column in UTF-16 units.
    pub column: u32,
}

impl ParseError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, at: Marker) -> Self {
        Self {
            kind,
            message: message.into(),
            offset: at.offset,
            line: at.pos.line,
            column: at.pos.column,
        }
    }

    pub fn syntax(message: impl Into<String>, at: Marker) -> Self {
        Self::new(ErrorKind::Syntax, message, at)
    }

    pub fn early(message: impl Into<String>, at: Marker) -> Self {
        Self::new(ErrorKind::Early, message, at)
    }

    /// An early error reported at the start of a node.
    pub fn early_at(message: impl Into<String>, span: Span) -> Self {
        Self::early(message, span.start_marker())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    #[test]
    fn test_display_includes_position() {
        let at = Marker {
            offset: 12,
            pos: Position { line: 2, column: 4 },
        };
        let err = ParseError::syntax("Unexpected token", at);
        assert_eq!(err.to_string(), "Unexpected token (2:4)");
        assert_eq!(err.kind, ErrorKind::Syntax);
        assert_eq!(err.offset, 12);
    }
}
