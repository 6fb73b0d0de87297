//! Parse error types.

use thiserror::Error;

use crate::lexer::Token;

/// Parse error with byte offset and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message} (at offset {offset})")]
pub struct ParseError {
    /// Kind of parse error
    pub kind: ParseErrorKind,
    /// Byte offset into the parsed text where the error occurred
    pub offset: usize,
    /// Human-readable error message
    pub message: String,
}

/// Category of parse error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Character sequence that is not a token
    Lexical,
    /// Token present but not the one the grammar requires here
    UnexpectedToken,
    /// Input ended while a construct was incomplete
    UnexpectedEof,
    /// Structurally invalid construct (template line shape, label form)
    InvalidSyntax,
}

impl ParseError {
    /// Create a lexical error for an unrecognized character sequence.
    pub fn lexical(slice: &str, offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::Lexical,
            offset,
            message: format!("unrecognized input '{}'", slice),
        }
    }

    /// Create an "expected token" error.
    pub fn expected(expected: &str, found: Option<&Token>, offset: usize) -> Self {
        match found {
            Some(token) => Self {
                kind: ParseErrorKind::UnexpectedToken,
                offset,
                message: format!("expected {}, found '{}'", expected, token),
            },
            None => Self {
                kind: ParseErrorKind::UnexpectedEof,
                offset,
                message: format!("expected {}, found end of input", expected),
            },
        }
    }

    /// Create a structural syntax error.
    pub fn invalid(message: impl Into<String>, offset: usize) -> Self {
        Self {
            kind: ParseErrorKind::InvalidSyntax,
            offset,
            message: message.into(),
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
