//! Token stream wrapper for the hand-written parser.

use std::ops::Range;

use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

/// Token stream with lookahead and position tracking.
///
/// Each token is paired with its byte range in the source, so errors can
/// point at the offending input.
pub struct TokenStream<'src> {
    tokens: &'src [(Token, Range<usize>)],
    pos: usize,
}

impl<'src> TokenStream<'src> {
    /// Create a stream over lexed tokens.
    pub fn new(tokens: &'src [(Token, Range<usize>)]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(tok, _)| tok)
    }

    /// Peek at the nth token ahead without consuming.
    pub fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n).map(|(tok, _)| tok)
    }

    /// Advance and return the consumed token.
    pub fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos).map(|(tok, _)| tok);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Whether the current token matches `expected` (by discriminant).
    pub fn check(&self, expected: &Token) -> bool {
        matches!(self.peek(), Some(t) if std::mem::discriminant(t) == std::mem::discriminant(expected))
    }

    /// Consume the current token when it matches, otherwise error.
    pub fn expect(&mut self, expected: Token) -> ParseResult<()> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::expected(
                &expected.to_string(),
                self.peek(),
                self.offset(),
            ))
        }
    }

    /// Consume the current token when it matches; report whether it did.
    pub fn eat(&mut self, expected: &Token) -> bool {
        if self.check(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Whether the whole stream has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Byte offset of the current token (or of the end of input).
    pub fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or_else(|| self.tokens.last().map(|(_, span)| span.end).unwrap_or(0))
    }

    /// Error for an unexpected current token.
    pub fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::expected(expected, self.peek(), self.offset())
    }
}
