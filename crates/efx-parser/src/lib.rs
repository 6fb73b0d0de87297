//! # EFX front end
//!
//! Tokenization and parsing of EFX source into the untyped AST defined in
//! `efx-ast`. The translator consumes the AST; nothing downstream of this
//! crate touches source text again.
//!
//! - [`lexer`] — logos token definitions
//! - [`stream`] — token stream with lookahead for the hand-written parser
//! - [`expr`] — Pratt expression parser
//! - [`template`] — line-based template parser
//!
//! Lexical and syntactic failures surface as [`ParseError`]; the
//! translation layer forwards them as its grammar-error kind.

pub mod error;
pub mod expr;
pub mod lexer;
pub mod stream;
pub mod template;

pub use error::{ParseError, ParseErrorKind};
pub use expr::parse_expression;
pub use lexer::Token;
pub use stream::TokenStream;
pub use template::parse_template;
