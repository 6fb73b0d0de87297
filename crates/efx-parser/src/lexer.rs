//! Lexical analysis for EFX using logos.
//!
//! # Design
//!
//! - Keywords are lowercase words; asset identifiers are uppercase-led and
//!   always contain at least one `-` group (`BT-00-Code`, `ND-Root`), so
//!   they never collide with keywords or function names.
//! - Absolute location paths embedded in expressions are lexed as one
//!   token. The first step must start with `*`, `@` or a letter, which
//!   keeps `6 / 2` lexing as division while `/*/PathNode` lexes as a path.
//! - Comments (`//` to end of line) are stripped during lexing.

use logos::Logos;
use std::fmt;

/// EFX token.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // === Keywords ===
    /// Keyword `and`
    #[token("and")]
    And,
    /// Keyword `or`
    #[token("or")]
    Or,
    /// Keyword `not`
    #[token("not")]
    Not,
    /// Keyword `in`
    #[token("in")]
    In,
    /// Keyword `if`
    #[token("if")]
    If,
    /// Keyword `then`
    #[token("then")]
    Then,
    /// Keyword `else`
    #[token("else")]
    Else,
    /// Keyword `for`
    #[token("for")]
    For,
    /// Keyword `return`
    #[token("return")]
    Return,
    /// Keyword `any`
    #[token("any")]
    Any,
    /// Keyword `every`
    #[token("every")]
    Every,
    /// Keyword `satisfies`
    #[token("satisfies")]
    Satisfies,
    /// Keyword `as`
    #[token("as")]
    As,
    /// Keyword `codelist`
    #[token("codelist")]
    Codelist,
    /// Literal `true`
    #[token("true")]
    True,
    /// Literal `false`
    #[token("false")]
    False,

    // === Operators and delimiters ===
    /// `::`
    #[token("::")]
    ColonColon,
    /// `:`
    #[token(":")]
    Colon,
    /// `=`
    #[token("=")]
    Eq,
    /// `!=`
    #[token("!=")]
    Ne,
    /// `<=`
    #[token("<=")]
    Le,
    /// `>=`
    #[token(">=")]
    Ge,
    /// `<`
    #[token("<")]
    Lt,
    /// `>`
    #[token(">")]
    Gt,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `,`
    #[token(",")]
    Comma,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,

    // === Literals and identifiers ===
    /// Numeric literal, source spelling preserved
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_owned())]
    Number(String),
    /// Single-quoted string literal, quotes stripped
    #[regex(r"'[^']*'", |lex| { let s = lex.slice(); s[1..s.len() - 1].to_owned() })]
    String(String),
    /// Schema asset identifier (`BT-00-Code`, `ND-Root`)
    #[regex(r"[A-Z][A-Z0-9]*(-[A-Za-z0-9]+)+", |lex| lex.slice().to_owned(), priority = 3)]
    AssetId(String),
    /// Function or codelist identifier
    #[regex(r"[a-z][a-z0-9]*(-[a-z0-9]+)*", |lex| lex.slice().to_owned(), priority = 1)]
    Ident(String),
    /// Bound-variable reference, `$` stripped
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice()[1..].to_owned())]
    Variable(String),
    /// Absolute location path embedded in the source
    #[regex(
        r"(/(\*|@?[A-Za-z][A-Za-z0-9:._-]*(\(([^()]|\([^()]*\))*\))?)(\[([^\[\]]|\[[^\]]*\])*\])*)+",
        |lex| lex.slice().to_owned()
    )]
    AbsolutePath(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::And => write!(f, "and"),
            Token::Or => write!(f, "or"),
            Token::Not => write!(f, "not"),
            Token::In => write!(f, "in"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
            Token::For => write!(f, "for"),
            Token::Return => write!(f, "return"),
            Token::Any => write!(f, "any"),
            Token::Every => write!(f, "every"),
            Token::Satisfies => write!(f, "satisfies"),
            Token::As => write!(f, "as"),
            Token::Codelist => write!(f, "codelist"),
            Token::True => write!(f, "true"),
            Token::False => write!(f, "false"),
            Token::ColonColon => write!(f, "::"),
            Token::Colon => write!(f, ":"),
            Token::Eq => write!(f, "="),
            Token::Ne => write!(f, "!="),
            Token::Le => write!(f, "<="),
            Token::Ge => write!(f, ">="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Percent => write!(f, "%"),
            Token::Comma => write!(f, ","),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::Number(s) => write!(f, "{}", s),
            Token::String(s) => write!(f, "'{}'", s),
            Token::AssetId(s) => write!(f, "{}", s),
            Token::Ident(s) => write!(f, "{}", s),
            Token::Variable(s) => write!(f, "${}", s),
            Token::AbsolutePath(s) => write!(f, "{}", s),
        }
    }
}

/// Tokenize EFX source, pairing each token with its byte range.
pub fn tokenize(source: &str) -> Result<Vec<(Token, std::ops::Range<usize>)>, crate::ParseError> {
    let mut tokens = Vec::new();
    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                return Err(crate::ParseError::lexical(
                    &source[span.start..span.end.min(source.len())],
                    span.start,
                ))
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_keywords_and_operators() {
        assert_eq!(
            lex("not 1 = 2 and true"),
            vec![
                Token::Not,
                Token::Number("1".into()),
                Token::Eq,
                Token::Number("2".into()),
                Token::And,
                Token::True,
            ]
        );
    }

    #[test]
    fn test_asset_ids() {
        assert_eq!(
            lex("BT-00-Code ND-Root"),
            vec![
                Token::AssetId("BT-00-Code".into()),
                Token::AssetId("ND-Root".into()),
            ]
        );
    }

    #[test]
    fn test_function_ident_with_dashes() {
        assert_eq!(
            lex("starts-with('a', 'b')"),
            vec![
                Token::Ident("starts-with".into()),
                Token::LParen,
                Token::String("a".into()),
                Token::Comma,
                Token::String("b".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_absolute_path_atom() {
        assert_eq!(
            lex("count(/*/PathNode/CodeField/normalize-space(text()))"),
            vec![
                Token::Ident("count".into()),
                Token::LParen,
                Token::AbsolutePath("/*/PathNode/CodeField/normalize-space(text())".into()),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_division_is_not_a_path() {
        assert_eq!(
            lex("6 / 2"),
            vec![
                Token::Number("6".into()),
                Token::Slash,
                Token::Number("2".into()),
            ]
        );
    }

    #[test]
    fn test_path_with_predicate() {
        assert_eq!(
            lex("/a/b[c]/d"),
            vec![Token::AbsolutePath("/a/b[c]/d".into())]
        );
    }

    #[test]
    fn test_variable_and_codelist() {
        assert_eq!(
            lex("$item in codelist:currencies"),
            vec![
                Token::Variable("item".into()),
                Token::In,
                Token::Codelist,
                Token::Colon,
                Token::Ident("currencies".into()),
            ]
        );
    }

    #[test]
    fn test_lexical_error() {
        assert!(tokenize("1 ~ 2").is_err());
    }
}
