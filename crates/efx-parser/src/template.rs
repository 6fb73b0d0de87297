//! Line-based template parser.
//!
//! A template is parsed line by line. Each line yields a
//! [`TemplateLine`]: its verbatim leading whitespace (the template
//! translator derives indentation levels and enforces the tab/space
//! contract), an optional outline number, an optional `{...}` context
//! declaration, and content pieces.
//!
//! Content syntax:
//!
//! - `#{...}` — label reference (`asset|type|id`, `labelType|FieldId`, or
//!   `labelType|$alias`)
//! - `${...}` — value reference holding one EFX expression
//! - anything else — free text, kept verbatim
//!
//! Blank lines and `//` comment lines are skipped.

use efx_ast::template::{ContentPart, ContextDecl, LabelRef, TemplateLine};

use crate::error::{ParseError, ParseResult};
use crate::expr::{parse_expr, parse_ref};
use crate::lexer::{tokenize, Token};
use crate::stream::TokenStream;

/// Parse template source into its lines.
pub fn parse_template(source: &str) -> ParseResult<Vec<TemplateLine>> {
    let mut lines = Vec::new();
    let mut offset = 0usize;
    for raw in source.lines() {
        let trimmed = raw.trim();
        if !trimmed.is_empty() && !trimmed.starts_with("//") {
            lines.push(parse_line(raw, offset)?);
        }
        offset += raw.len() + 1;
    }
    Ok(lines)
}

fn parse_line(raw: &str, base: usize) -> ParseResult<TemplateLine> {
    let indent_len = raw.len() - raw.trim_start_matches([' ', '\t']).len();
    let leading = raw[..indent_len].to_string();
    let mut rest = &raw[indent_len..];
    let mut cursor = base + indent_len;

    let number = take_outline_number(&mut rest, &mut cursor);

    let context = if rest.starts_with('{') {
        let close = matching_brace(rest)
            .ok_or_else(|| ParseError::invalid("unterminated context declaration", cursor))?;
        let inner = &rest[1..close];
        let declaration = parse_context_decl(inner, cursor + 1)?;
        cursor += close + 1;
        rest = &rest[close + 1..];
        Some(declaration)
    } else {
        None
    };

    // One separating space between the declaration and the content is
    // syntax, not output.
    if let Some(stripped) = rest.strip_prefix(' ') {
        rest = stripped;
        cursor += 1;
    }

    let content = parse_content(rest.trim_end(), cursor)?;

    Ok(TemplateLine {
        leading,
        number,
        context,
        content,
    })
}

/// Take a leading outline number when the line starts `N {`.
fn take_outline_number(rest: &mut &str, cursor: &mut usize) -> Option<u32> {
    let digits_len = rest.chars().take_while(char::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let after = rest[digits_len..].trim_start();
    if !after.starts_with('{') {
        return None;
    }
    let number = rest[..digits_len].parse().ok()?;
    let skipped = rest.len() - after.len();
    *cursor += skipped;
    *rest = after;
    Some(number)
}

fn parse_context_decl(inner: &str, base: usize) -> ParseResult<ContextDecl> {
    let tokens = tokenize(inner).map_err(|e| e.rebase(base))?;
    let mut stream = TokenStream::new(&tokens);
    let reference = parse_ref(&mut stream).map_err(|e| e.rebase(base))?;
    let alias = if stream.eat(&Token::As) {
        match stream.peek().cloned() {
            Some(Token::Variable(name)) => {
                stream.advance();
                Some(name)
            }
            _ => return Err(stream.unexpected("alias variable").rebase(base)),
        }
    } else {
        None
    };
    if !stream.at_end() {
        return Err(stream.unexpected("end of context declaration").rebase(base));
    }
    Ok(ContextDecl { reference, alias })
}

fn parse_content(mut rest: &str, mut cursor: usize) -> ParseResult<Vec<ContentPart>> {
    let mut parts = Vec::new();
    while !rest.is_empty() {
        let label_at = rest.find("#{");
        let value_at = rest.find("${");
        let next = match (label_at, value_at) {
            (Some(l), Some(v)) => l.min(v),
            (Some(l), None) => l,
            (None, Some(v)) => v,
            (None, None) => {
                parts.push(ContentPart::Text(rest.to_string()));
                break;
            }
        };
        if next > 0 {
            parts.push(ContentPart::Text(rest[..next].to_string()));
            rest = &rest[next..];
            cursor += next;
        }
        let is_label = rest.starts_with("#{");
        let braced = &rest[1..];
        let close = matching_brace(braced)
            .ok_or_else(|| ParseError::invalid("unterminated reference", cursor))?;
        let inner = &braced[1..close];
        if is_label {
            parts.push(ContentPart::Label(parse_label(inner, cursor + 2)?));
        } else {
            let tokens = tokenize(inner).map_err(|e| e.rebase(cursor + 2))?;
            let mut stream = TokenStream::new(&tokens);
            let expr = parse_expr(&mut stream).map_err(|e| e.rebase(cursor + 2))?;
            if !stream.at_end() {
                return Err(stream.unexpected("end of value reference").rebase(cursor + 2));
            }
            parts.push(ContentPart::Value(expr));
        }
        let consumed = close + 2;
        rest = &rest[consumed..];
        cursor += consumed;
    }
    Ok(parts)
}

/// Resolve the `#{...}` shorthand forms.
fn parse_label(inner: &str, base: usize) -> ParseResult<LabelRef> {
    let parts: Vec<&str> = inner.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [asset_type, label_type, asset_id] => Ok(LabelRef::Explicit {
            asset_type: asset_type.to_string(),
            label_type: label_type.to_string(),
            asset_id: asset_id.to_string(),
        }),
        [label_type, target] => {
            if let Some(alias) = target.strip_prefix('$') {
                Ok(LabelRef::Alias {
                    label_type: label_type.to_string(),
                    alias: alias.to_string(),
                })
            } else {
                Ok(LabelRef::Field {
                    label_type: label_type.to_string(),
                    field_id: target.to_string(),
                })
            }
        }
        _ => Err(ParseError::invalid(
            format!("label reference '{}' needs two or three |-separated parts", inner),
            base,
        )),
    }
}

/// Index of the brace closing the one at position 0, honoring nesting and
/// single-quoted strings.
fn matching_brace(text: &str) -> Option<usize> {
    debug_assert!(text.starts_with('{'));
    let mut depth = 0i32;
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => in_quote = !in_quote,
            '{' if !in_quote => depth += 1,
            '}' if !in_quote => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl ParseError {
    /// Shift an error produced against a substring to whole-source offsets.
    fn rebase(mut self, base: usize) -> Self {
        self.offset += base;
        self
    }
}
