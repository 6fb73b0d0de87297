//! Pratt expression parser.
//!
//! Precedence climbing over the token stream, loosest binding first:
//!
//! 1. `or`
//! 2. `and`
//! 3. comparison (`=`, `!=`, `<`, `<=`, `>`, `>=`) and containment (`in`)
//! 4. additive (`+`, `-`)
//! 5. multiplicative (`*`, `/`, `%`)
//!
//! Prefix `not` and `-` bind tighter than any infix operator. `if`, `for`,
//! `any` and `every` are whole-expression forms. The context override
//! `Ref::expr` binds its body at prefix level.

use efx_ast::expr::{AssetRef, BinaryOp, Expr, ExprKind, LiteralKind, QuantifierKind, RefExpr, UnaryOp};
use efx_ast::foundation::XPath;

use crate::error::ParseResult;
use crate::lexer::{tokenize, Token};
use crate::stream::TokenStream;

/// Parse a complete EFX expression from source text.
pub fn parse_expression(source: &str) -> ParseResult<Expr> {
    let tokens = tokenize(source)?;
    let mut stream = TokenStream::new(&tokens);
    let expr = parse_expr(&mut stream)?;
    if stream.at_end() {
        Ok(expr)
    } else {
        Err(stream.unexpected("end of input"))
    }
}

/// Parse one expression from an existing stream.
///
/// Used by the template parser for `${...}` value references and context
/// declarations.
pub fn parse_expr(stream: &mut TokenStream) -> ParseResult<Expr> {
    match stream.peek() {
        Some(Token::If) => parse_if(stream),
        Some(Token::For) => parse_iteration(stream),
        Some(Token::Any) | Some(Token::Every) => parse_quantified(stream),
        _ => parse_pratt(stream, 0),
    }
}

/// Binary operator table: token → (precedence, operator).
///
/// Single source of truth for infix parsing; higher precedence binds
/// tighter. All EFX infix operators are left-associative.
fn binary_op_info(token: &Token) -> Option<(u8, BinaryOp)> {
    match token {
        Token::Or => Some((10, BinaryOp::Or)),
        Token::And => Some((20, BinaryOp::And)),
        Token::Eq => Some((30, BinaryOp::Eq)),
        Token::Ne => Some((30, BinaryOp::Ne)),
        Token::Lt => Some((30, BinaryOp::Lt)),
        Token::Le => Some((30, BinaryOp::Le)),
        Token::Gt => Some((30, BinaryOp::Gt)),
        Token::Ge => Some((30, BinaryOp::Ge)),
        Token::Plus => Some((40, BinaryOp::Add)),
        Token::Minus => Some((40, BinaryOp::Sub)),
        Token::Star => Some((50, BinaryOp::Mul)),
        Token::Slash => Some((50, BinaryOp::Div)),
        Token::Percent => Some((50, BinaryOp::Mod)),
        _ => None,
    }
}

/// Containment binds at comparison precedence.
const CONTAINMENT_PREC: u8 = 30;

fn parse_pratt(stream: &mut TokenStream, min_prec: u8) -> ParseResult<Expr> {
    let mut left = parse_prefix(stream)?;

    while let Some(token) = stream.peek() {
        if matches!(token, Token::In) {
            if CONTAINMENT_PREC < min_prec {
                break;
            }
            stream.advance();
            let list = parse_pratt(stream, CONTAINMENT_PREC + 1)?;
            left = Expr::new(ExprKind::In {
                item: Box::new(left),
                list: Box::new(list),
            });
            continue;
        }
        match binary_op_info(token) {
            Some((prec, op)) if prec >= min_prec => {
                stream.advance();
                let right = parse_pratt(stream, prec + 1)?;
                left = Expr::new(ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                });
            }
            _ => break,
        }
    }

    Ok(left)
}

fn parse_prefix(stream: &mut TokenStream) -> ParseResult<Expr> {
    match stream.peek() {
        Some(Token::Not) => {
            stream.advance();
            let operand = parse_prefix(stream)?;
            Ok(Expr::new(ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            }))
        }
        Some(Token::Minus) => {
            stream.advance();
            let operand = parse_prefix(stream)?;
            Ok(Expr::new(ExprKind::Unary {
                op: UnaryOp::Minus,
                operand: Box::new(operand),
            }))
        }
        _ => parse_primary(stream),
    }
}

fn parse_primary(stream: &mut TokenStream) -> ParseResult<Expr> {
    match stream.peek().cloned() {
        Some(Token::Number(text)) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(LiteralKind::Number(text))))
        }
        Some(Token::String(text)) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(LiteralKind::String(text))))
        }
        Some(Token::True) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(LiteralKind::Boolean(true))))
        }
        Some(Token::False) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Literal(LiteralKind::Boolean(false))))
        }
        Some(Token::LParen) => parse_group(stream),
        Some(Token::Ident(name)) => {
            stream.advance();
            stream.expect(Token::LParen)?;
            if name == "notice" {
                return parse_notice_ref(stream);
            }
            let args = parse_call_args(stream)?;
            Ok(Expr::new(ExprKind::Call { name, args }))
        }
        Some(Token::AssetId(_)) => {
            let reference = parse_ref(stream)?;
            if stream.eat(&Token::ColonColon) {
                let body = parse_prefix(stream)?;
                Ok(Expr::new(ExprKind::ContextOverride {
                    target: reference,
                    body: Box::new(body),
                }))
            } else {
                Ok(Expr::new(ExprKind::Ref(reference)))
            }
        }
        Some(Token::Variable(name)) => {
            stream.advance();
            Ok(Expr::new(ExprKind::Variable(name)))
        }
        Some(Token::Codelist) => {
            stream.advance();
            stream.expect(Token::Colon)?;
            match stream.peek().cloned() {
                Some(Token::Ident(name)) => {
                    stream.advance();
                    Ok(Expr::new(ExprKind::Codelist(name)))
                }
                _ => Err(stream.unexpected("codelist name")),
            }
        }
        Some(Token::AbsolutePath(text)) => {
            stream.advance();
            Ok(Expr::new(ExprKind::AbsolutePath(XPath::parse(&text))))
        }
        _ => Err(stream.unexpected("expression")),
    }
}

/// Parse `( ... )`: empty list, parenthesized expression, or list.
fn parse_group(stream: &mut TokenStream) -> ParseResult<Expr> {
    stream.expect(Token::LParen)?;
    if stream.eat(&Token::RParen) {
        return Ok(Expr::new(ExprKind::List(Vec::new())));
    }
    let first = parse_expr(stream)?;
    if stream.eat(&Token::Comma) {
        let mut items = vec![first];
        loop {
            items.push(parse_expr(stream)?);
            if !stream.eat(&Token::Comma) {
                break;
            }
        }
        stream.expect(Token::RParen)?;
        Ok(Expr::new(ExprKind::List(items)))
    } else {
        stream.expect(Token::RParen)?;
        Ok(Expr::new(ExprKind::Parenthesized(Box::new(first))))
    }
}

/// Parse a field/node reference with optional `[predicate]` suffixes.
pub(crate) fn parse_ref(stream: &mut TokenStream) -> ParseResult<RefExpr> {
    let id = match stream.peek().cloned() {
        Some(Token::AssetId(id)) => {
            stream.advance();
            id
        }
        _ => return Err(stream.unexpected("field or node identifier")),
    };
    let asset = if id.starts_with("ND-") {
        AssetRef::Node(id)
    } else {
        AssetRef::Field(id)
    };
    let mut predicates = Vec::new();
    while stream.eat(&Token::LBracket) {
        predicates.push(parse_expr(stream)?);
        stream.expect(Token::RBracket)?;
    }
    Ok(RefExpr { asset, predicates })
}

/// Parse `notice(id)` with an optional `/Field` projection.
///
/// The opening `notice(` has already been consumed. The projection
/// arrives as one absolute-path token (`/BT-00-Code` lexes as a path,
/// not as `/` followed by an identifier); a single asset-shaped step is
/// taken as the projected field.
fn parse_notice_ref(stream: &mut TokenStream) -> ParseResult<Expr> {
    let notice = parse_expr(stream)?;
    stream.expect(Token::RParen)?;
    let field = match stream.peek().cloned() {
        Some(Token::AbsolutePath(text)) => match projected_asset(&text) {
            Some(asset) => {
                stream.advance();
                Some(RefExpr::plain(asset))
            }
            None => None,
        },
        _ => None,
    };
    Ok(Expr::new(ExprKind::NoticeRef {
        notice: Box::new(notice),
        field,
    }))
}

/// The asset a one-step absolute path projects, when its single step is
/// shaped like an asset identifier (`/BT-00-Code`, `/ND-Root`).
fn projected_asset(text: &str) -> Option<AssetRef> {
    let id = text.strip_prefix('/')?;
    let shaped = id.starts_with(|c: char| c.is_ascii_uppercase())
        && id.contains('-')
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !shaped {
        return None;
    }
    Some(if id.starts_with("ND-") {
        AssetRef::Node(id.to_string())
    } else {
        AssetRef::Field(id.to_string())
    })
}

fn parse_call_args(stream: &mut TokenStream) -> ParseResult<Vec<Expr>> {
    let mut args = Vec::new();
    if stream.eat(&Token::RParen) {
        return Ok(args);
    }
    loop {
        args.push(parse_expr(stream)?);
        if !stream.eat(&Token::Comma) {
            break;
        }
    }
    stream.expect(Token::RParen)?;
    Ok(args)
}

fn parse_if(stream: &mut TokenStream) -> ParseResult<Expr> {
    stream.expect(Token::If)?;
    let condition = parse_expr(stream)?;
    stream.expect(Token::Then)?;
    let then_branch = parse_expr(stream)?;
    stream.expect(Token::Else)?;
    let else_branch = parse_expr(stream)?;
    Ok(Expr::new(ExprKind::If {
        condition: Box::new(condition),
        then_branch: Box::new(then_branch),
        else_branch: Box::new(else_branch),
    }))
}

fn parse_iteration(stream: &mut TokenStream) -> ParseResult<Expr> {
    stream.expect(Token::For)?;
    let variable = parse_bound_variable(stream)?;
    stream.expect(Token::In)?;
    let list = parse_pratt(stream, 0)?;
    stream.expect(Token::Return)?;
    let body = parse_expr(stream)?;
    Ok(Expr::new(ExprKind::Iteration {
        variable,
        list: Box::new(list),
        body: Box::new(body),
    }))
}

fn parse_quantified(stream: &mut TokenStream) -> ParseResult<Expr> {
    let kind = match stream.advance() {
        Some(Token::Any) => QuantifierKind::Any,
        Some(Token::Every) => QuantifierKind::Every,
        _ => unreachable!("caller checked the quantifier keyword"),
    };
    let variable = parse_bound_variable(stream)?;
    stream.expect(Token::In)?;
    let list = parse_pratt(stream, 0)?;
    stream.expect(Token::Satisfies)?;
    let body = parse_expr(stream)?;
    Ok(Expr::new(ExprKind::Quantified {
        kind,
        variable,
        list: Box::new(list),
        body: Box::new(body),
    }))
}

fn parse_bound_variable(stream: &mut TokenStream) -> ParseResult<String> {
    match stream.peek().cloned() {
        Some(Token::Variable(name)) => {
            stream.advance();
            Ok(name)
        }
        _ => Err(stream.unexpected("bound variable")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence() {
        let expr = parse_expression("1 + 2 * 3").unwrap();
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::Add, right, .. } => {
                assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_not_with_parens() {
        let expr = parse_expression("not(1 = 2) and (2 = 2)").unwrap();
        match expr.kind {
            ExprKind::Binary { op: BinaryOp::And, left, right } => {
                assert!(matches!(left.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
                assert!(matches!(right.kind, ExprKind::Parenthesized(_)));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_field_ref_with_predicate() {
        let expr = parse_expression("BT-00-Code['x' = 'x']").unwrap();
        match expr.kind {
            ExprKind::Ref(r) => {
                assert_eq!(r.asset, AssetRef::Field("BT-00-Code".into()));
                assert_eq!(r.predicates.len(), 1);
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_node_ref_classified_by_prefix() {
        let expr = parse_expression("ND-Root").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Ref(RefExpr { asset: AssetRef::Node(_), .. })
        ));
    }

    #[test]
    fn test_context_override() {
        let expr = parse_expression("ND-Root::BT-00-Code").unwrap();
        match expr.kind {
            ExprKind::ContextOverride { target, body } => {
                assert_eq!(target.asset, AssetRef::Node("ND-Root".into()));
                assert!(matches!(body.kind, ExprKind::Ref(_)));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_list_and_containment() {
        let expr = parse_expression("BT-00-Code in ('a', 'b', 'c')").unwrap();
        match expr.kind {
            ExprKind::In { list, .. } => match list.kind {
                ExprKind::List(items) => assert_eq!(items.len(), 3),
                other => panic!("unexpected list: {:?}", other),
            },
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_conditional() {
        let expr = parse_expression("if 1 = 1 then 'a' else 'b'").unwrap();
        assert!(matches!(expr.kind, ExprKind::If { .. }));
    }

    #[test]
    fn test_iteration() {
        let expr = parse_expression("for $x in (1, 2) return $x + 1").unwrap();
        match expr.kind {
            ExprKind::Iteration { variable, .. } => assert_eq!(variable, "x"),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_quantified() {
        let expr = parse_expression("every $t in ('a') satisfies $t = 'a'").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Quantified { kind: QuantifierKind::Every, .. }
        ));
    }

    #[test]
    fn test_codelist_expansion() {
        let expr = parse_expression("BT-00-Code in codelist:currencies").unwrap();
        match expr.kind {
            ExprKind::In { list, .. } => {
                assert_eq!(list.kind, ExprKind::Codelist("currencies".into()));
            }
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_absolute_path_atom() {
        let expr = parse_expression("count(/*/PathNode/CodeField/normalize-space(text())) = 1").unwrap();
        match expr.kind {
            ExprKind::Binary { left, .. } => match left.kind {
                ExprKind::Call { name, args } => {
                    assert_eq!(name, "count");
                    assert!(matches!(args[0].kind, ExprKind::AbsolutePath(_)));
                }
                other => panic!("unexpected call: {:?}", other),
            },
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_notice_reference() {
        let expr = parse_expression("notice('abc-123')/BT-00-Code = 'EUR'").unwrap();
        match expr.kind {
            ExprKind::Binary { left, .. } => match left.kind {
                ExprKind::NoticeRef { field, .. } => {
                    let field = field.expect("projected field");
                    assert_eq!(field.asset, AssetRef::Field("BT-00-Code".into()));
                }
                other => panic!("unexpected parse: {:?}", other),
            },
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_notice_reference_without_projection() {
        let expr = parse_expression("notice('abc-123')").unwrap();
        match expr.kind {
            ExprKind::NoticeRef { field, .. } => assert!(field.is_none()),
            other => panic!("unexpected parse: {:?}", other),
        }
    }

    #[test]
    fn test_trailing_input_rejected() {
        assert!(parse_expression("1 = 1 1").is_err());
    }

    #[test]
    fn test_missing_operand_rejected() {
        assert!(parse_expression("1 +").is_err());
    }
}
