//! Untyped expression tree produced by the EFX parser.
//!
//! The parser emits simple untyped structures: no symbol resolution, no
//! type information, just syntactic shape. The translator walks this tree
//! bottom-up and turns each node into a
//! [`TypedExpression`](crate::foundation::TypedExpression).
//!
//! Source positions stop at the parser boundary: grammar errors carry
//! positions, translation errors carry the offending identifier or token.

use crate::foundation::XPath;

/// Untyped EFX expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What kind of expression this is
    pub kind: ExprKind,
}

impl Expr {
    /// Create an expression from its kind.
    pub fn new(kind: ExprKind) -> Self {
        Self { kind }
    }

    /// Boxed convenience constructor.
    pub fn boxed(kind: ExprKind) -> Box<Self> {
        Box::new(Self::new(kind))
    }
}

/// Expression kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Literal constant
    Literal(LiteralKind),
    /// Explicit list `(a, b, c)`
    List(Vec<Expr>),
    /// Field or node reference, with optional predicates
    Ref(RefExpr),
    /// Raw absolute location path embedded in the source
    AbsolutePath(XPath),
    /// Bound-variable reference `$name`
    Variable(String),
    /// Codelist expansion `codelist:name`
    Codelist(String),
    /// Explicit grouping `(e)`; preserved so the target text keeps the
    /// source's parenthesization
    Parenthesized(Box<Expr>),
    /// Prefix operator
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// Infix operator
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// Built-in function call
    Call {
        /// Function name
        name: String,
        /// Arguments in declared order
        args: Vec<Expr>,
    },
    /// Containment `item in list`
    In {
        /// Tested item
        item: Box<Expr>,
        /// List expression
        list: Box<Expr>,
    },
    /// Quantified expression `any/every $x in L satisfies P`
    Quantified {
        /// `any` or `every`
        kind: QuantifierKind,
        /// Bound variable name (without `$`)
        variable: String,
        /// Quantified list
        list: Box<Expr>,
        /// Predicate over the bound variable
        body: Box<Expr>,
    },
    /// Iteration `for $x in L return E`
    Iteration {
        /// Bound variable name (without `$`)
        variable: String,
        /// Iterated list
        list: Box<Expr>,
        /// Mapped expression
        body: Box<Expr>,
    },
    /// Conditional `if c then a else b`
    If {
        /// Condition
        condition: Box<Expr>,
        /// Branch taken when true
        then_branch: Box<Expr>,
        /// Branch taken when false
        else_branch: Box<Expr>,
    },
    /// Cross-document reference `notice(id)` or `notice(id)/Field`
    NoticeRef {
        /// Expression identifying the referenced notice
        notice: Box<Expr>,
        /// Field read from the referenced notice, when present
        field: Option<RefExpr>,
    },
    /// Context override `Ref::expr`
    ContextOverride {
        /// The field or node supplying the temporary context
        target: RefExpr,
        /// Expression translated under that context
        body: Box<Expr>,
    },
}

/// A reference to a field or node, with optional predicates.
#[derive(Debug, Clone, PartialEq)]
pub struct RefExpr {
    /// What is referenced
    pub asset: AssetRef,
    /// Predicate expressions, in source order
    pub predicates: Vec<Expr>,
}

impl RefExpr {
    /// Reference without predicates.
    pub fn plain(asset: AssetRef) -> Self {
        Self {
            asset,
            predicates: Vec::new(),
        }
    }
}

/// Identifier of a referenced schema asset.
///
/// Node identifiers carry the `ND-` prefix by schema convention; the
/// parser classifies on that prefix and the translator validates against
/// the symbol repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    /// Field identifier, e.g. `BT-00-Code`
    Field(String),
    /// Node identifier, e.g. `ND-Root`
    Node(String),
}

impl AssetRef {
    /// The raw identifier.
    pub fn id(&self) -> &str {
        match self {
            AssetRef::Field(id) | AssetRef::Node(id) => id,
        }
    }
}

/// Literal constant kinds.
///
/// Numbers keep their source spelling; the target back-end decides how to
/// render them.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralKind {
    /// Numeric literal, source text preserved
    Number(String),
    /// Single-quoted string literal, quotes stripped
    String(String),
    /// `true` / `false`
    Boolean(bool),
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation
    Not,
    /// Arithmetic negation
    Minus,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `=`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `and`
    And,
    /// `or`
    Or,
}

impl BinaryOp {
    /// Whether this operator compares its operands.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
        )
    }

    /// Whether this operator is logical.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

/// Quantifier kinds; `any` and `every` lower to distinct back-end calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantifierKind {
    /// At least one element satisfies the predicate
    Any,
    /// All elements satisfy the predicate
    Every,
}
