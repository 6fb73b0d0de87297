//! Translation error taxonomy.
//!
//! Every kind aborts the current translation; nothing is retried and no
//! partial output is produced. Messages carry the offending identifier or
//! token so callers can report them directly.

use thiserror::Error;

use efx_ast::foundation::ConversionError;
use efx_parser::ParseError;
use efx_symbols::SymbolError;

/// Terminating translation failure.
#[derive(Debug, Error)]
pub enum TranslateError {
    /// Unknown field, node or codelist identifier
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Operands of an operation do not share the required runtime type
    #[error("type mismatch in {operation}: {left} vs {right}")]
    TypeMismatch {
        /// The operation being composed
        operation: String,
        /// Left (or only) operand description
        left: String,
        /// Right operand description
        right: String,
    },

    /// A shape/type conversion outside the subtyping lattice
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Indirect label shorthand on a field that cannot carry one
    #[error("field '{field_id}' has type '{field_type}'; value labels need an indicator, code or internal-code field")]
    UnsupportedLabelFieldType {
        /// The field the label points at
        field_id: String,
        /// Its declared type
        field_type: String,
    },

    /// Template mixes tab and space indentation
    #[error("template mixes tab and space indentation")]
    MixedIndentation,

    /// Space-indented template changes its unit width
    #[error("indentation of {found} spaces is not a multiple of the template's unit of {unit}")]
    InconsistentIndentationSpacing {
        /// First observed unit width
        unit: usize,
        /// Offending width
        found: usize,
    },

    /// A template line is indented more than one level past its parent
    #[error("indentation skips from level {from} to level {to}")]
    SkippedIndentationLevel {
        /// Enclosing level
        from: usize,
        /// Offending level
        to: usize,
    },

    /// The very first template line is indented
    #[error("the first template line must not be indented")]
    StartIndentNonzero,

    /// A value or label reference with no context in scope
    #[error("no context declared for this template line or any of its ancestors")]
    MissingContext,

    /// Reference to a variable that is not bound in scope
    #[error("unknown variable '${0}'")]
    UnknownVariable(String),

    /// Call to a function the language does not define
    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Call with the wrong number of arguments
    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    WrongArgumentCount {
        /// Function name
        function: String,
        /// Expected arity description
        expected: String,
        /// Supplied argument count
        found: usize,
    },

    /// No back-end registered for a requested (version, capability) pair
    #[error("no {capability} back-end registered for version '{version}'")]
    ComponentResolution {
        /// `script` or `markup`
        capability: &'static str,
        /// Requested schema version
        version: String,
    },

    /// Two back-ends registered for the same (version, capability) pair
    #[error("a {capability} back-end is already registered for version '{version}'")]
    AmbiguousComponent {
        /// `script` or `markup`
        capability: &'static str,
        /// Colliding schema version
        version: String,
    },

    /// Lexical or syntactic error reported by the parser (forwarded)
    #[error(transparent)]
    Grammar(#[from] ParseError),
}

/// Result type for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;
