//! Data-type/shape lattice and the tagged typed-expression value.
//!
//! Every fragment of translated target-language text travels through the
//! engine as a [`TypedExpression`]: opaque script text tagged with the
//! [`Shape`] and [`DataType`] it denotes. The engine never inspects or
//! parses the script; composition is the target back-end's job.
//!
//! # Subtyping
//!
//! Two deliberate holes in the otherwise-exact lattice:
//!
//! - [`DataType::MultilingualString`] is accepted wherever
//!   [`DataType::String`] is expected.
//! - [`Shape::Path`] is accepted wherever [`Shape::Scalar`] or
//!   [`Shape::Sequence`] is expected — a location path denotes either one
//!   located value or the set of matching nodes, depending on use.
//!
//! "Conversion" re-tags the same script under a wider shape/type; it is a
//! declaration, never a runtime re-derivation of the text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data type of a translated expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// Boolean value
    Boolean,
    /// Plain text
    String,
    /// Language-qualified text; subtype of [`DataType::String`]
    MultilingualString,
    /// Numeric value
    Number,
    /// Calendar date
    Date,
    /// Time of day
    Time,
    /// Day/time duration
    Duration,
    /// A schema node (no value of its own)
    Node,
}

impl DataType {
    /// Whether a value of type `actual` is accepted where `self` is expected.
    ///
    /// Exact match, except `MultilingualString` narrows `String`.
    pub fn accepts(self, actual: DataType) -> bool {
        self == actual || (self == DataType::String && actual == DataType::MultilingualString)
    }

    /// Whether two operand types share a runtime class.
    ///
    /// Used for comparisons, where either side may be the wider one.
    pub fn comparable_with(self, other: DataType) -> bool {
        self.accepts(other) || other.accepts(self)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::String => "string",
            DataType::MultilingualString => "multilingual string",
            DataType::Number => "number",
            DataType::Date => "date",
            DataType::Time => "time",
            DataType::Duration => "duration",
            DataType::Node => "node",
        };
        write!(f, "{}", name)
    }
}

/// Expression shape: what kind of thing the script denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// One value
    Scalar,
    /// An ordered collection of values
    Sequence,
    /// A location path; subtype of both `Scalar` and `Sequence`
    Path,
}

impl Shape {
    /// Whether a value of shape `actual` is accepted where `self` is expected.
    pub fn accepts(self, actual: Shape) -> bool {
        self == actual || actual == Shape::Path
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shape::Scalar => "scalar",
            Shape::Sequence => "sequence",
            Shape::Path => "path",
        };
        write!(f, "{}", name)
    }
}

/// Requested conversion is not reachable under the subtyping rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot treat {from_shape} {from_type} expression as {to_shape} {to_type}")]
pub struct ConversionError {
    /// Source shape
    pub from_shape: Shape,
    /// Source data type
    pub from_type: DataType,
    /// Requested shape
    pub to_shape: Shape,
    /// Requested data type
    pub to_type: DataType,
}

/// Target-language source text tagged with shape and data type.
///
/// Immutable once constructed. The script is opaque target-language text
/// supplied by the code-emission back-end; no operation here inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedExpression {
    script: String,
    is_literal: bool,
    shape: Shape,
    data_type: DataType,
}

impl TypedExpression {
    /// Tag script text with a shape and data type.
    pub fn new(script: impl Into<String>, shape: Shape, data_type: DataType) -> Self {
        Self {
            script: script.into(),
            is_literal: false,
            shape,
            data_type,
        }
    }

    /// Tag literal script text (a constant written in the source).
    pub fn literal(script: impl Into<String>, shape: Shape, data_type: DataType) -> Self {
        Self {
            is_literal: true,
            ..Self::new(script, shape, data_type)
        }
    }

    /// The target-language text.
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Whether the script is a source-level constant.
    pub fn is_literal(&self) -> bool {
        self.is_literal
    }

    /// Declared shape.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Declared data type.
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Whether this expression is usable where `shape`/`data_type` is expected.
    pub fn satisfies(&self, shape: Shape, data_type: DataType) -> bool {
        shape.accepts(self.shape) && data_type.accepts(self.data_type)
    }

    /// Re-tag this expression under another shape/type.
    ///
    /// Succeeds only when the requested pair is reachable from the current
    /// one under the subtyping rules; `is_literal` and the script survive
    /// unchanged.
    pub fn convert(&self, shape: Shape, data_type: DataType) -> Result<Self, ConversionError> {
        if self.satisfies(shape, data_type) {
            Ok(Self {
                script: self.script.clone(),
                is_literal: self.is_literal,
                shape,
                data_type,
            })
        } else {
            Err(ConversionError {
                from_shape: self.shape,
                from_type: self.data_type,
                to_shape: shape,
                to_type: data_type,
            })
        }
    }
}

impl fmt::Display for TypedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multilingual_narrows_string() {
        let text = TypedExpression::new("x", Shape::Scalar, DataType::MultilingualString);
        assert!(text.satisfies(Shape::Scalar, DataType::String));
        let widened = text.convert(Shape::Scalar, DataType::String).unwrap();
        assert_eq!(widened.data_type(), DataType::String);
        assert_eq!(widened.script(), "x");
    }

    #[test]
    fn test_string_does_not_narrow_multilingual() {
        let text = TypedExpression::new("x", Shape::Scalar, DataType::String);
        assert!(text
            .convert(Shape::Scalar, DataType::MultilingualString)
            .is_err());
    }

    #[test]
    fn test_path_serves_both_shapes() {
        let path = TypedExpression::new("a/b", Shape::Path, DataType::Number);
        assert!(path.satisfies(Shape::Scalar, DataType::Number));
        assert!(path.satisfies(Shape::Sequence, DataType::Number));
    }

    #[test]
    fn test_scalar_is_not_a_path() {
        let scalar = TypedExpression::new("1", Shape::Scalar, DataType::Number);
        assert!(scalar.convert(Shape::Path, DataType::Number).is_err());
    }

    #[test]
    fn test_cross_type_conversion_fails() {
        let number = TypedExpression::new("1", Shape::Scalar, DataType::Number);
        let err = number.convert(Shape::Scalar, DataType::Boolean).unwrap_err();
        assert_eq!(err.from_type, DataType::Number);
        assert_eq!(err.to_type, DataType::Boolean);
    }

    #[test]
    fn test_literal_flag_preserved() {
        let lit = TypedExpression::literal("'x'", Shape::Scalar, DataType::MultilingualString);
        assert!(lit.is_literal());
        let widened = lit.convert(Shape::Scalar, DataType::String).unwrap();
        assert!(widened.is_literal());
    }

    #[test]
    fn test_comparable_with_is_symmetric() {
        assert!(DataType::String.comparable_with(DataType::MultilingualString));
        assert!(DataType::MultilingualString.comparable_with(DataType::String));
        assert!(!DataType::Number.comparable_with(DataType::String));
    }
}
