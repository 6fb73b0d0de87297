//! Symbol resolution errors.

use thiserror::Error;

/// Failure while loading schema metadata or resolving a symbol.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// Unknown field identifier
    #[error("unknown field '{0}'")]
    FieldNotFound(String),

    /// Unknown node identifier
    #[error("unknown node '{0}'")]
    NodeNotFound(String),

    /// Unknown codelist identifier, or a field referencing one
    #[error("no codelist registered under '{0}'")]
    CodelistMissing(String),

    /// Field carries no codelist at all
    #[error("field '{0}' does not reference a codelist")]
    FieldWithoutCodelist(String),

    /// No field is located at the given absolute path
    #[error("no field is located at '{0}'")]
    PathNotFound(String),

    /// Two symbols declared under the same identifier
    #[error("duplicate {kind} '{id}' in schema metadata")]
    Duplicate {
        /// `field`, `node` or `codelist`
        kind: &'static str,
        /// The colliding identifier
        id: String,
    },

    /// Metadata file could not be read
    #[error("cannot read schema metadata: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata file is not valid JSON for the expected shape
    #[error("malformed schema metadata: {0}")]
    Json(#[from] serde_json::Error),
}
