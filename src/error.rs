//! Error taxonomy for registration, parsing and result access.

use thiserror::Error;

/// Errors raised by the engine.
///
/// Registration-time errors (`DuplicateIdentifier`, `InvalidConfiguration`,
/// and `InvalidType` for unknown named types) leave the parser untouched.
/// Parse-time errors abort the parse on the first failing element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgError {
    /// An element with this identifier is already registered.
    #[error("Element '{id}' is already registered")]
    DuplicateIdentifier { id: String },

    /// The element definition is inconsistent.
    #[error("Invalid configuration for '{id}': {reason}")]
    InvalidConfiguration { id: String, reason: String },

    /// Not enough tokens for a required element and no default applies.
    #[error("Missing argument for '{id}': expected {expected}, found {found}")]
    MissingArgument {
        id: String,
        expected: String,
        found: usize,
    },

    /// The validator rejected a value.
    #[error("Invalid value for '{id}': {value}")]
    InvalidArgument { id: String, value: String },

    /// A raw token could not be converted to the element's target type.
    #[error("Invalid type for '{id}': cannot convert '{raw}' to {target}")]
    InvalidType {
        id: String,
        raw: String,
        target: String,
    },

    /// Lookup of an identifier that was never registered.
    #[error("Element '{id}' not found")]
    NotFound { id: String },

    /// Strict mode only: an option-like token nobody claimed.
    #[error("Unrecognized option '{token}'")]
    UnrecognizedOption { token: String },
}

impl ArgError {
    pub(crate) fn config(id: &str, reason: impl Into<String>) -> Self {
        ArgError::InvalidConfiguration {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(id: &str, expected: impl ToString, found: usize) -> Self {
        ArgError::MissingArgument {
            id: id.to_string(),
            expected: expected.to_string(),
            found,
        }
    }

    /// Identifier of the element the error refers to, if any.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            ArgError::DuplicateIdentifier { id }
            | ArgError::InvalidConfiguration { id, .. }
            | ArgError::MissingArgument { id, .. }
            | ArgError::InvalidArgument { id, .. }
            | ArgError::InvalidType { id, .. }
            | ArgError::NotFound { id } => Some(id),
            ArgError::UnrecognizedOption { .. } => None,
        }
    }
}
