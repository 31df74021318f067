use thiserror::Error;

use crate::IdentifierError;

/// The common error type used by this crate.
///
/// Parse errors are non-retryable client errors: the resolver surfaces them
/// unchanged and never guesses a fallback interpretation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressingError {
    /// The wire path does not follow the resource addressing convention
    #[error("Unrecognized resource path: {0}")]
    UnrecognizedPath(String),

    /// A path segment in kind position does not name a registered kind
    #[error("Unknown resource kind segment: {0}")]
    UnknownKindSegment(String),

    /// An identifier does not belong to the requested kind's ownership
    /// chain; a caller contract violation, never coerced
    #[error("Could not decompose identifier: {0}")]
    Decomposition(String),

    /// A full name does not match the literal segment pattern of its kind
    #[error("Malformed resource full name: {0}")]
    InvalidFullName(String),
}

impl From<IdentifierError> for AddressingError {
    fn from(value: IdentifierError) -> Self {
        AddressingError::Decomposition(format!("{value}"))
    }
}
