use thiserror::Error;

/// Errors raised while producing or checking authorization tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// A required input was missing or malformed
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every canonicalization buffer is rented out; a sign of resource
    /// pressure that retrying would worsen
    #[error("Canonicalization buffer pool exhausted")]
    PoolExhausted,

    /// The keyed-hash implementation could not produce a digest; a
    /// configuration error, and signing fails closed
    #[error("Digest computation failed: {0}")]
    Digest(String),
}

/// Outcomes of inbound request-date validation.
///
/// The three failures are deliberately distinct so callers can log and
/// alert on them separately; none resolves on retry, since the same clock
/// skew reproduces the same outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeWindowError {
    /// No date header was present on the request
    #[error("Request date header is missing")]
    MissingDate,

    /// The date header is not an RFC 1123 timestamp
    #[error("Request date is not a valid RFC 1123 timestamp: {0}")]
    InvalidFormat(String),

    /// The date parsed but falls outside the allowed validity window
    #[error("Request date is outside the allowed time window")]
    OutOfRange,
}
