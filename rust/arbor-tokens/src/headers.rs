//! Wire-header names and caller-enforced size budgets.

/// Primary request-date header.
pub const DATE_HEADER: &str = "x-arbor-date";

/// Fallback request-date header, consulted only when the primary is absent.
pub const FALLBACK_DATE_HEADER: &str = "date";

/// Default ceiling for an authorization header, in bytes. Enforced by the
/// transport layer before a token is parsed.
pub const AUTHORIZATION_HEADER_MAX_BYTES: usize = 8 * 1024;

/// Ceiling for the elevated token class, in bytes.
pub const ELEVATED_TOKEN_MAX_BYTES: usize = 16 * 1024;

/// Ceiling for resource-scoped tokens, in bytes.
pub const RESOURCE_TOKEN_MAX_BYTES: usize = 24 * 1024;

/// Pick the request date out of the two date headers, preferring the
/// primary. Empty values count as absent.
pub fn date_header_value<'a>(
    primary: Option<&'a str>,
    fallback: Option<&'a str>,
) -> Option<&'a str> {
    primary
        .filter(|value| !value.is_empty())
        .or_else(|| fallback.filter(|value| !value.is_empty()))
}
