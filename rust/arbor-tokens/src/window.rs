//! Inbound request-date validation.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::TimeWindowError;

/// Policy for how long a signed request date stays acceptable.
///
/// A request asserts its own timestamp; the verifier accepts it while
/// `now` lies within `[date - skew, date + expiry + skew]`, both bounds
/// inclusive. Validity is independent of signature correctness and is
/// checked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPolicy {
    /// Seconds after the asserted date during which the request is accepted.
    pub expiry_seconds: i64,
    /// Tolerated clock difference between signer and verifier, in seconds.
    pub allowed_skew_seconds: i64,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            expiry_seconds: 900,
            allowed_skew_seconds: 300,
        }
    }
}

/// Validate an inbound date header against `policy` at the current time.
///
/// See [`validate_date_at`] for the exact semantics.
pub fn validate_date(
    date_header: Option<&str>,
    policy: &TokenPolicy,
) -> Result<(), TimeWindowError> {
    validate_date_at(date_header, policy, Utc::now())
}

/// Validate an inbound date header against `policy` at an explicit instant.
///
/// The header must be an RFC 1123 timestamp (`Tue, 01 Jan 2019 00:00:00
/// GMT`), normalized to UTC before comparison. The three failure modes are
/// distinct: a missing header, an unparsable header, and a parsable date
/// outside the window. Window arithmetic is overflow-checked; a date so
/// late that adding the expiry would leave the representable range is out
/// of range by definition.
pub fn validate_date_at(
    date_header: Option<&str>,
    policy: &TokenPolicy,
    now: DateTime<Utc>,
) -> Result<(), TimeWindowError> {
    let header = match date_header {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(TimeWindowError::MissingDate),
    };

    let issued_at = DateTime::parse_from_rfc2822(header)
        .map_err(|_| TimeWindowError::InvalidFormat(header.to_string()))?
        .with_timezone(&Utc);

    let expiry =
        Duration::try_seconds(policy.expiry_seconds).ok_or(TimeWindowError::OutOfRange)?;
    let skew =
        Duration::try_seconds(policy.allowed_skew_seconds).ok_or(TimeWindowError::OutOfRange)?;

    let expires_at = issued_at
        .checked_add_signed(expiry)
        .ok_or(TimeWindowError::OutOfRange)?;
    let not_before = issued_at
        .checked_sub_signed(skew)
        .ok_or(TimeWindowError::OutOfRange)?;
    let not_after = expires_at
        .checked_add_signed(skew)
        .ok_or(TimeWindowError::OutOfRange)?;

    if now < not_before || now > not_after {
        tracing::debug!(%issued_at, %now, "request date outside the allowed window");
        return Err(TimeWindowError::OutOfRange);
    }

    Ok(())
}
