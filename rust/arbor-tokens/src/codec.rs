//! Canonical signing payload and the authorization token codec.
//!
//! The payload layout is a fixed wire contract shared by signer and
//! verifier:
//!
//! ```text
//! lower(verb)     \n
//! lower(kind)     \n
//! identifier      \n   (lower-cased only when the identifier is opaque)
//! lower(date)     \n
//!                 \n   (empty line)
//! ```
//!
//! The token is the STANDARD base64 encoding of a keyed digest over those
//! UTF-8 bytes. Reordering, re-casing, or dropping the trailing empty line
//! changes the signature.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::{BufferPool, TokenError};

/// Capability to compute a keyed digest over a message.
///
/// The codec is polymorphic over this single operation: production wiring
/// injects [`HmacSha256`], tests may inject a deterministic stub. A failure
/// is a configuration problem (bad key material, algorithm mismatch) and
/// the caller fails closed; there is no unsigned fallback.
pub trait KeyedHasher {
    /// Compute the keyed digest of `message`.
    fn keyed_digest(&self, message: &[u8]) -> Result<Vec<u8>, TokenError>;
}

/// The production keyed hash: HMAC-SHA256 over a shared secret.
///
/// The secret is an opaque external input; rotation and storage belong to
/// the caller.
#[derive(Clone)]
pub struct HmacSha256(Hmac<Sha256>);

impl HmacSha256 {
    /// Build the hasher from the shared secret bytes.
    pub fn new(secret: &[u8]) -> Result<Self, TokenError> {
        let mac = Hmac::<Sha256>::new_from_slice(secret)
            .map_err(|error| TokenError::Digest(error.to_string()))?;
        Ok(Self(mac))
    }
}

impl KeyedHasher for HmacSha256 {
    fn keyed_digest(&self, message: &[u8]) -> Result<Vec<u8>, TokenError> {
        let mut mac = self.0.clone();
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Produces and checks request signature tokens.
///
/// Canonicalization buffers come from a shared [`BufferPool`]; each call
/// owns its rental exclusively and returns it on every exit path.
///
/// # Examples
///
/// ```
/// use arbor_tokens::{AuthorizationCodec, HmacSha256};
///
/// let codec = AuthorizationCodec::new();
/// let hasher = HmacSha256::new(b"shared-secret").unwrap();
///
/// let token = codec
///     .sign("GET", "deadbeef", "dbs", "Tue, 01 Jan 2019 00:00:00 GMT", &hasher)
///     .unwrap();
///
/// assert!(codec
///     .verify(&token, "GET", "deadbeef", "dbs", "Tue, 01 Jan 2019 00:00:00 GMT", &hasher)
///     .unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthorizationCodec {
    pool: BufferPool,
}

impl AuthorizationCodec {
    /// Create a codec with a default buffer pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec drawing canonicalization buffers from `pool`.
    pub fn with_pool(pool: BufferPool) -> Self {
        Self { pool }
    }

    /// Sign a request, returning the unescaped base64 token.
    ///
    /// `resource_segment` may be empty (account-level operations);
    /// `resource_id` may be empty (root feed reads). The verb must be
    /// present. Name-based identifiers keep their casing; everything else
    /// in the payload is lower-cased.
    ///
    /// # Errors
    ///
    /// [`TokenError::InvalidArgument`] for an empty verb,
    /// [`TokenError::PoolExhausted`] under buffer-pool pressure, and
    /// [`TokenError::Digest`] when the keyed hash fails.
    pub fn sign<H>(
        &self,
        verb: &str,
        resource_id: &str,
        resource_segment: &str,
        date: &str,
        hasher: &H,
    ) -> Result<String, TokenError>
    where
        H: KeyedHasher,
    {
        if verb.is_empty() {
            return Err(TokenError::InvalidArgument("verb must not be empty".to_string()));
        }

        // Worst-case lower-cased UTF-8 expansion of the four inputs, plus
        // the four separators and the trailing empty line.
        let capacity =
            (verb.len() + resource_segment.len() + resource_id.len() + date.len()) * 3 + 5;
        let mut payload = self.pool.rent(capacity)?;

        push_lowercase(&mut payload, verb);
        payload.push(b'\n');
        push_lowercase(&mut payload, resource_segment);
        payload.push(b'\n');
        if is_name_based_identifier(resource_id) {
            payload.extend_from_slice(resource_id.as_bytes());
        } else {
            push_lowercase(&mut payload, resource_id);
        }
        payload.push(b'\n');
        push_lowercase(&mut payload, date);
        payload.push(b'\n');
        payload.push(b'\n');

        let digest = hasher.keyed_digest(&payload)?;
        Ok(STANDARD.encode(digest))
    }

    /// Check a claimed signature against the token recomputed from the
    /// receiver's view of the request.
    ///
    /// `claimed_signature` must be unescaped base64 (see
    /// [`crate::url_unescape_base64`] for tokens that traveled escaped).
    /// The comparison is constant-time so that mismatch position never
    /// leaks through response timing.
    pub fn verify<H>(
        &self,
        claimed_signature: &str,
        verb: &str,
        resource_id: &str,
        resource_segment: &str,
        date: &str,
        hasher: &H,
    ) -> Result<bool, TokenError>
    where
        H: KeyedHasher,
    {
        let expected = self.sign(verb, resource_id, resource_segment, date, hasher)?;
        let matches = bool::from(expected.as_bytes().ct_eq(claimed_signature.as_bytes()));

        if !matches {
            tracing::debug!(verb, resource_segment, "rejected request signature");
        }

        Ok(matches)
    }
}

/// Name-based identifiers generated by this system always start with a
/// three-letter root kind segment, so the fourth byte is the separator.
/// Opaque ids are base64-like and can contain `/` elsewhere, which is why
/// the position matters and not mere presence.
fn is_name_based_identifier(identifier: &str) -> bool {
    identifier.len() > 4 && identifier.as_bytes()[3] == b'/'
}

/// Append the Unicode lower-casing of `text` to `buffer` without
/// intermediate allocation.
fn push_lowercase(buffer: &mut Vec<u8>, text: &str) {
    for ch in text.chars() {
        for lower in ch.to_lowercase() {
            let mut utf8 = [0u8; 4];
            buffer.extend_from_slice(lower.encode_utf8(&mut utf8).as_bytes());
        }
    }
}
