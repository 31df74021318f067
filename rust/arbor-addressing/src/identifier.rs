//! Seam to the external opaque-identifier component.
//!
//! Opaque resource identifiers carry their own hierarchical structure: a
//! document id embeds the ids of its collection and database. The encoding
//! lives outside this crate; the resolver only needs the two operations
//! below, so different identifier implementations plug in through the
//! [`IdentifierScheme`] trait.

use thiserror::Error;

use crate::ResourceKind;

/// Errors surfaced by an [`IdentifierScheme`] implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// The string does not decode as an opaque identifier at all
    #[error("Not an opaque identifier: {0}")]
    Unparsable(String),

    /// The identifier decodes, but its embedded kind tag names another kind
    #[error("Identifier is tagged {actual:?}, expected {expected:?}")]
    KindMismatch {
        /// The kind the caller asked the identifier to be scoped to
        expected: ResourceKind,
        /// The kind the identifier is actually tagged with
        actual: ResourceKind,
    },

    /// The identifier carries no component at the requested ancestor level
    #[error("Identifier has no {0:?} component")]
    MissingAncestor(ResourceKind),
}

/// Operations the resolver needs from the opaque-identifier component.
///
/// Implementations must be deterministic: the resolver calls these from
/// concurrent request paths and assumes identical inputs give identical
/// answers.
pub trait IdentifierScheme {
    /// Check that `raw` decodes as an opaque identifier whose embedded kind
    /// tag matches `kind`.
    ///
    /// A failure here is not fatal to parsing; it demotes the surrounding
    /// path to name-based interpretation.
    fn parse_scoped(&self, kind: ResourceKind, raw: &str) -> Result<(), IdentifierError>;

    /// Project `raw` onto the `ancestor` level of its ownership chain,
    /// returning the ancestor's own identifier string.
    ///
    /// Errs when `raw` carries no component at that level, which means the
    /// identifier does not belong to the chain being walked.
    fn ancestor_id(&self, raw: &str, ancestor: ResourceKind) -> Result<String, IdentifierError>;
}
