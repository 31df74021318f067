//! Typed resource addresses.

use serde::{Deserialize, Serialize};

use crate::ResourceKind;

/// A parsed wire-path address.
///
/// Addresses are immutable: one is created per request and discarded with
/// it. The identifier is either an opaque resource id (compared
/// case-insensitively by the identifier component) or a case-sensitive
/// hierarchical name; `is_name_based` records which, and name-based
/// identifiers must never be case-folded downstream.
///
/// # Examples
///
/// ```
/// use arbor_addressing::{ResourceAddress, ResourceKind};
///
/// let address = ResourceAddress::new(
///     ResourceKind::Collection,
///     "dbs/MyDb/colls/MyColl",
///     false,
///     true,
/// );
///
/// assert_eq!(address.kind(), ResourceKind::Collection);
/// assert!(!address.is_feed());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceAddress {
    /// The kind of the addressed entity
    kind: ResourceKind,
    /// Opaque id or hierarchical full name
    identifier: String,
    /// Whether the address denotes a collection of `kind` rather than one instance
    is_feed: bool,
    /// Whether the identifier is a case-sensitive hierarchical name
    is_name_based: bool,
}

impl ResourceAddress {
    /// Create an address from its parts.
    pub fn new(
        kind: ResourceKind,
        identifier: impl Into<String>,
        is_feed: bool,
        is_name_based: bool,
    ) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            is_feed,
            is_name_based,
        }
    }

    /// The address of the account root, used for non-resource control paths.
    pub fn root() -> Self {
        Self::new(ResourceKind::DatabaseAccount, "", false, false)
    }

    /// The kind of the addressed entity.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// The opaque id or hierarchical full name.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Whether the address denotes a feed (a collection of `kind`) rather
    /// than a single instance.
    pub fn is_feed(&self) -> bool {
        self.is_feed
    }

    /// Whether the identifier is a case-sensitive hierarchical name.
    pub fn is_name_based(&self) -> bool {
        self.is_name_based
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_creates_a_name_based_address() {
        let address =
            ResourceAddress::new(ResourceKind::Document, "dbs/Db/colls/Coll/docs/Doc", false, true);

        assert_eq!(address.kind(), ResourceKind::Document);
        assert_eq!(address.identifier(), "dbs/Db/colls/Coll/docs/Doc");
        assert!(!address.is_feed());
        assert!(address.is_name_based());
    }

    #[test]
    fn it_creates_the_root_address() {
        let root = ResourceAddress::root();

        assert_eq!(root.kind(), ResourceKind::DatabaseAccount);
        assert_eq!(root.identifier(), "");
        assert!(!root.is_feed());
        assert!(!root.is_name_based());
    }

    #[test]
    fn it_roundtrips_through_serde() {
        let address = ResourceAddress::new(ResourceKind::Collection, "deadbeef01020304", true, false);

        let json = serde_json::to_string(&address).unwrap();
        let parsed: ResourceAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(address, parsed);
    }
}
