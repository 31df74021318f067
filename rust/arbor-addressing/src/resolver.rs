//! Wire path parsing and generation.
//!
//! Paths follow the `/kind/id/kind/id…` convention: alternating catalog
//! segments and identifiers, with a trailing kind segment denoting a feed.
//! Parsing and generation share the catalog and the identifier seam so the
//! two directions cannot drift apart.

use serde::{Deserialize, Serialize};

use crate::{AddressingError, Catalog, IdentifierScheme, ResourceAddress, ResourceKind};

/// Reserved control segment: `operations/<name>` paths address account-level
/// operations, not resources.
const OPERATIONS_SEGMENT: &str = "operations";

/// Reserved top-level singleton segments. A bare `/media` or `/addresses`
/// is an account-level operation; the reserved check runs before kind
/// parsing, so these shadow the identically-named kind segments on purpose.
const RESERVED_SINGLETONS: [&str; 3] = ["media", "addresses", "replicaaddresses"];

/// Kinds whose top-level paths are ambiguous between opaque ids and names:
/// `/dbs/X/…` may scope `X` as an opaque database id or a database name.
const ID_AMBIGUOUS_KINDS: [ResourceKind; 4] = [
    ResourceKind::Database,
    ResourceKind::Snapshot,
    ResourceKind::RoleDefinition,
    ResourceKind::RoleAssignment,
];

/// Resolver configuration.
///
/// Threaded in at construction; the resolver holds no process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Structural validation of full names during path generation.
    ///
    /// Test harnesses disable this to generate deliberately malformed
    /// names. Parsing is never affected either way.
    pub structural_validation: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            structural_validation: true,
        }
    }
}

/// Parses wire paths into [`ResourceAddress`]es and generates wire paths
/// from identifiers.
///
/// # Examples
///
/// ```
/// use arbor_addressing::{
///     Catalog, IdentifierError, IdentifierScheme, PathAddressResolver, ResourceKind,
/// };
///
/// struct NeverOpaque;
///
/// impl IdentifierScheme for NeverOpaque {
///     fn parse_scoped(&self, _: ResourceKind, raw: &str) -> Result<(), IdentifierError> {
///         Err(IdentifierError::Unparsable(raw.into()))
///     }
///
///     fn ancestor_id(&self, raw: &str, _: ResourceKind) -> Result<String, IdentifierError> {
///         Err(IdentifierError::Unparsable(raw.into()))
///     }
/// }
///
/// let resolver = PathAddressResolver::new(Catalog::default(), NeverOpaque);
/// let address = resolver.parse_path("/dbs/MyDb/colls/MyColl").unwrap();
///
/// assert_eq!(address.kind(), ResourceKind::Collection);
/// assert_eq!(address.identifier(), "dbs/MyDb/colls/MyColl");
/// assert!(address.is_name_based());
/// ```
#[derive(Debug, Clone)]
pub struct PathAddressResolver<S> {
    catalog: Catalog,
    scheme: S,
    options: ResolverOptions,
}

impl<S> PathAddressResolver<S>
where
    S: IdentifierScheme,
{
    /// Create a resolver with default options.
    pub fn new(catalog: Catalog, scheme: S) -> Self {
        Self::with_options(catalog, scheme, ResolverOptions::default())
    }

    /// Create a resolver with explicit options.
    pub fn with_options(catalog: Catalog, scheme: S, options: ResolverOptions) -> Self {
        Self {
            catalog,
            scheme,
            options,
        }
    }

    /// The catalog this resolver parses against.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Parse a wire path into a typed address.
    ///
    /// Pure over its input: configuration never changes what a path parses
    /// to. Unrecognized shapes are errors, never guesses.
    pub fn parse_path(&self, raw_path: &str) -> Result<ResourceAddress, AddressingError> {
        let segments: Vec<&str> = raw_path.split('/').filter(|s| !s.is_empty()).collect();

        if segments.is_empty() {
            return Err(AddressingError::UnrecognizedPath(raw_path.to_string()));
        }

        let last = segments[segments.len() - 1];
        let second_last = if segments.len() >= 2 {
            segments[segments.len() - 2]
        } else {
            ""
        };

        // Reserved non-resource literals take priority over kind parsing.
        if second_last.eq_ignore_ascii_case(OPERATIONS_SEGMENT) {
            return Ok(ResourceAddress::root());
        }
        if segments.len() == 1
            && RESERVED_SINGLETONS
                .iter()
                .any(|reserved| last.eq_ignore_ascii_case(reserved))
        {
            return Ok(ResourceAddress::root());
        }

        if self.forces_name_based(&segments) {
            self.parse_name_based(&segments)
        } else {
            self.parse_id_based(&segments)
        }
    }

    /// A path starting with an identifier-ambiguous kind is id-based only
    /// when its second segment actually decodes as an opaque id scoped to
    /// that kind; otherwise the whole path is a hierarchical name.
    fn forces_name_based(&self, segments: &[&str]) -> bool {
        if segments.len() < 2 {
            return false;
        }

        match self.catalog.kind_of(segments[0]) {
            Some(kind) if ID_AMBIGUOUS_KINDS.contains(&kind) => {
                self.scheme.parse_scoped(kind, segments[1]).is_err()
            }
            _ => false,
        }
    }

    fn parse_name_based(&self, segments: &[&str]) -> Result<ResourceAddress, AddressingError> {
        let count = segments.len();

        if count % 2 == 0 {
            // Instance: the identifier is the full hierarchical name, case
            // preserved.
            let kind = self.kind_segment(segments[count - 2])?;
            let full_name = percent_decode(&segments.join("/"));
            Ok(ResourceAddress::new(kind, full_name, false, true))
        } else {
            // Feed: the trailing segment is the kind, preceded by the
            // owner's name segment.
            let kind = self.kind_segment(segments[count - 1])?;
            let identifier = if count >= 2 {
                percent_decode(segments[count - 2])
            } else {
                String::new()
            };
            Ok(ResourceAddress::new(kind, identifier, true, true))
        }
    }

    fn parse_id_based(&self, segments: &[&str]) -> Result<ResourceAddress, AddressingError> {
        let count = segments.len();

        if count % 2 == 1 {
            let kind = self.kind_segment(segments[count - 1])?;
            // Database feeds sit at the top level and have no owner id.
            let identifier = if kind == ResourceKind::Database || count < 2 {
                String::new()
            } else {
                segments[count - 2].to_string()
            };
            Ok(ResourceAddress::new(kind, identifier, true, false))
        } else {
            let kind = self.kind_segment(segments[count - 2])?;
            Ok(ResourceAddress::new(
                kind,
                segments[count - 1].to_string(),
                false,
                false,
            ))
        }
    }

    fn kind_segment(&self, segment: &str) -> Result<ResourceKind, AddressingError> {
        self.catalog
            .kind_of(segment)
            .ok_or_else(|| AddressingError::UnknownKindSegment(segment.to_string()))
    }

    /// Generate the wire path addressing `kind`.
    ///
    /// For a feed, `owner_or_resource_id` identifies the owner one level up
    /// the chain; for an instance it identifies the resource itself. Opaque
    /// identifiers are decomposed through the identifier seam at every
    /// ancestor level; full names pass through with optional structural
    /// validation.
    pub fn generate_path(
        &self,
        kind: ResourceKind,
        owner_or_resource_id: &str,
        is_feed: bool,
    ) -> Result<String, AddressingError> {
        // Feeds of root kinds live directly under the account.
        if is_feed && kind.ownership_chain().is_empty() {
            return Ok(kind.path_segment().to_string());
        }

        if is_name_based_identifier(owner_or_resource_id) {
            self.generate_name_based(kind, owner_or_resource_id, is_feed)
        } else {
            self.generate_id_based(kind, owner_or_resource_id, is_feed)
        }
    }

    fn generate_id_based(
        &self,
        kind: ResourceKind,
        owner_or_resource_id: &str,
        is_feed: bool,
    ) -> Result<String, AddressingError> {
        let chain = kind.ownership_chain();
        let mut parts: Vec<String> = Vec::with_capacity(chain.len() * 2 + 2);

        for ancestor in chain {
            let ancestor_id = self.scheme.ancestor_id(owner_or_resource_id, *ancestor)?;
            parts.push(ancestor.path_segment().to_string());
            parts.push(ancestor_id);
        }

        parts.push(kind.path_segment().to_string());
        if !is_feed {
            parts.push(owner_or_resource_id.to_string());
        }

        Ok(parts.join("/"))
    }

    fn generate_name_based(
        &self,
        kind: ResourceKind,
        full_name: &str,
        is_feed: bool,
    ) -> Result<String, AddressingError> {
        let trimmed = full_name.trim_matches('/');

        if is_feed {
            // The supplied name belongs to the owner, one level up.
            if let Some(owner) = kind.ownership_chain().last() {
                if !self.validate_full_name_shape(*owner, trimmed) {
                    return Err(AddressingError::InvalidFullName(trimmed.to_string()));
                }
            }
            Ok(format!("{}/{}", trimmed, kind.path_segment()))
        } else {
            if !self.validate_full_name_shape(kind, trimmed) {
                return Err(AddressingError::InvalidFullName(trimmed.to_string()));
            }
            Ok(trimmed.to_string())
        }
    }

    /// Check a full name against the literal segment pattern its kind
    /// requires: even-indexed segments must equal the catalog segments of
    /// the ownership chain, in order, ending with the kind's own segment.
    ///
    /// Returns `true` unconditionally when structural validation is
    /// disabled; parsing never consults this.
    pub fn validate_full_name_shape(&self, kind: ResourceKind, full_name: &str) -> bool {
        if !self.options.structural_validation {
            return true;
        }

        let segments: Vec<&str> = full_name.split('/').filter(|s| !s.is_empty()).collect();
        let chain = kind.ownership_chain();

        if segments.len() != (chain.len() + 1) * 2 {
            return false;
        }

        chain
            .iter()
            .chain(std::iter::once(&kind))
            .enumerate()
            .all(|(level, expected)| segments[level * 2].eq_ignore_ascii_case(expected.path_segment()))
    }
}

/// Hierarchical names generated by this system always start with a
/// three-letter root kind segment, so the fourth byte of a name-based
/// identifier is the separator.
fn is_name_based_identifier(identifier: &str) -> bool {
    identifier.len() > 4 && identifier.as_bytes()[3] == b'/'
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Decode percent-escaped bytes, leaving malformed escapes untouched. A
/// decode that breaks UTF-8 falls back to the escaped original rather than
/// failing the parse.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'%' && index + 2 < bytes.len() {
            if let (Some(high), Some(low)) = (hex_value(bytes[index + 1]), hex_value(bytes[index + 2])) {
                decoded.push((high << 4) | low);
                index += 3;
                continue;
            }
        }
        decoded.push(bytes[index]);
        index += 1;
    }

    String::from_utf8(decoded).unwrap_or_else(|_| input.to_string())
}
