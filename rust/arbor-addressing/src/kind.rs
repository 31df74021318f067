//! Resource kinds and the segment catalog.

use serde::{Deserialize, Serialize};

/// The type tag of an addressed entity.
///
/// Every kind owns exactly one canonical lowercase path segment, and the
/// mapping in both directions is an exhaustive `match` so that adding a kind
/// without registering its segment is a compile error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A database, the top of the user-visible hierarchy.
    Database,
    /// A collection within a database.
    Collection,
    /// A document within a collection.
    Document,
    /// A stored procedure within a collection.
    StoredProcedure,
    /// A trigger within a collection.
    Trigger,
    /// A user-defined function within a collection.
    UserDefinedFunction,
    /// A replication conflict record within a collection.
    Conflict,
    /// An attachment hanging off a document.
    Attachment,
    /// A user principal within a database.
    User,
    /// A permission granted to a user.
    Permission,
    /// A throughput offer.
    Offer,
    /// A partition key range of a collection.
    PartitionKeyRange,
    /// A client encryption key within a database.
    ClientEncryptionKey,
    /// A user-defined type within a database.
    UserDefinedType,
    /// A schema within a collection.
    Schema,
    /// A snapshot of account state.
    Snapshot,
    /// A role definition for role-based access control.
    RoleDefinition,
    /// A role assignment for role-based access control.
    RoleAssignment,
    /// Stored media content.
    Media,
    /// A replica address record.
    Address,
    /// A partitioned system document within a collection.
    PartitionedSystemDocument,
    /// The account itself, the root of every ownership chain.
    DatabaseAccount,
    /// Server deployments only: a master partition.
    MasterPartition,
    /// Server deployments only: a server partition.
    ServerPartition,
    /// Server deployments only: the cluster topology.
    Topology,
    /// Server deployments only: an identifier range allocation.
    RidRange,
    /// Server deployments only: a vector clock.
    VectorClock,
}

impl ResourceKind {
    /// Every kind, in declaration order.
    pub const ALL: &'static [ResourceKind] = &[
        ResourceKind::Database,
        ResourceKind::Collection,
        ResourceKind::Document,
        ResourceKind::StoredProcedure,
        ResourceKind::Trigger,
        ResourceKind::UserDefinedFunction,
        ResourceKind::Conflict,
        ResourceKind::Attachment,
        ResourceKind::User,
        ResourceKind::Permission,
        ResourceKind::Offer,
        ResourceKind::PartitionKeyRange,
        ResourceKind::ClientEncryptionKey,
        ResourceKind::UserDefinedType,
        ResourceKind::Schema,
        ResourceKind::Snapshot,
        ResourceKind::RoleDefinition,
        ResourceKind::RoleAssignment,
        ResourceKind::Media,
        ResourceKind::Address,
        ResourceKind::PartitionedSystemDocument,
        ResourceKind::DatabaseAccount,
        ResourceKind::MasterPartition,
        ResourceKind::ServerPartition,
        ResourceKind::Topology,
        ResourceKind::RidRange,
        ResourceKind::VectorClock,
    ];

    /// The canonical lowercase path segment for this kind.
    pub const fn path_segment(&self) -> &'static str {
        match self {
            ResourceKind::Database => "dbs",
            ResourceKind::Collection => "colls",
            ResourceKind::Document => "docs",
            ResourceKind::StoredProcedure => "sprocs",
            ResourceKind::Trigger => "triggers",
            ResourceKind::UserDefinedFunction => "udfs",
            ResourceKind::Conflict => "conflicts",
            ResourceKind::Attachment => "attachments",
            ResourceKind::User => "users",
            ResourceKind::Permission => "permissions",
            ResourceKind::Offer => "offers",
            ResourceKind::PartitionKeyRange => "pkranges",
            ResourceKind::ClientEncryptionKey => "clientencryptionkeys",
            ResourceKind::UserDefinedType => "udts",
            ResourceKind::Schema => "schemas",
            ResourceKind::Snapshot => "snapshots",
            ResourceKind::RoleDefinition => "roledefinitions",
            ResourceKind::RoleAssignment => "roleassignments",
            ResourceKind::Media => "media",
            ResourceKind::Address => "addresses",
            ResourceKind::PartitionedSystemDocument => "partitionedsystemdocuments",
            ResourceKind::DatabaseAccount => "databaseaccount",
            ResourceKind::MasterPartition => "masterpartitions",
            ResourceKind::ServerPartition => "serverpartitions",
            ResourceKind::Topology => "topology",
            ResourceKind::RidRange => "ridranges",
            ResourceKind::VectorClock => "vectorclock",
        }
    }

    /// The ordered ancestor kinds needed to fully qualify this kind's wire
    /// path. Root kinds have an empty chain.
    pub const fn ownership_chain(&self) -> &'static [ResourceKind] {
        match self {
            ResourceKind::Database
            | ResourceKind::DatabaseAccount
            | ResourceKind::Offer
            | ResourceKind::Snapshot
            | ResourceKind::RoleDefinition
            | ResourceKind::RoleAssignment
            | ResourceKind::Media
            | ResourceKind::Address
            | ResourceKind::MasterPartition
            | ResourceKind::ServerPartition
            | ResourceKind::Topology
            | ResourceKind::RidRange
            | ResourceKind::VectorClock => &[],
            ResourceKind::Collection
            | ResourceKind::User
            | ResourceKind::UserDefinedType
            | ResourceKind::ClientEncryptionKey => &[ResourceKind::Database],
            ResourceKind::Document
            | ResourceKind::StoredProcedure
            | ResourceKind::Trigger
            | ResourceKind::UserDefinedFunction
            | ResourceKind::Conflict
            | ResourceKind::PartitionKeyRange
            | ResourceKind::Schema
            | ResourceKind::PartitionedSystemDocument => {
                &[ResourceKind::Database, ResourceKind::Collection]
            }
            ResourceKind::Attachment => &[
                ResourceKind::Database,
                ResourceKind::Collection,
                ResourceKind::Document,
            ],
            ResourceKind::Permission => &[ResourceKind::Database, ResourceKind::User],
        }
    }

    /// Whether this kind exists only in server deployments.
    pub const fn is_server_only(&self) -> bool {
        matches!(
            self,
            ResourceKind::MasterPartition
                | ResourceKind::ServerPartition
                | ResourceKind::Topology
                | ResourceKind::RidRange
                | ResourceKind::VectorClock
        )
    }
}

/// Which subset of kinds a deployment registers.
///
/// Client deployments never see the server-only kinds; a server-only path
/// segment is an unknown segment to a client catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeploymentProfile {
    /// The client-side subset.
    #[default]
    Client,
    /// The full set, including server-only kinds.
    Server,
}

/// Bidirectional mapping between kinds and path segments, gated by
/// deployment profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Catalog {
    profile: DeploymentProfile,
}

impl Catalog {
    /// Create a catalog for the given deployment profile.
    pub const fn new(profile: DeploymentProfile) -> Self {
        Self { profile }
    }

    /// The deployment profile this catalog was built for.
    pub const fn profile(&self) -> DeploymentProfile {
        self.profile
    }

    /// Resolve a path segment to its kind, if this profile registers it.
    ///
    /// Segment comparison is case-insensitive; the canonical form is
    /// lowercase.
    pub fn kind_of(&self, segment: &str) -> Option<ResourceKind> {
        let segment = segment.to_ascii_lowercase();
        let kind = match segment.as_str() {
            "dbs" => ResourceKind::Database,
            "colls" => ResourceKind::Collection,
            "docs" => ResourceKind::Document,
            "sprocs" => ResourceKind::StoredProcedure,
            "triggers" => ResourceKind::Trigger,
            "udfs" => ResourceKind::UserDefinedFunction,
            "conflicts" => ResourceKind::Conflict,
            "attachments" => ResourceKind::Attachment,
            "users" => ResourceKind::User,
            "permissions" => ResourceKind::Permission,
            "offers" => ResourceKind::Offer,
            "pkranges" => ResourceKind::PartitionKeyRange,
            "clientencryptionkeys" => ResourceKind::ClientEncryptionKey,
            "udts" => ResourceKind::UserDefinedType,
            "schemas" => ResourceKind::Schema,
            "snapshots" => ResourceKind::Snapshot,
            "roledefinitions" => ResourceKind::RoleDefinition,
            "roleassignments" => ResourceKind::RoleAssignment,
            "media" => ResourceKind::Media,
            "addresses" => ResourceKind::Address,
            "partitionedsystemdocuments" => ResourceKind::PartitionedSystemDocument,
            "databaseaccount" => ResourceKind::DatabaseAccount,
            "masterpartitions" => ResourceKind::MasterPartition,
            "serverpartitions" => ResourceKind::ServerPartition,
            "topology" => ResourceKind::Topology,
            "ridranges" => ResourceKind::RidRange,
            "vectorclock" => ResourceKind::VectorClock,
            _ => return None,
        };

        if kind.is_server_only() && self.profile == DeploymentProfile::Client {
            return None;
        }

        Some(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_roundtrips_every_kind_through_its_segment() {
        let catalog = Catalog::new(DeploymentProfile::Server);

        for kind in ResourceKind::ALL {
            assert_eq!(catalog.kind_of(kind.path_segment()), Some(*kind));
        }
    }

    #[test]
    fn it_maps_every_kind_to_a_distinct_lowercase_segment() {
        let mut seen = std::collections::BTreeSet::new();

        for kind in ResourceKind::ALL {
            let segment = kind.path_segment();
            assert_eq!(segment, segment.to_ascii_lowercase());
            assert!(seen.insert(segment), "duplicate segment {segment}");
        }
    }

    #[test]
    fn it_never_registers_server_kinds_on_the_client_profile() {
        let client = Catalog::new(DeploymentProfile::Client);
        let server = Catalog::new(DeploymentProfile::Server);

        for kind in ResourceKind::ALL {
            if kind.is_server_only() {
                assert_eq!(client.kind_of(kind.path_segment()), None);
                assert_eq!(server.kind_of(kind.path_segment()), Some(*kind));
            } else {
                assert_eq!(client.kind_of(kind.path_segment()), Some(*kind));
            }
        }
    }

    #[test]
    fn it_resolves_segments_case_insensitively() {
        let catalog = Catalog::default();

        assert_eq!(catalog.kind_of("Dbs"), Some(ResourceKind::Database));
        assert_eq!(catalog.kind_of("COLLS"), Some(ResourceKind::Collection));
        assert_eq!(catalog.kind_of("nothing"), None);
    }

    #[test]
    fn it_chains_nested_kinds_through_their_owners() {
        assert_eq!(ResourceKind::Database.ownership_chain(), &[]);
        assert_eq!(
            ResourceKind::StoredProcedure.ownership_chain(),
            &[ResourceKind::Database, ResourceKind::Collection]
        );
        assert_eq!(
            ResourceKind::Attachment.ownership_chain(),
            &[
                ResourceKind::Database,
                ResourceKind::Collection,
                ResourceKind::Document
            ]
        );
        assert_eq!(
            ResourceKind::Permission.ownership_chain(),
            &[ResourceKind::Database, ResourceKind::User]
        );
    }
}
