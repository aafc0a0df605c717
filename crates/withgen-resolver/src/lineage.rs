//! Lineage classification of property declarations.
//!
//! Each chain carries a member index mapping property names to their owning
//! level. A property's owner is the nearest concrete (non-abstract)
//! declaration walking from the node toward the root; abstract declarations
//! only record a pending obligation for descendants.

use rustc_hash::FxHashMap;

use withgen_hierarchy::TypeId;

/// How a local property declaration relates to the ancestor chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyLineage {
    /// First occurrence of the name in the chain, with storage here.
    Introduced,
    /// Overrides a `virtual` stored property owned by an ancestor.
    OverrideOfVirtual,
    /// First concretization of an abstract contract; storage lands here.
    OverrideOfAbstract,
    /// Overrides a property whose storage was itself established by an
    /// ancestor's override.
    OverrideOfConcreteOverride,
    /// Abstract declaration with no storage at this level.
    AbstractDeclarationOnly,
}

impl PropertyLineage {
    /// Whether this declaration adds a parameter to the node's constructor.
    ///
    /// Only declarations that establish storage at the declaring level do:
    /// a fresh introduction, or the concretization of an abstract contract.
    #[must_use]
    pub fn contributes_parameter(self) -> bool {
        matches!(
            self,
            PropertyLineage::Introduced | PropertyLineage::OverrideOfAbstract
        )
    }
}

/// Whether a name's current owner actually holds stored state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Storage {
    /// Declared abstract somewhere up the chain, not yet concretized.
    AbstractPending,
    /// A concrete declaration owns the backing storage.
    Concrete,
}

/// Ownership record for one property name at some point in a chain.
#[derive(Clone, Debug)]
pub struct OwnerRecord {
    /// Level that owns the declaration (the storage level when concrete).
    pub level: TypeId,
    pub storage: Storage,
    /// Concrete storage was declared `virtual`.
    pub virtual_storage: bool,
    /// Concrete storage was established by overriding an abstract contract.
    pub via_override: bool,
}

/// Property name to owner, accumulated along one root-to-node path.
pub type MemberIndex = FxHashMap<String, OwnerRecord>;
