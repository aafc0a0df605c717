//! Constructor-signature resolution over the inheritance forest.
//!
//! Given a [`withgen_hierarchy::Hierarchy`], this crate determines for each
//! node which properties hold stored state, at which level that storage
//! lives, and what full constructor parameter list the node therefore needs:
//! - Lineage classification of property declarations (`PropertyLineage`)
//! - Resolved parameter lists with entry provenance (`ResolvedSignature`)
//! - The memoizing resolver itself (`MemberResolver`)
//! - Structural pre-emission checks (`validate`)

// Lineage classification and the per-chain member index
pub mod lineage;
pub use lineage::{MemberIndex, OwnerRecord, PropertyLineage, Storage};

// Resolved parameter lists
pub mod signature;
pub use signature::{ResolvedSignature, SignatureEntry};

// The memoizing resolver
pub mod resolver;
pub use resolver::{
    LocalMember, MemberResolver, ResolveError, ResolveErrorKind, ResolveOutcome, ResolvedNode,
};

// Structural validation evaluated before emission
pub mod validate;
pub use validate::StructuralIssue;
