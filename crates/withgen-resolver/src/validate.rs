//! Structural checks evaluated per node before emission.
//!
//! These are about the declaration itself, not the chain: a failing node
//! still resolves (its properties stay visible to descendants), but no code
//! is generated for it.

use withgen_hierarchy::{TypeDeclaration, TypeNode};

use crate::signature::ResolvedSignature;

/// A defect in a single declaration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StructuralIssue {
    /// Generated members need a `partial` declaration to merge into.
    NotPartial,
    /// The type's simple name equals the final segment of its namespace,
    /// which makes emitted qualified references ambiguous.
    NamespaceEqualsTypeName,
}

/// First structural defect of `decl`, if any.
#[must_use]
pub fn check_structure(decl: &TypeDeclaration) -> Option<StructuralIssue> {
    if !decl.is_partial {
        return Some(StructuralIssue::NotPartial);
    }
    if !decl.namespace.is_empty() && namespace_tail(&decl.namespace) == decl.name {
        return Some(StructuralIssue::NamespaceEqualsTypeName);
    }
    None
}

fn namespace_tail(namespace: &str) -> &str {
    namespace.rsplit('.').next().unwrap_or(namespace)
}

/// Whether a concrete node ended up with nothing to construct.
///
/// Abstract nodes are exempt: an empty abstract root is a normal way to
/// start a hierarchy.
#[must_use]
pub fn has_no_contract_members(node: &TypeNode, signature: &ResolvedSignature) -> bool {
    !node.decl.is_abstract && signature.is_empty()
}
