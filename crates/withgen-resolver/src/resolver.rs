//! The memoizing member resolver.
//!
//! Resolution runs root-to-leaf along each chain. A node resolves at most
//! once per resolver instance; siblings reuse the cached ancestor outcome.
//! Failures are outcomes too: a node below a broken link resolves to a
//! propagated error instead of poisoning the whole forest.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::trace;

use withgen_hierarchy::{Hierarchy, LinkState, PropertyDescriptor, TypeId};

use crate::lineage::{MemberIndex, OwnerRecord, PropertyLineage, Storage};
use crate::signature::{ResolvedSignature, SignatureEntries, SignatureEntry};

/// Why a node failed to resolve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveErrorKind {
    /// Declared base does not resolve to any declaration in the request.
    UnlinkedBase { base: String },
    /// Node participates in an inheritance cycle.
    Cycle,
    /// Another declaration already owns this qualified name.
    DuplicateName,
    /// An ancestor failed; `ancestor` is the root cause, not necessarily the
    /// direct parent.
    PropagatedAncestor { ancestor: TypeId },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveError {
    pub node: TypeId,
    pub kind: ResolveErrorKind,
}

/// A locally declared property with its lineage classification.
///
/// Shadowing redeclarations (a plain declaration over a concrete ancestor
/// owner) are not contract members and do not appear here.
#[derive(Clone, Debug)]
pub struct LocalMember {
    pub property: PropertyDescriptor,
    pub lineage: PropertyLineage,
}

/// Fully resolved constructor surface of one node.
#[derive(Debug)]
pub struct ResolvedNode {
    pub id: TypeId,
    /// Full parameter list, own parameters first, then the base signature.
    pub signature: Arc<ResolvedSignature>,
    /// The linked parent's signature; the arguments of the `base(...)` call.
    pub base_signature: Option<Arc<ResolvedSignature>>,
    /// Local contract members in declaration order.
    pub locals: Vec<LocalMember>,
}

impl ResolvedNode {
    #[must_use]
    pub fn local(&self, name: &str) -> Option<&LocalMember> {
        self.locals.iter().find(|l| l.property.name == name)
    }

    /// Number of parameters this node's own declarations contributed.
    #[must_use]
    pub fn own_parameter_count(&self) -> usize {
        let base = self.base_signature.as_ref().map_or(0, |s| s.len());
        self.signature.len() - base
    }
}

pub type ResolveOutcome = Result<Arc<ResolvedNode>, ResolveError>;

/// Memoizing resolver over one hierarchy.
///
/// Independent families never share state, so running one resolver per
/// family partitions the caches cleanly for parallel passes.
pub struct MemberResolver<'a> {
    hierarchy: &'a Hierarchy,
    outcomes: FxHashMap<TypeId, ResolveOutcome>,
    indices: FxHashMap<TypeId, MemberIndex>,
}

impl<'a> MemberResolver<'a> {
    pub fn new(hierarchy: &'a Hierarchy) -> Self {
        MemberResolver {
            hierarchy,
            outcomes: FxHashMap::default(),
            indices: FxHashMap::default(),
        }
    }

    /// Resolve `id`, computing unresolved ancestors first.
    ///
    /// Recursion depth is bounded by the chain-depth cap enforced while
    /// building the hierarchy.
    pub fn resolve(&mut self, id: TypeId) -> ResolveOutcome {
        if let Some(outcome) = self.outcomes.get(&id) {
            return outcome.clone();
        }
        let outcome = self.resolve_uncached(id);
        self.outcomes.insert(id, outcome.clone());
        outcome
    }

    /// Resolve every node, parents before children.
    pub fn resolve_all(&mut self) -> Vec<(TypeId, ResolveOutcome)> {
        self.hierarchy
            .topo_order()
            .into_iter()
            .map(|id| (id, self.resolve(id)))
            .collect()
    }

    fn resolve_uncached(&mut self, id: TypeId) -> ResolveOutcome {
        let node = self.hierarchy.get(id);
        match node.link {
            LinkState::Cyclic => {
                return Err(ResolveError {
                    node: id,
                    kind: ResolveErrorKind::Cycle,
                });
            }
            LinkState::Duplicate => {
                return Err(ResolveError {
                    node: id,
                    kind: ResolveErrorKind::DuplicateName,
                });
            }
            LinkState::UnlinkedBase => {
                let base = node.decl.base.clone().unwrap_or_default();
                return Err(ResolveError {
                    node: id,
                    kind: ResolveErrorKind::UnlinkedBase { base },
                });
            }
            LinkState::Linked => {}
        }

        let parent_resolution = match node.parent {
            Some(parent) => match self.resolve(parent) {
                Ok(resolved) => Some(resolved),
                Err(err) => {
                    let ancestor = match err.kind {
                        ResolveErrorKind::PropagatedAncestor { ancestor } => ancestor,
                        _ => err.node,
                    };
                    return Err(ResolveError {
                        node: id,
                        kind: ResolveErrorKind::PropagatedAncestor { ancestor },
                    });
                }
            },
            None => None,
        };

        let mut index: MemberIndex = match &parent_resolution {
            Some(parent) => self.indices[&parent.id].clone(),
            None => MemberIndex::default(),
        };

        let mut locals = Vec::with_capacity(node.decl.properties.len());
        let mut entries = SignatureEntries::new();

        for property in &node.decl.properties {
            let lineage = if property.is_abstract() {
                // Abstract declarations hold no storage. Record the pending
                // obligation unless a concrete owner already exists upstream.
                match index.get(&property.name) {
                    Some(record) if record.storage == Storage::Concrete => {}
                    _ => {
                        index.insert(
                            property.name.clone(),
                            OwnerRecord {
                                level: id,
                                storage: Storage::AbstractPending,
                                virtual_storage: false,
                                via_override: false,
                            },
                        );
                    }
                }
                PropertyLineage::AbstractDeclarationOnly
            } else if property.is_override() {
                match index.get(&property.name) {
                    Some(record) if record.storage == Storage::Concrete => {
                        // Storage stays at the ancestor; no parameter here.
                        if record.virtual_storage {
                            PropertyLineage::OverrideOfVirtual
                        } else {
                            PropertyLineage::OverrideOfConcreteOverride
                        }
                    }
                    Some(_) => {
                        entries.push(signature_entry(property, node.id, node.decl.is_abstract));
                        index.insert(
                            property.name.clone(),
                            OwnerRecord {
                                level: id,
                                storage: Storage::Concrete,
                                virtual_storage: property.is_virtual(),
                                via_override: true,
                            },
                        );
                        PropertyLineage::OverrideOfAbstract
                    }
                    None => {
                        // Nothing upstream to override; treat as introduced.
                        entries.push(signature_entry(property, node.id, node.decl.is_abstract));
                        index.insert(
                            property.name.clone(),
                            OwnerRecord {
                                level: id,
                                storage: Storage::Concrete,
                                virtual_storage: property.is_virtual(),
                                via_override: false,
                            },
                        );
                        PropertyLineage::Introduced
                    }
                }
            } else {
                match index.get(&property.name) {
                    Some(record) if record.storage == Storage::Concrete => {
                        // Plain redeclaration hiding a stored ancestor
                        // property. Not a contract member at this level.
                        continue;
                    }
                    Some(_) => {
                        entries.push(signature_entry(property, node.id, node.decl.is_abstract));
                        index.insert(
                            property.name.clone(),
                            OwnerRecord {
                                level: id,
                                storage: Storage::Concrete,
                                virtual_storage: property.is_virtual(),
                                via_override: true,
                            },
                        );
                        PropertyLineage::OverrideOfAbstract
                    }
                    None => {
                        entries.push(signature_entry(property, node.id, node.decl.is_abstract));
                        index.insert(
                            property.name.clone(),
                            OwnerRecord {
                                level: id,
                                storage: Storage::Concrete,
                                virtual_storage: property.is_virtual(),
                                via_override: false,
                            },
                        );
                        PropertyLineage::Introduced
                    }
                }
            };
            locals.push(LocalMember {
                property: property.clone(),
                lineage,
            });
        }

        let base_signature = parent_resolution.as_ref().map(|p| p.signature.clone());
        if let Some(parent) = &parent_resolution {
            entries.extend(parent.signature.entries.iter().cloned());
        }

        trace!(
            node = %node.qualified_name(),
            own = locals.len(),
            total = entries.len(),
            "signature resolved"
        );

        self.indices.insert(id, index);
        Ok(Arc::new(ResolvedNode {
            id,
            signature: Arc::new(ResolvedSignature { entries }),
            base_signature,
            locals,
        }))
    }
}

fn signature_entry(
    property: &PropertyDescriptor,
    origin: TypeId,
    origin_is_abstract: bool,
) -> SignatureEntry {
    SignatureEntry {
        property: property.clone(),
        origin,
        origin_is_abstract,
    }
}
