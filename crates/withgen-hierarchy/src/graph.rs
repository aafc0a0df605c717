//! The single-inheritance forest built from a declaration set.
//!
//! Building never fails as a whole. Link problems (unknown bases, cycles,
//! duplicate names) are recorded per node so that healthy siblings keep
//! resolving; consumers read [`LinkState`] to decide what to skip.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::debug;

use withgen_common::limits::MAX_CHAIN_DEPTH;

use crate::node::{LinkState, TypeDeclaration, TypeId, TypeNode};

/// Chain classification produced by the cycle pass.
#[derive(Clone, Copy, PartialEq, Eq)]
enum ChainStatus {
    Unknown,
    /// Parent chain reaches a root.
    Terminates,
    /// Node sits on an inheritance cycle.
    OnCycle,
    /// Node is not on a cycle but its ancestor chain runs into one.
    LeadsToCycle,
}

/// An indexed forest of type declarations linked by their base references.
#[derive(Debug)]
pub struct Hierarchy {
    nodes: Vec<TypeNode>,
    /// Qualified name to node, in input order.
    by_qualified: IndexMap<String, TypeId>,
    children: Vec<Vec<TypeId>>,
}

impl Hierarchy {
    /// Build the forest from a declaration list.
    ///
    /// Node ids are assigned in input order, so iteration and output stay
    /// deterministic for a given request.
    pub fn build(decls: Vec<TypeDeclaration>) -> Hierarchy {
        let count = decls.len();
        let mut nodes: Vec<TypeNode> = Vec::with_capacity(count);
        let mut by_qualified: IndexMap<String, TypeId> = IndexMap::with_capacity(count);
        let mut by_simple: FxHashMap<String, Vec<TypeId>> = FxHashMap::default();

        for (index, decl) in decls.into_iter().enumerate() {
            let id = TypeId(index as u32);
            let qualified = decl.qualified_name();
            let link = if by_qualified.contains_key(&qualified) {
                LinkState::Duplicate
            } else {
                by_qualified.insert(qualified, id);
                by_simple.entry(decl.name.clone()).or_default().push(id);
                LinkState::Linked
            };
            nodes.push(TypeNode {
                id,
                decl,
                parent: None,
                link,
            });
        }

        // Resolve base references. Duplicates are left unlinked so the
        // surviving declaration owns the name.
        for index in 0..nodes.len() {
            if nodes[index].link != LinkState::Linked {
                continue;
            }
            let Some(base) = nodes[index].decl.base.clone() else {
                continue;
            };
            let namespace = nodes[index].decl.namespace.clone();
            match resolve_base(&base, &namespace, &by_qualified, &by_simple) {
                Some(parent) if parent == nodes[index].id => {
                    nodes[index].link = LinkState::Cyclic;
                }
                Some(parent) => nodes[index].parent = Some(parent),
                None => nodes[index].link = LinkState::UnlinkedBase,
            }
        }

        mark_cycles(&mut nodes);

        let mut children: Vec<Vec<TypeId>> = vec![Vec::new(); nodes.len()];
        for node in &nodes {
            if let Some(parent) = node.parent {
                children[parent.index()].push(node.id);
            }
        }

        let broken = nodes.iter().filter(|n| n.link != LinkState::Linked).count();
        debug!(types = nodes.len(), broken_links = broken, "hierarchy built");

        Hierarchy {
            nodes,
            by_qualified,
            children,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: TypeId) -> &TypeNode {
        &self.nodes[id.index()]
    }

    #[must_use]
    pub fn parent_of(&self, id: TypeId) -> Option<TypeId> {
        self.nodes[id.index()].parent
    }

    #[must_use]
    pub fn children_of(&self, id: TypeId) -> &[TypeId] {
        &self.children[id.index()]
    }

    /// Look up a node by qualified name.
    #[must_use]
    pub fn lookup(&self, qualified: &str) -> Option<TypeId> {
        self.by_qualified.get(qualified).copied()
    }

    /// All nodes in input order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeNode> {
        self.nodes.iter()
    }

    /// Ancestors of `id`, nearest first.
    ///
    /// The walk stops after yielding a cyclic node so that a chain running
    /// into a cycle stays finite, and is depth-capped as a backstop.
    pub fn ancestors(&self, id: TypeId) -> impl Iterator<Item = TypeId> + '_ {
        let mut current = id;
        let mut stop = false;
        let mut depth = 0usize;
        std::iter::from_fn(move || {
            if stop || depth >= MAX_CHAIN_DEPTH {
                return None;
            }
            let parent = self.nodes[current.index()].parent?;
            current = parent;
            depth += 1;
            if self.nodes[parent.index()].link == LinkState::Cyclic {
                stop = true;
            }
            Some(parent)
        })
    }

    /// Nodes ordered so that every linked parent precedes its children.
    ///
    /// Nodes on cycles (and their descendants) cannot be ordered that way;
    /// they are appended at the end in input order.
    #[must_use]
    pub fn topo_order(&self) -> Vec<TypeId> {
        let count = self.nodes.len();
        let mut order = Vec::with_capacity(count);
        let mut degree = vec![0usize; count];
        for node in &self.nodes {
            if node.parent.is_some() {
                degree[node.id.index()] = 1;
            }
        }

        let mut queue: Vec<TypeId> = self
            .nodes
            .iter()
            .filter(|n| n.parent.is_none())
            .map(|n| n.id)
            .collect();
        let mut head = 0;
        while head < queue.len() {
            let id = queue[head];
            head += 1;
            order.push(id);
            for &child in &self.children[id.index()] {
                degree[child.index()] -= 1;
                if degree[child.index()] == 0 {
                    queue.push(child);
                }
            }
        }

        if order.len() < count {
            let mut seen = vec![false; count];
            for &id in &order {
                seen[id.index()] = true;
            }
            for node in &self.nodes {
                if !seen[node.id.index()] {
                    order.push(node.id);
                }
            }
        }
        order
    }

    /// Connected inheritance families, each in parents-first order.
    ///
    /// Families are independent of each other, which makes them the unit of
    /// parallel resolution. Ordered by their first-declared member.
    #[must_use]
    pub fn families(&self) -> Vec<Vec<TypeId>> {
        let count = self.nodes.len();
        let mut component = vec![usize::MAX; count];
        let mut component_count = 0usize;

        for start in 0..count {
            if component[start] != usize::MAX {
                continue;
            }
            let label = component_count;
            component_count += 1;
            let mut stack = vec![start];
            component[start] = label;
            while let Some(index) = stack.pop() {
                let mut visit = |neighbor: usize| {
                    if component[neighbor] == usize::MAX {
                        component[neighbor] = label;
                        stack.push(neighbor);
                    }
                };
                if let Some(parent) = self.nodes[index].parent {
                    visit(parent.index());
                }
                for &child in &self.children[index] {
                    visit(child.index());
                }
            }
        }

        let mut families: Vec<Vec<TypeId>> = vec![Vec::new(); component_count];
        for id in self.topo_order() {
            families[component[id.index()]].push(id);
        }
        families
    }
}

/// Resolve a base reference against the declaration set.
///
/// Qualified references (`Ns.Name`) match exactly. Simple names prefer the
/// declaring type's own namespace, then fall back to a globally unique
/// simple-name match. Ambiguous simple names stay unresolved.
fn resolve_base(
    base: &str,
    namespace: &str,
    by_qualified: &IndexMap<String, TypeId>,
    by_simple: &FxHashMap<String, Vec<TypeId>>,
) -> Option<TypeId> {
    if base.contains('.') {
        return by_qualified.get(base).copied();
    }
    let same_namespace = if namespace.is_empty() {
        base.to_string()
    } else {
        format!("{namespace}.{base}")
    };
    if let Some(&id) = by_qualified.get(&same_namespace) {
        return Some(id);
    }
    match by_simple.get(base) {
        Some(ids) if ids.len() == 1 => Some(ids[0]),
        _ => None,
    }
}

/// Mark every node that sits on an inheritance cycle as `Cyclic`.
///
/// The parent relation is a functional graph (at most one parent per node),
/// so each walk either terminates, re-enters the current path (a new cycle),
/// or reaches a node already classified.
fn mark_cycles(nodes: &mut [TypeNode]) {
    let count = nodes.len();
    let mut status = vec![ChainStatus::Unknown; count];

    for start in 0..count {
        if status[start] != ChainStatus::Unknown {
            continue;
        }

        let mut path: Vec<usize> = Vec::new();
        let mut position: FxHashMap<usize, usize> = FxHashMap::default();
        let mut current = start;
        let outcome = loop {
            if status[current] != ChainStatus::Unknown {
                break match status[current] {
                    ChainStatus::Terminates => ChainStatus::Terminates,
                    _ => ChainStatus::LeadsToCycle,
                };
            }
            if let Some(&first) = position.get(&current) {
                // Everything from the first occurrence onward is the cycle.
                for &index in &path[first..] {
                    status[index] = ChainStatus::OnCycle;
                }
                path.truncate(first);
                break ChainStatus::LeadsToCycle;
            }
            if path.len() > MAX_CHAIN_DEPTH {
                // Chains this deep are treated as cyclic.
                for &index in &path {
                    status[index] = ChainStatus::OnCycle;
                }
                path.clear();
                break ChainStatus::LeadsToCycle;
            }
            position.insert(current, path.len());
            path.push(current);
            match nodes[current].parent {
                Some(parent) => current = parent.index(),
                None => break ChainStatus::Terminates,
            }
        };

        for &index in &path {
            status[index] = outcome;
        }
    }

    for (index, node) in nodes.iter_mut().enumerate() {
        if status[index] == ChainStatus::OnCycle {
            node.link = LinkState::Cyclic;
        }
    }
}
