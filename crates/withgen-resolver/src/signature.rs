//! Resolved constructor parameter lists.

use smallvec::SmallVec;

use withgen_common::limits::SIGNATURE_INLINE_CAPACITY;
use withgen_hierarchy::{PropertyDescriptor, TypeId};

/// One constructor parameter with its provenance.
#[derive(Clone, Debug)]
pub struct SignatureEntry {
    /// The property as declared at its origin level.
    pub property: PropertyDescriptor,
    /// Node whose declaration established the storage for this parameter.
    pub origin: TypeId,
    /// Whether the origin node itself is an abstract type.
    pub origin_is_abstract: bool,
}

pub type SignatureEntries = SmallVec<[SignatureEntry; SIGNATURE_INLINE_CAPACITY]>;

/// Complete constructor parameter list for one node.
///
/// Entries are ordered own-parameters-first: the node's storage-establishing
/// declarations in declaration order, followed by the base signature. The
/// trailing entries therefore are exactly the arguments of the `base(...)`
/// forward call.
#[derive(Clone, Debug, Default)]
pub struct ResolvedSignature {
    pub entries: SignatureEntries,
}

impl ResolvedSignature {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SignatureEntry> {
        self.entries.iter()
    }

    /// Position of the entry for `name`, if the signature carries it.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.property.name == name)
    }

    /// Property names in parameter order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.property.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> SignatureEntry {
        SignatureEntry {
            property: PropertyDescriptor::new(name, "int"),
            origin: TypeId(0),
            origin_is_abstract: false,
        }
    }

    #[test]
    fn test_position_and_names_follow_entry_order() {
        let mut entries = SignatureEntries::new();
        entries.push(entry("First"));
        entries.push(entry("Second"));
        let signature = ResolvedSignature { entries };

        assert_eq!(signature.len(), 2);
        assert_eq!(signature.position("Second"), Some(1));
        assert_eq!(signature.position("Missing"), None);
        let names: Vec<&str> = signature.names().collect();
        assert_eq!(names, vec!["First", "Second"]);
    }
}
