//! Type declarations and arena-resident hierarchy nodes.

use serde::Deserialize;

use crate::property::PropertyDescriptor;

/// Index of a type node in the hierarchy arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NONE: TypeId = TypeId(u32::MAX);

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The C# declaration form of a type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Record,
}

impl TypeKind {
    /// Declaration keyword as it appears in source.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
        }
    }

    /// Structs have no inheritance and no virtual dispatch.
    #[must_use]
    pub const fn supports_polymorphism(self) -> bool {
        !matches!(self, TypeKind::Struct)
    }
}

/// One type declaration from a generation request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDeclaration {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default = "default_true")]
    pub is_partial: bool,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub is_sealed: bool,
    /// Base type reference. Either a simple name resolved against the
    /// declaration set, or a namespace-qualified `Ns.Name`.
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescriptor>,
}

fn default_true() -> bool {
    true
}

impl TypeDeclaration {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        TypeDeclaration {
            name: name.into(),
            namespace: namespace.into(),
            kind: TypeKind::Class,
            is_partial: true,
            is_abstract: false,
            is_sealed: false,
            base: None,
            properties: Vec::new(),
        }
    }

    /// `Namespace.Name`, or just `Name` for the global namespace.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }
}

/// Link outcome recorded for each node while building the forest.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkState {
    /// Base resolved (or no base declared).
    Linked,
    /// Declared base does not resolve to any declaration in the request.
    UnlinkedBase,
    /// Node participates in an inheritance cycle.
    Cyclic,
    /// Another declaration with the same qualified name came first.
    Duplicate,
}

/// A type declaration resident in the hierarchy arena.
#[derive(Clone, Debug)]
pub struct TypeNode {
    pub id: TypeId,
    pub decl: TypeDeclaration,
    /// Resolved base node. `None` for roots and for nodes whose link failed.
    pub parent: Option<TypeId>,
    pub link: LinkState,
}

impl TypeNode {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.decl.name
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.decl.namespace
    }

    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.decl.qualified_name()
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.decl.is_abstract
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_none_sentinel() {
        assert!(TypeId::NONE.is_none());
        assert!(!TypeId(0).is_none());
    }

    #[test]
    fn test_qualified_name_with_and_without_namespace() {
        let decl = TypeDeclaration::new("Main", "Demo.Models");
        assert_eq!(decl.qualified_name(), "Demo.Models.Main");

        let global = TypeDeclaration::new("Main", "");
        assert_eq!(global.qualified_name(), "Main");
    }

    #[test]
    fn test_kind_defaults_to_class() {
        let decl: TypeDeclaration =
            serde_json::from_str(r#"{ "name": "Main", "namespace": "Demo" }"#).unwrap();
        assert_eq!(decl.kind, TypeKind::Class);
        assert!(decl.is_partial);
    }

    #[test]
    fn test_struct_kind_deserializes_and_blocks_polymorphism() {
        let decl: TypeDeclaration =
            serde_json::from_str(r#"{ "name": "Point", "kind": "struct" }"#).unwrap();
        assert_eq!(decl.kind, TypeKind::Struct);
        assert!(!decl.kind.supports_polymorphism());
        assert_eq!(decl.kind.keyword(), "struct");
    }
}
