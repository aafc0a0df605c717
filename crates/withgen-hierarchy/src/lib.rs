//! Type declarations and the single-inheritance graph they form.
//!
//! This crate turns the flat list of declarations in a generation request
//! into an indexed forest:
//! - Property descriptors with their polymorphism modifiers (`PropertyDescriptor`)
//! - Declarations and arena-resident nodes (`TypeDeclaration`, `TypeNode`, `TypeId`)
//! - The linked forest with base resolution and cycle marking (`Hierarchy`)

// Property descriptors and modifier flags
pub mod property;
pub use property::{PropertyDescriptor, PropertyModifiers};

// Declarations, node arena types, and link states
pub mod node;
pub use node::{LinkState, TypeDeclaration, TypeId, TypeKind, TypeNode};

// The inheritance forest
pub mod graph;
pub use graph::Hierarchy;
