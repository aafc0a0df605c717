//! Centralized limits and thresholds for the generator.
//!
//! This module provides shared constants for traversal depths and capacity
//! limits used throughout the codebase. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Documents the rationale for each limit

/// Maximum length of a base-type chain the generator will walk.
///
/// Real inheritance chains are shallow (a handful of levels); generated or
/// adversarial manifests can nest far deeper. Cycle detection already rejects
/// true loops, and this caps the remaining pathological case of an extremely
/// long but acyclic chain. Chains deeper than this are treated as cyclic.
///
/// # C# example
///
/// ```csharp
/// class L0 { }
/// class L1 : L0 { }
/// class L2 : L1 { }
/// // ... 64 levels is far beyond anything a human writes
/// ```
pub const MAX_CHAIN_DEPTH: usize = 64;

/// Inline capacity for resolved constructor signatures.
///
/// Signature entry lists are backed by `SmallVec<[SignatureEntry; 8]>` and
/// hold up to 8 parameters without heap allocation. Most immutable types in
/// real code carry fewer than 8 settable properties across their whole chain,
/// so the common case never allocates.
///
/// # C# example
///
/// ```csharp
/// // Fits inline (4 parameters across the chain):
/// public Derived(int a, string b, bool c, double d) : base(c, d) { ... }
/// ```
pub const SIGNATURE_INLINE_CAPACITY: usize = 8;

/// Pre-allocation size for emitted member fragments.
///
/// A generated fragment (constructor, hook, withers) for a typical type runs
/// a few hundred bytes. Starting the output buffer here avoids the first few
/// rounds of growth without over-reserving for small types.
pub const INITIAL_FRAGMENT_CAPACITY: usize = 512;
