//! Common types and utilities for the withgen source generator.
//!
//! This crate provides foundational types used across all withgen crates:
//! - Diagnostic types and the coded message table (`Diagnostic`, `DiagnosticCategory`)
//! - Pattern identities (`PatternKind`)
//! - C# reserved-word handling for emitted identifiers
//! - Generator limits and thresholds

// Diagnostics - coded messages attached to type identities
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, PatternKind, format_message};

// C# reserved keyword table and identifier escaping
pub mod keywords;

// Centralized limits and thresholds
pub mod limits;
