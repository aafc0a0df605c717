//! withgen: hierarchy-aware member generation for immutable C# type families.
//!
//! The workspace crates do the heavy lifting; this crate wires them into a
//! single generation pass and fronts it with a CLI:
//! - [`withgen_hierarchy`]: declarations and the linked inheritance forest
//! - [`withgen_resolver`]: constructor signatures and member lineage
//! - [`withgen_emitter`]: C# member-fragment synthesis
//! - [`pipeline`]: the pass itself, fragments plus diagnostics out

// Workspace crates re-exported under their domain names
pub use withgen_common as common;
pub use withgen_emitter as emitter;
pub use withgen_hierarchy as hierarchy;
pub use withgen_resolver as resolver;

// Generation pass orchestration (request in, fragments + diagnostics out)
pub mod pipeline;
pub use pipeline::{
    GeneratedFragment, GenerationOutcome, GenerationRequest, PatternRequest, TypeRequest,
};

// Tracing configuration (text / tree / JSON output for debugging)
pub mod tracing_config;

// Native CLI
pub mod cli;
