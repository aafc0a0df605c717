//! Member-text synthesis for generated pattern fragments.
//!
//! The emitter turns a resolved node into the C# member declarations the
//! pattern adds to a partial type: constructor, withers, and the optional
//! display plumbing. Fragments carry member text only; namespace and type
//! scaffolding belongs to the driver that writes output files.

pub mod describe;
pub mod settings;
pub mod wither;
pub mod writer;

pub use describe::{emit_describe_members, DEBUGGER_DISPLAY_ATTRIBUTE, DESCRIBE_SUPPORT_SOURCE};
pub use settings::{
    ArgValue, DescribeSettings, GlobalOptions, SettingsError, WitherEmitConfig, WitherSettings,
    POST_CONSTRUCT_HOOK,
};
pub use wither::{emit_wither_members, WITH_SUPPORT_SOURCE};
pub use writer::CodeWriter;
