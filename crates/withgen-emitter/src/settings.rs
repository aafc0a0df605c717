//! Attribute-argument parsing for per-type pattern settings.
//!
//! Generation requests carry loosely typed positional argument lists next to
//! each pattern annotation, mirroring attribute constructor arguments. The
//! parsers here accept either the full argument list or a prefix of it, with
//! the remaining positions taking their defaults. Anything else is a
//! configuration error that skips the node for that pattern only.

use std::fmt;

use serde::Deserialize;

/// Default name of the post-construction extension point.
pub const POST_CONSTRUCT_HOOK: &str = "OnConstructed";

/// One positional attribute argument from a generation request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl ArgValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ArgValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// An attribute argument list that does not match the settings shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsError {
    /// Human description of the accepted shape, used as a message argument.
    pub expected: &'static str,
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "attribute must be constructed with {}", self.expected)
    }
}

impl std::error::Error for SettingsError {}

/// Request-wide options folded into every node's settings.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalOptions {
    /// Emit a `DebuggerHook` member under `#if DEBUG` in wither fragments.
    pub generate_debugger_hook: bool,
}

// =============================================================================
// Wither settings
// =============================================================================

/// Settings recognized on a with-pattern annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WitherSettings {
    pub support_validation: bool,
    pub generate_debugger_hook: bool,
}

impl Default for WitherSettings {
    fn default() -> Self {
        WitherSettings {
            support_validation: true,
            generate_debugger_hook: false,
        }
    }
}

impl WitherSettings {
    pub const EXPECTED: &'static str = "1 boolean value, or with default values";

    /// Parse positional annotation arguments, then fold in global options.
    pub fn from_args(
        args: &[ArgValue],
        options: &GlobalOptions,
    ) -> Result<WitherSettings, SettingsError> {
        let support_validation = match args {
            [] => true,
            [only] => only.as_bool().ok_or(SettingsError {
                expected: Self::EXPECTED,
            })?,
            _ => {
                return Err(SettingsError {
                    expected: Self::EXPECTED,
                });
            }
        };
        Ok(WitherSettings {
            support_validation,
            generate_debugger_hook: options.generate_debugger_hook,
        })
    }

    /// The emission-side view of these settings. The hook travels as data so
    /// a caller can rename or disable it without a new settings field.
    #[must_use]
    pub fn emit_config(&self) -> WitherEmitConfig {
        WitherEmitConfig {
            post_construct_hook: self
                .support_validation
                .then(|| POST_CONSTRUCT_HOOK.to_string()),
            debugger_hook: self.generate_debugger_hook,
        }
    }
}

/// What the wither emitter consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WitherEmitConfig {
    /// Method invoked at the end of every generated constructor, with a
    /// `partial void` declaration emitted alongside. `None` omits both.
    pub post_construct_hook: Option<String>,
    pub debugger_hook: bool,
}

// =============================================================================
// Describe settings
// =============================================================================

/// Settings recognized on a describe-pattern annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DescribeSettings {
    pub add_to_string_method: bool,
    pub add_debugger_display_attribute: bool,
}

impl Default for DescribeSettings {
    fn default() -> Self {
        DescribeSettings {
            add_to_string_method: true,
            add_debugger_display_attribute: false,
        }
    }
}

impl DescribeSettings {
    pub const EXPECTED: &'static str = "2 boolean values, or with default values";

    pub fn from_args(args: &[ArgValue]) -> Result<DescribeSettings, SettingsError> {
        let error = SettingsError {
            expected: Self::EXPECTED,
        };
        let defaults = DescribeSettings::default();
        match args {
            [] => Ok(defaults),
            [first] => Ok(DescribeSettings {
                add_to_string_method: first.as_bool().ok_or(error)?,
                ..defaults
            }),
            [first, second] => Ok(DescribeSettings {
                add_to_string_method: first.as_bool().ok_or(error.clone())?,
                add_debugger_display_attribute: second.as_bool().ok_or(error)?,
            }),
            _ => Err(error),
        }
    }
}
