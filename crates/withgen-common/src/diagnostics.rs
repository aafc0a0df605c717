//! Diagnostic types and message lookup for pattern generation.
//!
//! Every diagnostic is attributed to a type identity (name plus namespace)
//! rather than a source span: the generator consumes declaration manifests,
//! not source text, so the identity is the stable thing to point at.
//!
//! Message templates use positional placeholders. `{0}` is the subject type
//! name, `{1}` the subject namespace, `{2}` the generator name, `{3}` the
//! attribute name. Some templates take an extra argument as `{4}`.

use serde::Serialize;

// =============================================================================
// Pattern identity
// =============================================================================

/// Which generated pattern a diagnostic or fragment belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum PatternKind {
    With,
    Describe,
}

impl PatternKind {
    /// Short pattern name as it appears in diagnostic codes and messages.
    #[must_use]
    pub const fn pattern_name(self) -> &'static str {
        match self {
            PatternKind::With => "With",
            PatternKind::Describe => "Describe",
        }
    }

    /// Name of the marker attribute that requests this pattern.
    #[must_use]
    pub const fn attribute_name(self) -> &'static str {
        match self {
            PatternKind::With => "AutoWithAttribute",
            PatternKind::Describe => "AutoDescribeAttribute",
        }
    }

    /// Tool name recorded in `GeneratedCode` attributes and diagnostics.
    #[must_use]
    pub const fn generator_name(self) -> &'static str {
        match self {
            PatternKind::With => "withgen.WitherGenerator",
            PatternKind::Describe => "withgen.DescribeGenerator",
        }
    }

    /// Render a diagnostic code the way it appears to users, e.g. `AutoWith004`.
    #[must_use]
    pub fn display_code(self, code: u16) -> String {
        format!("Auto{}{:03}", self.pattern_name(), code)
    }
}

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

/// A generation diagnostic attributed to a type identity.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: u16,
    pub pattern: PatternKind,
    #[serde(rename = "severity")]
    pub category: DiagnosticCategory,
    pub message_text: String,
    pub subject_name: String,
    pub subject_namespace: String,
    pub generator_name: &'static str,
    pub attribute_name: &'static str,
}

impl Diagnostic {
    /// Build a diagnostic from the message table.
    ///
    /// `extras` fills placeholders from `{4}` onward; most codes take none.
    /// Unknown codes produce an error diagnostic with a fallback message so a
    /// table drift never panics the generator.
    #[must_use]
    pub fn coded(
        pattern: PatternKind,
        code: u16,
        subject_name: &str,
        subject_namespace: &str,
        extras: &[&str],
    ) -> Self {
        let (category, template) = match get_diagnostic_message(code) {
            Some(message) => (message.category, message.message),
            None => (DiagnosticCategory::Error, "Unknown diagnostic '{0}'"),
        };
        let mut args: Vec<&str> = vec![
            subject_name,
            subject_namespace,
            pattern.generator_name(),
            pattern.attribute_name(),
        ];
        args.extend_from_slice(extras);
        Diagnostic {
            code,
            pattern,
            category,
            message_text: format_message(template, &args),
            subject_name: subject_name.to_string(),
            subject_namespace: subject_namespace.to_string(),
            generator_name: pattern.generator_name(),
            attribute_name: pattern.attribute_name(),
        }
    }

    /// Render the code the way it appears to users, e.g. `AutoWith050`.
    #[must_use]
    pub fn display_code(&self) -> String {
        self.pattern.display_code(self.code)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u16,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Well-known diagnostic codes.
///
/// Codes below 50 are errors that stop generation for the offending node;
/// 50 and up are warnings that leave generation running.
pub mod diagnostic_codes {
    pub const NON_PARTIAL_TYPE: u16 = 1;
    pub const MALFORMED_SETTINGS: u16 = 2;
    pub const NAMESPACE_EQUALS_TYPE_NAME: u16 = 3;
    pub const BASE_TYPE_NOT_ANNOTATED: u16 = 4;
    pub const ANCESTOR_GENERATION_FAILED: u16 = 5;
    pub const INHERITANCE_CYCLE: u16 = 6;
    pub const DUPLICATE_TYPE_DECLARATION: u16 = 7;
    pub const NO_CONTRACT_MEMBERS: u16 = 50;
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    DiagnosticMessage {
        code: diagnostic_codes::NON_PARTIAL_TYPE,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' decorated with {3} must also be declared partial",
    },
    DiagnosticMessage {
        code: diagnostic_codes::MALFORMED_SETTINGS,
        category: DiagnosticCategory::Error,
        message: "Attribute {3} must be constructed with {4}",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NAMESPACE_EQUALS_TYPE_NAME,
        category: DiagnosticCategory::Error,
        message: "Type name '{0}' cannot be equal to containing namespace: '{1}'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::BASE_TYPE_NOT_ANNOTATED,
        category: DiagnosticCategory::Error,
        message: "Base '{0}' type must also be decorated with {3} attribute",
    },
    DiagnosticMessage {
        code: diagnostic_codes::ANCESTOR_GENERATION_FAILED,
        category: DiagnosticCategory::Error,
        message: "Generation for '{0}' was skipped because ancestor type '{4}' did not generate",
    },
    DiagnosticMessage {
        code: diagnostic_codes::INHERITANCE_CYCLE,
        category: DiagnosticCategory::Error,
        message: "Inheritance cycle detected at type '{0}'",
    },
    DiagnosticMessage {
        code: diagnostic_codes::DUPLICATE_TYPE_DECLARATION,
        category: DiagnosticCategory::Error,
        message: "Type '{0}' is declared more than once in the generation request",
    },
    DiagnosticMessage {
        code: diagnostic_codes::NO_CONTRACT_MEMBERS,
        category: DiagnosticCategory::Warning,
        message: "No non-abstract properties for {4} pattern defined at '{0}'",
    },
];

/// Look up a diagnostic message definition by code.
///
/// Returns the `DiagnosticMessage` with template string containing `{0}`, `{1}`, etc. placeholders.
/// Use `format_message()` to fill in the placeholders.
#[must_use]
pub fn get_diagnostic_message(code: u16) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the category for a diagnostic code.
#[must_use]
pub fn get_diagnostic_category(code: u16) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message_replaces_positional_args() {
        let out = format_message("'{0}' in '{1}' via {3}", &["Der", "Demo", "gen", "Attr"]);
        assert_eq!(out, "'Der' in 'Demo' via Attr");
    }

    #[test]
    fn test_format_message_leaves_unfilled_placeholders() {
        let out = format_message("needs {0} and {4}", &["one"]);
        assert_eq!(out, "needs one and {4}");
    }

    #[test]
    fn test_display_code_is_zero_padded() {
        assert_eq!(PatternKind::With.display_code(4), "AutoWith004");
        assert_eq!(PatternKind::Describe.display_code(50), "AutoDescribe050");
    }

    #[test]
    fn test_no_contract_members_is_a_warning() {
        assert_eq!(
            get_diagnostic_category(diagnostic_codes::NO_CONTRACT_MEMBERS),
            Some(DiagnosticCategory::Warning)
        );
    }

    #[test]
    fn test_coded_diagnostic_fills_subject_and_attribute() {
        let diag = Diagnostic::coded(
            PatternKind::With,
            diagnostic_codes::BASE_TYPE_NOT_ANNOTATED,
            "Base",
            "Demo",
            &[],
        );
        assert!(diag.is_error());
        assert_eq!(
            diag.message_text,
            "Base 'Base' type must also be decorated with AutoWithAttribute attribute"
        );
        assert_eq!(diag.display_code(), "AutoWith004");
    }

    #[test]
    fn test_coded_diagnostic_with_extra_argument() {
        let diag = Diagnostic::coded(
            PatternKind::With,
            diagnostic_codes::NO_CONTRACT_MEMBERS,
            "Empty",
            "Demo",
            &["With"],
        );
        assert_eq!(diag.category, DiagnosticCategory::Warning);
        assert_eq!(
            diag.message_text,
            "No non-abstract properties for With pattern defined at 'Empty'"
        );
    }

    #[test]
    fn test_unknown_code_does_not_panic() {
        let diag = Diagnostic::coded(PatternKind::Describe, 999, "X", "", &[]);
        assert!(diag.is_error());
        assert!(diag.message_text.contains('X'));
    }
}
