//! C# reserved keyword table and identifier escaping.
//!
//! Generated constructors name their parameters after properties with the
//! first letter lowered, which can collide with reserved words (`Object`
//! becomes `object`). C# resolves the collision with an `@` verbatim prefix,
//! so emitted parameter names route through [`escape_identifier`].
//!
//! Only reserved keywords need escaping. Contextual keywords (`var`, `async`,
//! `record`, ...) are valid identifiers and are deliberately absent.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;

/// The reserved keywords of C#, per the language specification.
pub const RESERVED_KEYWORDS: &[&str] = &[
    "abstract",
    "as",
    "base",
    "bool",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "checked",
    "class",
    "const",
    "continue",
    "decimal",
    "default",
    "delegate",
    "do",
    "double",
    "else",
    "enum",
    "event",
    "explicit",
    "extern",
    "false",
    "finally",
    "fixed",
    "float",
    "for",
    "foreach",
    "goto",
    "if",
    "implicit",
    "in",
    "int",
    "interface",
    "internal",
    "is",
    "lock",
    "long",
    "namespace",
    "new",
    "null",
    "object",
    "operator",
    "out",
    "override",
    "params",
    "private",
    "protected",
    "public",
    "readonly",
    "ref",
    "return",
    "sbyte",
    "sealed",
    "short",
    "sizeof",
    "stackalloc",
    "static",
    "string",
    "struct",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "uint",
    "ulong",
    "unchecked",
    "unsafe",
    "ushort",
    "using",
    "virtual",
    "void",
    "volatile",
    "while",
];

static RESERVED: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| RESERVED_KEYWORDS.iter().copied().collect());

/// Whether `ident` is a reserved C# keyword.
#[must_use]
pub fn is_reserved(ident: &str) -> bool {
    RESERVED.contains(ident)
}

/// Escape `ident` with the `@` verbatim prefix when it is a reserved keyword.
#[must_use]
pub fn escape_identifier(ident: &str) -> String {
    if is_reserved(ident) {
        format!("@{ident}")
    } else {
        ident.to_string()
    }
}
