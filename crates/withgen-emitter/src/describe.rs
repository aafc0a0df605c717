//! Display-text member synthesis for the describe pattern.
//!
//! Each annotated type gets a private `GetDisplayText` method rendering
//! `Name { A = 1, B = "x" }`, backed by a `PrintMembers` chain that walks the
//! inheritance hierarchy: roots declare it virtual, derived types override
//! and delegate to `base.PrintMembers` before appending their own members.
//! Value formatting goes through the generated `Auto.Descriptor.Describe`
//! helper so every level renders consistently.

use tracing::trace;
use withgen_hierarchy::{PropertyDescriptor, TypeNode};

use crate::settings::DescribeSettings;
use crate::writer::CodeWriter;

/// Type-level attribute wiring the debugger value display to the generated
/// method. Carried next to the fragment, not inside it.
pub const DEBUGGER_DISPLAY_ATTRIBUTE: &str =
    r#"[System.Diagnostics.DebuggerDisplay("{GetDisplayText(),nq}")]"#;

/// C# source for the marker attribute and the shared value formatter,
/// written once per output set.
pub const DESCRIBE_SUPPORT_SOURCE: &str = r#"using System;
using System.Collections;
using System.Globalization;
using System.Linq;

namespace Auto
{
    [AttributeUsage(AttributeTargets.Class | AttributeTargets.Struct, Inherited = false, AllowMultiple = false)]
    internal sealed class AutoDescribeAttribute : Attribute
    {
        public bool AddToStringMethod { get; }
        public bool AddDebuggerDisplayAttribute { get; }

        public AutoDescribeAttribute(bool addToStringMethod = true, bool addDebuggerDisplayAttribute = false)
        {
            AddToStringMethod = addToStringMethod;
            AddDebuggerDisplayAttribute = addDebuggerDisplayAttribute;
        }
    }

    internal static class Descriptor
    {
        public static string Describe(object value) =>
            value switch
            {
                null => "∅",
                bool b => b ? "true" : "false",
                string s => $"\"{s}\"",
                char c => $"\'{c}\'",
                DateTime dt => dt.ToString("o", CultureInfo.InvariantCulture),
                IEnumerable ie => "[" + string.Join(", ", ie.Cast<object>().Select(Describe)) + "]",
                IFormattable @if => @if.ToString(null, CultureInfo.InvariantCulture),
                _ => value.ToString()
            };
    }
}
"#;

/// Render the describe-pattern members for one node.
///
/// `is_derived` reflects a linked parent in the hierarchy; it selects the
/// `PrintMembers` modifier and the `base.PrintMembers` delegation. Local
/// overrides are skipped: their storage level already prints them.
#[must_use]
pub fn emit_describe_members(
    node: &TypeNode,
    is_derived: bool,
    settings: &DescribeSettings,
) -> String {
    let mut writer = CodeWriter::with_indent(2);
    let members: Vec<&PropertyDescriptor> = node
        .decl
        .properties
        .iter()
        .filter(|p| !p.is_override())
        .collect();

    emit_display_text(&mut writer, node);

    if settings.add_to_string_method {
        writer.blank_line();
        writer.line("public override string ToString() => GetDisplayText();");
    }

    emit_print_members(&mut writer, node, is_derived, &members);

    trace!(
        name = %node.name(),
        members = members.len(),
        derived = is_derived,
        "emitted describe members"
    );
    writer.finish()
}

fn emit_display_text(writer: &mut CodeWriter, node: &TypeNode) {
    writer.line("private string GetDisplayText()");
    writer.line("{");
    writer.increase_indent();
    writer.line("var sb = new System.Text.StringBuilder();");
    writer.line(&format!("sb.Append(\"{}\");", node.name()));
    writer.line("sb.Append(\" { \");");
    writer.line("if (this.PrintMembers(sb))");
    writer.increase_indent();
    writer.line("sb.Append(\" \");");
    writer.decrease_indent();
    writer.line("sb.Append(\"}\");");
    writer.line("return sb.ToString();");
    writer.decrease_indent();
    writer.line("}");
}

fn emit_print_members(
    writer: &mut CodeWriter,
    node: &TypeNode,
    is_derived: bool,
    members: &[&PropertyDescriptor],
) {
    // Roots of sealed types and structs have nothing to dispatch to, so the
    // method is a plain private helper there.
    let closed = !node.decl.kind.supports_polymorphism() || (node.decl.is_sealed && !is_derived);
    let modifier = if closed {
        "private"
    } else if is_derived {
        "protected override"
    } else {
        "protected virtual"
    };

    writer.blank_line();
    writer.line(&format!(
        "{modifier} bool PrintMembers(System.Text.StringBuilder builder)"
    ));
    writer.line("{");
    writer.increase_indent();

    if members.is_empty() {
        if is_derived {
            writer.line("return base.PrintMembers(builder);");
        } else {
            writer.line("return false;");
        }
    } else {
        if is_derived {
            writer.line("if (base.PrintMembers(builder)) builder.Append(\", \");");
        }
        for (index, member) in members.iter().enumerate() {
            writer.blank_line();
            writer.line(&format!("builder.Append(\"{}\")", member.name));
            writer.increase_indent();
            writer.line(".Append(\" = \")");
            writer.line(&format!(".Append(Auto.Descriptor.Describe({}));", member.name));
            writer.decrease_indent();
            if index < members.len() - 1 {
                writer.line("builder.Append(\", \");");
            }
        }
        writer.blank_line();
        writer.line("return true;");
    }

    writer.decrease_indent();
    writer.line("}");
}
