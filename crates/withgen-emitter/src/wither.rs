//! Constructor and wither member synthesis.
//!
//! One fragment per resolved node: the full-signature constructor with its
//! base forwarding call, the optional post-construction hook plumbing, and
//! one wither per constructor parameter. Abstract types get signature-only
//! wither declarations instead of bodies, which is what lets a descendant's
//! regenerated wither carry the `override` marker.

use tracing::trace;
use withgen_hierarchy::TypeNode;
use withgen_resolver::{PropertyLineage, ResolvedNode, SignatureEntry};

use crate::settings::WitherEmitConfig;
use crate::writer::CodeWriter;

/// C# source for the marker attribute, written once per output set.
pub const WITH_SUPPORT_SOURCE: &str = r#"using System;

namespace Auto
{
    [AttributeUsage(AttributeTargets.Class | AttributeTargets.Struct, Inherited = false, AllowMultiple = false)]
    sealed class AutoWithAttribute : Attribute
    {
        public bool SupportValidation { get; }

        public AutoWithAttribute(bool supportValidation = true) => SupportValidation = supportValidation;
    }
}
"#;

/// Render the with-pattern members for one resolved node.
#[must_use]
pub fn emit_wither_members(
    node: &TypeNode,
    resolved: &ResolvedNode,
    config: &WitherEmitConfig,
) -> String {
    let mut writer = CodeWriter::with_indent(2);

    if config.debugger_hook {
        emit_debugger_hook(&mut writer);
    }

    emit_constructor(&mut writer, node, resolved, config);

    if node.is_abstract() {
        emit_abstract_wither_declarations(&mut writer, node, resolved);
    } else {
        emit_withers(&mut writer, node, resolved);
    }

    trace!(
        name = %node.name(),
        parameters = resolved.signature.len(),
        own = resolved.own_parameter_count(),
        "emitted wither members"
    );
    writer.finish()
}

fn emit_debugger_hook(writer: &mut CodeWriter) {
    writer.raw_line("#if DEBUG");
    writer.line("internal void DebuggerHook() { System.Diagnostics.Debugger.Launch(); }");
    writer.raw_line("#endif");
    writer.blank_line();
}

fn emit_constructor(
    writer: &mut CodeWriter,
    node: &TypeNode,
    resolved: &ResolvedNode,
    config: &WitherEmitConfig,
) {
    let visibility = if node.is_abstract() {
        "protected"
    } else {
        "public"
    };

    let mut header = format!("{visibility} {}(", node.name());
    for (i, entry) in resolved.signature.iter().enumerate() {
        if i > 0 {
            header.push_str(", ");
        }
        header.push_str(&entry.property.type_ref);
        header.push(' ');
        header.push_str(&entry.property.parameter_name());
    }
    header.push(')');

    if let Some(base) = resolved.base_signature.as_deref() {
        if !base.is_empty() {
            header.push_str(" : base(");
            for (i, entry) in base.iter().enumerate() {
                if i > 0 {
                    header.push_str(", ");
                }
                header.push_str(&entry.property.parameter_name());
            }
            header.push(')');
        }
    }

    writer.line(&header);
    writer.line("{");
    writer.increase_indent();
    for entry in resolved.signature.iter().take(resolved.own_parameter_count()) {
        writer.line(&format!(
            "this.{} = {};",
            entry.property.name,
            entry.property.parameter_name()
        ));
    }
    if let Some(hook) = config.post_construct_hook.as_deref() {
        writer.blank_line();
        writer.line(&format!("{hook}();"));
    }
    writer.decrease_indent();
    writer.line("}");

    if let Some(hook) = config.post_construct_hook.as_deref() {
        writer.blank_line();
        writer.line(&format!("partial void {hook}();"));
    }
}

fn emit_withers(writer: &mut CodeWriter, node: &TypeNode, resolved: &ResolvedNode) {
    let entries = &resolved.signature.entries;
    for (index, entry) in entries.iter().enumerate() {
        writer.blank_line();
        writer.line("[System.Diagnostics.Contracts.Pure]");

        let marker = wither_marker(node, resolved, entry);
        let mut decl = format!(
            "public {marker}{name} With{property}({ty} value) => new {name}(",
            name = node.name(),
            property = entry.property.name,
            ty = entry.property.type_ref,
        );
        for (j, other) in entries.iter().enumerate() {
            if j > 0 {
                decl.push_str(", ");
            }
            if j == index {
                decl.push_str("value");
            } else {
                decl.push_str(&other.property.name);
            }
        }
        decl.push_str(");");
        writer.line(&decl);
    }
}

/// Polymorphism marker for one wither on a concrete type.
fn wither_marker(node: &TypeNode, resolved: &ResolvedNode, entry: &SignatureEntry) -> &'static str {
    if !node.decl.kind.supports_polymorphism() {
        return "";
    }
    if entry.origin == node.id {
        // Own parameter: fresh storage, or a concretized abstract contract
        // whose wither was already declared abstract at the ancestor.
        return match resolved.local(&entry.property.name).map(|l| l.lineage) {
            Some(PropertyLineage::OverrideOfAbstract) => "override ",
            _ if node.decl.is_sealed => "",
            _ => "virtual ",
        };
    }
    // Inherited parameter: a local override keeps the slot polymorphic;
    // otherwise the marker depends on how the origin level declared it.
    match resolved.local(&entry.property.name).map(|l| l.lineage) {
        Some(
            PropertyLineage::OverrideOfVirtual | PropertyLineage::OverrideOfConcreteOverride,
        ) => "override ",
        _ => {
            if entry.property.is_polymorphic() || entry.origin_is_abstract {
                "override "
            } else {
                "new "
            }
        }
    }
}

fn emit_abstract_wither_declarations(
    writer: &mut CodeWriter,
    node: &TypeNode,
    resolved: &ResolvedNode,
) {
    for local in &resolved.locals {
        let marker = match local.lineage {
            PropertyLineage::Introduced => "abstract",
            PropertyLineage::AbstractDeclarationOnly => {
                if local.property.is_override() {
                    "abstract override"
                } else {
                    "abstract"
                }
            }
            PropertyLineage::OverrideOfAbstract => "abstract override",
            // Storage lives above; the ancestor's wither already dispatches.
            PropertyLineage::OverrideOfVirtual | PropertyLineage::OverrideOfConcreteOverride => {
                continue;
            }
        };
        writer.blank_line();
        writer.line(&format!(
            "public {marker} {name} With{property}({ty} value);",
            name = node.name(),
            property = local.property.name,
            ty = local.property.type_ref,
        ));
    }
}

#[cfg(test)]
mod tests {
    use withgen_hierarchy::{
        Hierarchy, PropertyDescriptor, PropertyModifiers, TypeDeclaration, TypeKind,
    };
    use withgen_resolver::MemberResolver;

    use super::*;
    use crate::settings::WitherSettings;

    fn prop(name: &str, ty: &str) -> PropertyDescriptor {
        PropertyDescriptor::new(name, ty)
    }

    fn decl(name: &str, base: Option<&str>, props: Vec<PropertyDescriptor>) -> TypeDeclaration {
        let mut decl = TypeDeclaration::new(name, "Demo");
        decl.base = base.map(str::to_string);
        decl.properties = props;
        decl
    }

    fn emit(decls: Vec<TypeDeclaration>, target: &str, config: &WitherEmitConfig) -> String {
        let hierarchy = Hierarchy::build(decls);
        let mut resolver = MemberResolver::new(&hierarchy);
        let id = hierarchy
            .lookup(&format!("Demo.{target}"))
            .expect("target type present");
        let resolved = resolver.resolve(id).expect("target resolves");
        emit_wither_members(hierarchy.get(id), &resolved, config)
    }

    fn chain() -> Vec<TypeDeclaration> {
        let mut root = decl(
            "Abstract",
            None,
            vec![
                prop("NormalNumber", "int"),
                prop("AbstractNumber", "int").with_modifiers(PropertyModifiers::ABSTRACT),
            ],
        );
        root.is_abstract = true;
        vec![
            root,
            decl(
                "Der",
                Some("Abstract"),
                vec![
                    prop("AbstractNumber", "int").with_modifiers(PropertyModifiers::OVERRIDE),
                    prop("DerivedNumber", "int"),
                ],
            ),
        ]
    }

    fn default_config() -> WitherEmitConfig {
        WitherSettings::default().emit_config()
    }

    #[test]
    fn test_constructor_parameters_follow_resolved_order() {
        let out = emit(chain(), "Der", &default_config());
        assert!(
            out.contains(
                "public Der(int abstractNumber, int derivedNumber, int normalNumber) : base(normalNumber)"
            ),
            "constructor should list own parameters first and forward the base slice:\n{out}"
        );
    }

    #[test]
    fn test_constructor_assigns_only_own_parameters() {
        let out = emit(chain(), "Der", &default_config());
        assert!(out.contains("this.AbstractNumber = abstractNumber;"));
        assert!(out.contains("this.DerivedNumber = derivedNumber;"));
        assert!(
            !out.contains("this.NormalNumber"),
            "inherited storage must not be assigned locally:\n{out}"
        );
    }

    #[test]
    fn test_wither_substitutes_one_argument() {
        let out = emit(chain(), "Der", &default_config());
        assert!(
            out.contains(
                "public override Der WithAbstractNumber(int value) => new Der(value, DerivedNumber, NormalNumber);"
            ),
            "concretized contract regenerates as override:\n{out}"
        );
        assert!(
            out.contains(
                "public virtual Der WithDerivedNumber(int value) => new Der(AbstractNumber, value, NormalNumber);"
            ),
            "fresh property introduces a virtual wither:\n{out}"
        );
        assert!(
            out.contains(
                "public override Der WithNormalNumber(int value) => new Der(AbstractNumber, DerivedNumber, value);"
            ),
            "inherited storage declared at an abstract level overrides:\n{out}"
        );
    }

    #[test]
    fn test_withers_carry_pure_attribute() {
        let out = emit(chain(), "Der", &default_config());
        assert_eq!(
            out.matches("[System.Diagnostics.Contracts.Pure]").count(),
            3,
            "one Pure attribute per wither:\n{out}"
        );
    }

    #[test]
    fn test_validation_hook_emitted_by_default() {
        let out = emit(chain(), "Der", &default_config());
        assert!(out.contains("OnConstructed();"));
        assert!(out.contains("partial void OnConstructed();"));
    }

    #[test]
    fn test_validation_hook_suppressed_without_config() {
        let out = emit(chain(), "Der", &WitherEmitConfig::default());
        assert!(!out.contains("OnConstructed"), "no hook text expected:\n{out}");
    }

    #[test]
    fn test_abstract_type_declares_unbodied_withers() {
        let out = emit(chain(), "Abstract", &default_config());
        assert!(out.contains("protected Abstract(int normalNumber)"));
        assert!(out.contains("public abstract Abstract WithNormalNumber(int value);"));
        assert!(out.contains("public abstract Abstract WithAbstractNumber(int value);"));
        assert!(
            !out.contains("=> new"),
            "abstract types never construct themselves:\n{out}"
        );
    }

    #[test]
    fn test_sealed_type_omits_virtual_marker() {
        let mut sealed = decl("Sealed", None, vec![prop("Text", "string")]);
        sealed.is_sealed = true;
        let out = emit(vec![sealed], "Sealed", &default_config());
        assert!(
            out.contains("public Sealed WithText(string value) => new Sealed(value);"),
            "sealed types take no virtual marker:\n{out}"
        );
        assert!(!out.contains("virtual"));
    }

    #[test]
    fn test_inherited_plain_property_hides_base_wither() {
        let out = emit(
            vec![
                decl("Base", None, vec![prop("Text", "string")]),
                decl("Der", Some("Base"), vec![]),
            ],
            "Der",
            &default_config(),
        );
        assert!(
            out.contains("public new Der WithText(string value) => new Der(value);"),
            "plain storage at a concrete ancestor is shadowed, not overridden:\n{out}"
        );
    }

    #[test]
    fn test_override_of_virtual_regenerates_override_wither() {
        let out = emit(
            vec![
                decl(
                    "Base",
                    None,
                    vec![prop("Count", "int").with_modifiers(PropertyModifiers::VIRTUAL)],
                ),
                decl(
                    "Der",
                    Some("Base"),
                    vec![prop("Count", "int").with_modifiers(PropertyModifiers::OVERRIDE)],
                ),
            ],
            "Der",
            &default_config(),
        );
        assert!(
            out.contains("public override Der WithCount(int value) => new Der(value);"),
            "local override keeps the wither polymorphic:\n{out}"
        );
    }

    #[test]
    fn test_struct_members_carry_no_markers() {
        let mut point = decl("Point", None, vec![prop("X", "int"), prop("Y", "int")]);
        point.kind = TypeKind::Struct;
        let out = emit(vec![point], "Point", &default_config());
        assert!(out.contains("public Point(int x, int y)"));
        assert!(out.contains("public Point WithX(int value) => new Point(value, Y);"));
        assert!(!out.contains("virtual"), "structs have no dispatch:\n{out}");
    }

    #[test]
    fn test_debugger_hook_wrapped_in_debug_guard() {
        let config = WitherEmitConfig {
            post_construct_hook: None,
            debugger_hook: true,
        };
        let out = emit(chain(), "Der", &config);
        assert!(out.starts_with("#if DEBUG\n"));
        assert!(out.contains(
            "internal void DebuggerHook() { System.Diagnostics.Debugger.Launch(); }"
        ));
        assert!(out.contains("#endif"));
    }

    #[test]
    fn test_keyword_parameter_names_escaped() {
        let out = emit(
            vec![decl("Holder", None, vec![prop("Object", "string")])],
            "Holder",
            &default_config(),
        );
        assert!(
            out.contains("public Holder(string @object)"),
            "reserved parameter names take the verbatim prefix:\n{out}"
        );
        assert!(out.contains("this.Object = @object;"));
    }

    #[test]
    fn test_empty_signature_emits_default_constructor() {
        let out = emit(vec![decl("Empty", None, vec![])], "Empty", &default_config());
        assert!(out.contains("public Empty()"));
        assert!(!out.contains("With"), "no withers without parameters:\n{out}");
    }
}
