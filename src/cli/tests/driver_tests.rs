use withgen_common::PatternKind;
use withgen_hierarchy::TypeKind;

use super::driver::{fragment_file_name, list_types, render_compilation_unit};
use crate::pipeline::{self, GeneratedFragment, GenerationRequest};

fn request(json: serde_json::Value) -> GenerationRequest {
    serde_json::from_value(json).expect("manifest should deserialize")
}

fn person_fragment() -> GeneratedFragment {
    let parsed = request(serde_json::json!({
        "types": [{
            "name": "Person",
            "namespace": "Demo",
            "properties": [{ "name": "Name", "type": "string" }],
            "with": {}
        }]
    }));
    let outcome = pipeline::run(&parsed);
    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    outcome.fragments.into_iter().next().expect("one fragment")
}

#[test]
fn file_name_is_qualified_name_plus_pattern() {
    assert_eq!(fragment_file_name(&person_fragment()), "Demo.Person.With.g.cs");
}

#[test]
fn compilation_unit_nests_type_in_namespace() {
    let unit = render_compilation_unit(&person_fragment());
    assert!(unit.starts_with("// <auto-generated />\n\n"));
    assert!(unit.contains("namespace Demo\n{\n"), "unit:\n{unit}");
    assert!(unit.contains("    partial class Person\n    {\n"), "unit:\n{unit}");
    assert!(
        unit.contains("        public Person(string name)"),
        "members keep their nesting:\n{unit}"
    );
    assert!(unit.trim_end().ends_with('}'), "unit:\n{unit}");
}

#[test]
fn global_namespace_type_sits_at_top_level() {
    let mut fragment = person_fragment();
    fragment.namespace = String::new();
    let unit = render_compilation_unit(&fragment);
    assert!(!unit.contains("namespace"), "unit:\n{unit}");
    assert!(unit.contains("partial class Person\n{\n"), "unit:\n{unit}");
    assert!(
        unit.contains("    public Person(string name)"),
        "members dedent one level:\n{unit}"
    );
}

#[test]
fn modifiers_and_kind_appear_on_the_partial_declaration() {
    let mut fragment = person_fragment();
    fragment.is_abstract = true;
    let unit = render_compilation_unit(&fragment);
    assert!(unit.contains("    abstract partial class Person"), "unit:\n{unit}");

    fragment.is_abstract = false;
    fragment.is_sealed = true;
    fragment.kind = TypeKind::Record;
    let unit = render_compilation_unit(&fragment);
    assert!(unit.contains("    sealed partial record Person"), "unit:\n{unit}");
}

#[test]
fn attributes_precede_the_type_declaration() {
    let mut fragment = person_fragment();
    fragment.pattern = PatternKind::Describe;
    fragment.attributes = vec!["[System.Diagnostics.DebuggerDisplay(\"x\")]".to_string()];
    let unit = render_compilation_unit(&fragment);
    let attr_pos = unit.find("DebuggerDisplay").expect("attribute present");
    let decl_pos = unit.find("partial class").expect("declaration present");
    assert!(attr_pos < decl_pos, "attribute should come first:\n{unit}");
    assert_eq!(fragment_file_name(&fragment), "Demo.Person.Describe.g.cs");
}

#[test]
fn list_types_names_each_entry_with_its_patterns() {
    let parsed = request(serde_json::json!({
        "types": [
            { "name": "Person", "namespace": "Demo", "with": {}, "describe": {} },
            { "name": "Plain", "namespace": "Demo" }
        ]
    }));
    let listing = list_types(&parsed);
    assert_eq!(listing, "Demo.Person [With, Describe]\nDemo.Plain []\n");
}
