use withgen_common::diagnostics::diagnostic_codes;
use withgen_common::{Diagnostic, PatternKind};

use super::reporter::Reporter;

fn base_not_annotated() -> Diagnostic {
    Diagnostic::coded(
        PatternKind::With,
        diagnostic_codes::BASE_TYPE_NOT_ANNOTATED,
        "Entity",
        "Demo.Model",
        &[],
    )
}

#[test]
fn plain_output_carries_subject_category_code_and_message() {
    let reporter = Reporter::new(false);
    let line = reporter.format_diagnostic(&base_not_annotated());
    assert_eq!(
        line,
        "Demo.Model.Entity - error AutoWith004: Base 'Entity' type must also be \
         decorated with AutoWithAttribute attribute"
    );
}

#[test]
fn global_namespace_subject_is_bare_name() {
    let reporter = Reporter::new(false);
    let diag = Diagnostic::coded(
        PatternKind::Describe,
        diagnostic_codes::NO_CONTRACT_MEMBERS,
        "Empty",
        "",
        &["Describe"],
    );
    let line = reporter.format_diagnostic(&diag);
    assert!(
        line.starts_with("Empty - warning AutoDescribe050:"),
        "unexpected line: {line}"
    );
}

#[test]
fn render_emits_one_line_per_diagnostic() {
    let reporter = Reporter::new(false);
    let out = reporter.render(&[base_not_annotated(), base_not_annotated()]);
    assert_eq!(out.lines().count(), 2);
    assert!(out.ends_with('\n'));
}

#[test]
fn colored_output_still_contains_the_code() {
    colored::control::set_override(true);
    let reporter = Reporter::new(true);
    let line = reporter.format_diagnostic(&base_not_annotated());
    colored::control::unset_override();
    assert!(
        line.contains("AutoWith004"),
        "code must survive coloring: {line}"
    );
}
