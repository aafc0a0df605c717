//! Driver for the withgen CLI: manifest in, generated source files out.
//!
//! The driver owns everything the core pipeline deliberately does not:
//! reading the request manifest, wrapping member fragments in namespace and
//! partial-type scaffolding, choosing file names, and writing output. The
//! pipeline stays pure, so every failure mode here is an I/O failure with a
//! path attached.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use withgen_common::PatternKind;
use withgen_emitter::{DESCRIBE_SUPPORT_SOURCE, WITH_SUPPORT_SOURCE};

use crate::cli::args::CliArgs;
use crate::cli::reporter::Reporter;
use crate::pipeline::{self, GeneratedFragment, GenerationRequest};

/// Nothing went wrong; all requested fragments generated.
pub const EXIT_SUCCESS: i32 = 0;
/// At least one error diagnostic; some fragments were skipped.
pub const EXIT_DIAGNOSTICS: i32 = 1;

const GENERATED_FILE_HEADER: &str = "// <auto-generated />";

/// Run the CLI end to end. Returns the process exit code.
pub fn run(args: &CliArgs) -> Result<i32> {
    let request = load_manifest(&args.manifest)?;

    if args.list_types_only {
        print!("{}", list_types(&request));
        return Ok(EXIT_SUCCESS);
    }

    let outcome = pipeline::run(&request);

    let use_color = !args.no_color && std::io::IsTerminal::is_terminal(&std::io::stderr());
    let reporter = Reporter::new(use_color);
    if !outcome.diagnostics.is_empty() {
        eprint!("{}", reporter.render(&outcome.diagnostics));
    }
    if args.diagnostics_json {
        let json = serde_json::to_string_pretty(&outcome.diagnostics)
            .context("failed to serialize diagnostics")?;
        println!("{json}");
    }

    if args.stdout {
        print_units(&outcome.fragments);
    } else {
        write_units(&args.out_dir, &request, &outcome.fragments)?;
    }

    Ok(if outcome.has_errors() {
        EXIT_DIAGNOSTICS
    } else {
        EXIT_SUCCESS
    })
}

fn load_manifest(path: &Path) -> Result<GenerationRequest> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("failed to parse manifest {}", path.display()))
}

/// One line per manifest entry: qualified name plus requested patterns.
pub fn list_types(request: &GenerationRequest) -> String {
    let mut out = String::new();
    for entry in &request.types {
        let mut patterns = Vec::new();
        for pattern in [PatternKind::With, PatternKind::Describe] {
            if entry.pattern(pattern).is_some() {
                patterns.push(pattern.pattern_name());
            }
        }
        let _ = writeln!(
            out,
            "{} [{}]",
            entry.decl.qualified_name(),
            patterns.join(", ")
        );
    }
    out
}

/// File name for one fragment: `Namespace.Type.Pattern.g.cs`.
#[must_use]
pub fn fragment_file_name(fragment: &GeneratedFragment) -> String {
    format!(
        "{}.{}.g.cs",
        fragment.qualified_name(),
        fragment.pattern.pattern_name()
    )
}

/// Wrap one fragment's member text in its namespace and partial-type blocks.
///
/// Member text arrives pre-indented for a type body nested in a namespace;
/// types in the global namespace get that level stripped back off.
#[must_use]
pub fn render_compilation_unit(fragment: &GeneratedFragment) -> String {
    let mut out = String::new();
    out.push_str(GENERATED_FILE_HEADER);
    out.push_str("\n\n");

    let has_namespace = !fragment.namespace.is_empty();
    if has_namespace {
        let _ = writeln!(out, "namespace {}\n{{", fragment.namespace);
    }

    let type_indent = if has_namespace { "    " } else { "" };
    for attribute in &fragment.attributes {
        let _ = writeln!(out, "{type_indent}{attribute}");
    }

    let mut modifiers = String::new();
    if fragment.is_abstract {
        modifiers.push_str("abstract ");
    }
    if fragment.is_sealed {
        modifiers.push_str("sealed ");
    }
    let _ = writeln!(
        out,
        "{type_indent}{modifiers}partial {} {}\n{type_indent}{{",
        fragment.kind.keyword(),
        fragment.type_name
    );

    for line in fragment.members.lines() {
        if line.is_empty() {
            out.push('\n');
        } else if has_namespace {
            let _ = writeln!(out, "{line}");
        } else {
            // Preprocessor lines sit at column zero and stay there.
            let _ = writeln!(out, "{}", line.strip_prefix("    ").unwrap_or(line));
        }
    }

    let _ = writeln!(out, "{type_indent}}}");
    if has_namespace {
        out.push_str("}\n");
    }
    out
}

/// Support sources: the marker attributes users annotate with. Written for
/// every pattern the manifest mentions, whether or not generation succeeded,
/// since user code already references the attribute.
fn support_units(request: &GenerationRequest) -> Vec<(&'static str, &'static str)> {
    let mut units = Vec::new();
    for (pattern, name, source) in [
        (
            PatternKind::With,
            "Auto.AutoWithAttribute.g.cs",
            WITH_SUPPORT_SOURCE,
        ),
        (
            PatternKind::Describe,
            "Auto.AutoDescribeAttribute.g.cs",
            DESCRIBE_SUPPORT_SOURCE,
        ),
    ] {
        if request.types.iter().any(|t| t.pattern(pattern).is_some()) {
            units.push((name, source));
        }
    }
    units
}

fn print_units(fragments: &[GeneratedFragment]) {
    for fragment in fragments {
        println!("// {}", fragment_file_name(fragment));
        print!("{}", render_compilation_unit(fragment));
        println!();
    }
}

fn write_units(
    out_dir: &Path,
    request: &GenerationRequest,
    fragments: &[GeneratedFragment],
) -> Result<()> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    for (name, source) in support_units(request) {
        let path = out_dir.join(name);
        fs::write(&path, source).with_context(|| format!("failed to write {}", path.display()))?;
    }

    for fragment in fragments {
        let path = out_dir.join(fragment_file_name(fragment));
        fs::write(&path, render_compilation_unit(fragment))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    Ok(())
}
