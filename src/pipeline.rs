//! The generation pass: manifest in, fragments and diagnostics out.
//!
//! A pass builds the hierarchy once, then walks every independent family
//! in parallel. Within a family each pattern runs as its own sweep in
//! parents-first order, so a node always knows whether its ancestors
//! generated before it decides its own fate. Results are re-ordered by
//! input index afterwards, which keeps output deterministic regardless
//! of how the families were scheduled.

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::{debug, trace};

use withgen_common::diagnostics::diagnostic_codes;
use withgen_common::{Diagnostic, PatternKind};
use withgen_emitter::{
    ArgValue, DEBUGGER_DISPLAY_ATTRIBUTE, DescribeSettings, GlobalOptions, WitherSettings,
    emit_describe_members, emit_wither_members,
};
use withgen_hierarchy::{Hierarchy, TypeDeclaration, TypeId, TypeKind, TypeNode};
use withgen_resolver::{
    MemberResolver, ResolveError, ResolveErrorKind, ResolvedNode, StructuralIssue, validate,
};

// =============================================================================
// Request model
// =============================================================================

/// Per-pattern request attached to a type entry. Presence of the request is
/// what marks the type as annotated for that pattern.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatternRequest {
    /// Positional attribute arguments, checked against the pattern's
    /// accepted constructor shapes.
    #[serde(default)]
    pub args: Vec<ArgValue>,
}

/// One manifest entry: a declaration plus the patterns requested for it.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRequest {
    #[serde(flatten)]
    pub decl: TypeDeclaration,
    /// Constructor plus wither-method generation.
    #[serde(default)]
    pub with: Option<PatternRequest>,
    /// Display-text member generation.
    #[serde(default)]
    pub describe: Option<PatternRequest>,
}

impl TypeRequest {
    #[must_use]
    pub fn pattern(&self, pattern: PatternKind) -> Option<&PatternRequest> {
        match pattern {
            PatternKind::With => self.with.as_ref(),
            PatternKind::Describe => self.describe.as_ref(),
        }
    }
}

/// The full generation manifest.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub options: GlobalOptions,
    #[serde(default)]
    pub types: Vec<TypeRequest>,
}

// =============================================================================
// Output model
// =============================================================================

/// Generated member text for one (type, pattern) pair, with everything the
/// output layer needs to wrap it in a partial declaration.
#[derive(Clone, Debug)]
pub struct GeneratedFragment {
    pub pattern: PatternKind,
    pub type_name: String,
    pub namespace: String,
    pub kind: TypeKind,
    pub is_abstract: bool,
    pub is_sealed: bool,
    /// Attribute lines to place on the partial declaration, already bracketed.
    pub attributes: Vec<String>,
    /// Member source, pre-indented for a type body nested in a namespace.
    pub members: String,
}

impl GeneratedFragment {
    /// `Namespace.Name`, or just `Name` for the global namespace.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.type_name)
        }
    }
}

/// Everything a pass produced, in input order.
#[derive(Debug, Default)]
pub struct GenerationOutcome {
    pub fragments: Vec<GeneratedFragment>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutcome {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

// =============================================================================
// Pass driver
// =============================================================================

const PATTERNS: [PatternKind; 2] = [PatternKind::With, PatternKind::Describe];

/// Run one generation pass over the request.
pub fn run(request: &GenerationRequest) -> GenerationOutcome {
    let decls: Vec<TypeDeclaration> = request.types.iter().map(|t| t.decl.clone()).collect();
    let hierarchy = Hierarchy::build(decls);
    debug!(types = hierarchy.len(), "generation pass started");

    let families = hierarchy.families();
    let outputs: Vec<FamilyOutput> = families
        .par_iter()
        .map(|family| generate_family(&hierarchy, request, family))
        .collect();

    let outcome = merge_outputs(outputs);
    debug!(
        fragments = outcome.fragments.len(),
        diagnostics = outcome.diagnostics.len(),
        "generation pass finished"
    );
    outcome
}

/// How one (type, pattern) pair ended up, consulted by descendants in the
/// same sweep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PatternState {
    /// No request for this pattern on this type.
    Unannotated,
    /// Settings were rejected; the type is dropped from this pattern but
    /// descendants are not poisoned by it.
    Skipped,
    /// Generation failed here or above; `root` names the original failure.
    Failed { root: TypeId },
    Healthy,
}

/// Per-family results, tagged with node ids for the final re-ordering.
#[derive(Default)]
struct FamilyOutput {
    fragments: Vec<(TypeId, GeneratedFragment)>,
    diagnostics: Vec<(TypeId, Diagnostic)>,
}

fn generate_family(
    hierarchy: &Hierarchy,
    request: &GenerationRequest,
    family: &[TypeId],
) -> FamilyOutput {
    let mut resolver = MemberResolver::new(hierarchy);
    let mut output = FamilyOutput::default();

    for pattern in PATTERNS {
        let mut states: FxHashMap<TypeId, PatternState> = FxHashMap::default();
        let mut reported_bases: FxHashSet<String> = FxHashSet::default();

        for &id in family {
            let state = generate_node(
                hierarchy,
                request,
                &mut resolver,
                pattern,
                id,
                &states,
                &mut reported_bases,
                &mut output,
            );
            states.insert(id, state);
        }
    }

    output
}

fn generate_node(
    hierarchy: &Hierarchy,
    request: &GenerationRequest,
    resolver: &mut MemberResolver<'_>,
    pattern: PatternKind,
    id: TypeId,
    states: &FxHashMap<TypeId, PatternState>,
    reported_bases: &mut FxHashSet<String>,
    output: &mut FamilyOutput,
) -> PatternState {
    let node = hierarchy.get(id);

    let Some(pattern_request) = request.types[id.index()].pattern(pattern) else {
        return PatternState::Unannotated;
    };

    // An unannotated or failed ancestor sinks everything below it.
    if let Some(parent) = hierarchy.parent_of(id) {
        match states.get(&parent) {
            Some(PatternState::Unannotated) => {
                let parent_node = hierarchy.get(parent);
                if reported_bases.insert(parent_node.qualified_name()) {
                    output.diagnostics.push((
                        id,
                        Diagnostic::coded(
                            pattern,
                            diagnostic_codes::BASE_TYPE_NOT_ANNOTATED,
                            parent_node.name(),
                            parent_node.namespace(),
                            &[],
                        ),
                    ));
                }
                return PatternState::Failed { root: parent };
            }
            Some(PatternState::Failed { root }) => {
                output.diagnostics.push((
                    id,
                    Diagnostic::coded(
                        pattern,
                        diagnostic_codes::ANCESTOR_GENERATION_FAILED,
                        node.name(),
                        node.namespace(),
                        &[hierarchy.get(*root).name()],
                    ),
                ));
                return PatternState::Failed { root: *root };
            }
            // Healthy and Skipped ancestors do not block descendants. A
            // missing entry happens in cyclic families where parents-first
            // ordering broke down; resolution reports those below.
            _ => {}
        }
    }

    if let Some(issue) = validate::check_structure(&node.decl) {
        let code = match issue {
            StructuralIssue::NotPartial => diagnostic_codes::NON_PARTIAL_TYPE,
            StructuralIssue::NamespaceEqualsTypeName => {
                diagnostic_codes::NAMESPACE_EQUALS_TYPE_NAME
            }
        };
        output.diagnostics.push((
            id,
            Diagnostic::coded(pattern, code, node.name(), node.namespace(), &[]),
        ));
        return PatternState::Failed { root: id };
    }

    let settings = match parse_settings(pattern, pattern_request, &request.options) {
        Ok(settings) => settings,
        Err(expected) => {
            output.diagnostics.push((
                id,
                Diagnostic::coded(
                    pattern,
                    diagnostic_codes::MALFORMED_SETTINGS,
                    node.name(),
                    node.namespace(),
                    &[expected],
                ),
            ));
            return PatternState::Skipped;
        }
    };

    let resolved = match resolver.resolve(id) {
        Ok(resolved) => resolved,
        Err(error) => {
            report_resolve_error(hierarchy, pattern, node, &error, reported_bases, output);
            let root = match error.kind {
                ResolveErrorKind::PropagatedAncestor { ancestor } => ancestor,
                _ => id,
            };
            return PatternState::Failed { root };
        }
    };

    if validate::has_no_contract_members(node, &resolved.signature) {
        output.diagnostics.push((
            id,
            Diagnostic::coded(
                pattern,
                diagnostic_codes::NO_CONTRACT_MEMBERS,
                node.name(),
                node.namespace(),
                &[pattern.pattern_name()],
            ),
        ));
    }

    let fragment = render_fragment(hierarchy, pattern, id, node, &resolved, &settings);
    trace!(
        type_name = node.name(),
        pattern = pattern.pattern_name(),
        "fragment generated"
    );
    output.fragments.push((id, fragment));
    PatternState::Healthy
}

fn report_resolve_error(
    hierarchy: &Hierarchy,
    pattern: PatternKind,
    node: &TypeNode,
    error: &ResolveError,
    reported_bases: &mut FxHashSet<String>,
    output: &mut FamilyOutput,
) {
    let id = error.node;
    match &error.kind {
        ResolveErrorKind::UnlinkedBase { base } => {
            // Mirror base-reference resolution: a dotted reference carries
            // its own namespace, a bare one lives in the node's namespace.
            let (base_namespace, base_name) = match base.rfind('.') {
                Some(dot) => (&base[..dot], &base[dot + 1..]),
                None => (node.namespace(), base.as_str()),
            };
            let key = if base_namespace.is_empty() {
                base_name.to_string()
            } else {
                format!("{base_namespace}.{base_name}")
            };
            if reported_bases.insert(key) {
                output.diagnostics.push((
                    id,
                    Diagnostic::coded(
                        pattern,
                        diagnostic_codes::BASE_TYPE_NOT_ANNOTATED,
                        base_name,
                        base_namespace,
                        &[],
                    ),
                ));
            }
        }
        ResolveErrorKind::Cycle => {
            output.diagnostics.push((
                id,
                Diagnostic::coded(
                    pattern,
                    diagnostic_codes::INHERITANCE_CYCLE,
                    node.name(),
                    node.namespace(),
                    &[],
                ),
            ));
        }
        ResolveErrorKind::DuplicateName => {
            output.diagnostics.push((
                id,
                Diagnostic::coded(
                    pattern,
                    diagnostic_codes::DUPLICATE_TYPE_DECLARATION,
                    node.name(),
                    node.namespace(),
                    &[],
                ),
            ));
        }
        ResolveErrorKind::PropagatedAncestor { ancestor } => {
            output.diagnostics.push((
                id,
                Diagnostic::coded(
                    pattern,
                    diagnostic_codes::ANCESTOR_GENERATION_FAILED,
                    node.name(),
                    node.namespace(),
                    &[hierarchy.get(*ancestor).name()],
                ),
            ));
        }
    }
}

// =============================================================================
// Settings dispatch
// =============================================================================

enum PatternSettings {
    With(WitherSettings),
    Describe(DescribeSettings),
}

fn parse_settings(
    pattern: PatternKind,
    request: &PatternRequest,
    options: &GlobalOptions,
) -> Result<PatternSettings, &'static str> {
    match pattern {
        PatternKind::With => WitherSettings::from_args(&request.args, options)
            .map(PatternSettings::With)
            .map_err(|e| e.expected),
        PatternKind::Describe => DescribeSettings::from_args(&request.args)
            .map(PatternSettings::Describe)
            .map_err(|e| e.expected),
    }
}

fn render_fragment(
    hierarchy: &Hierarchy,
    pattern: PatternKind,
    id: TypeId,
    node: &TypeNode,
    resolved: &ResolvedNode,
    settings: &PatternSettings,
) -> GeneratedFragment {
    let mut attributes = Vec::new();
    let members = match settings {
        PatternSettings::With(settings) => {
            emit_wither_members(node, resolved, &settings.emit_config())
        }
        PatternSettings::Describe(settings) => {
            if settings.add_debugger_display_attribute {
                attributes.push(DEBUGGER_DISPLAY_ATTRIBUTE.to_string());
            }
            let is_derived = hierarchy.parent_of(id).is_some();
            emit_describe_members(node, is_derived, settings)
        }
    };

    GeneratedFragment {
        pattern,
        type_name: node.name().to_string(),
        namespace: node.namespace().to_string(),
        kind: node.decl.kind,
        is_abstract: node.decl.is_abstract,
        is_sealed: node.decl.is_sealed,
        attributes,
        members,
    }
}

// =============================================================================
// Merge
// =============================================================================

const fn pattern_rank(pattern: PatternKind) -> u8 {
    match pattern {
        PatternKind::With => 0,
        PatternKind::Describe => 1,
    }
}

fn merge_outputs(outputs: Vec<FamilyOutput>) -> GenerationOutcome {
    let mut fragments: Vec<(TypeId, GeneratedFragment)> = Vec::new();
    let mut diagnostics: Vec<(TypeId, Diagnostic)> = Vec::new();
    for output in outputs {
        fragments.extend(output.fragments);
        diagnostics.extend(output.diagnostics);
    }

    fragments.sort_by_key(|(id, fragment)| (id.index(), pattern_rank(fragment.pattern)));
    diagnostics.sort_by_key(|(id, _)| id.index());

    // Several families can point at the same missing base; report it once.
    let mut seen_bases: FxHashSet<(PatternKind, String, String)> = FxHashSet::default();
    let diagnostics = diagnostics
        .into_iter()
        .map(|(_, diagnostic)| diagnostic)
        .filter(|diagnostic| {
            diagnostic.code != diagnostic_codes::BASE_TYPE_NOT_ANNOTATED
                || seen_bases.insert((
                    diagnostic.pattern,
                    diagnostic.subject_name.clone(),
                    diagnostic.subject_namespace.clone(),
                ))
        })
        .collect();

    GenerationOutcome {
        fragments: fragments
            .into_iter()
            .map(|(_, fragment)| fragment)
            .collect(),
        diagnostics,
    }
}
