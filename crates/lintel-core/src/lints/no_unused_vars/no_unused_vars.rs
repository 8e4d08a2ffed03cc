use anyhow::Context;
use lintel_scope::{DefinitionKind, ScopeKind, ScopeManager, Variable};
use lintel_syntax::{Field, NodeId, NodeKind, NodeRef, Tree};
use regex::Regex;

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::rule_options::{OptionDefault, OptionKind, OptionSpec, RuleOptions};
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct NoUnusedVars;

static META: RuleMeta = RuleMeta {
    name: "no-unused-vars",
    description: "Disallow variables that are declared but never read.",
    categories: "correctness",
    default_status: DefaultStatus::Enabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::None,
    schema: &[
        OptionSpec {
            name: "vars",
            kind: OptionKind::Enum(&["all", "local"]),
            default: OptionDefault::String("all"),
            description: "`local` only checks variables declared inside functions and blocks.",
        },
        OptionSpec {
            name: "args",
            kind: OptionKind::Enum(&["all", "none"]),
            default: OptionDefault::String("all"),
            description: "`none` never reports function parameters.",
        },
        OptionSpec {
            name: "vars-ignore-pattern",
            kind: OptionKind::String,
            default: OptionDefault::String(""),
            description: "Variables whose name matches this regular expression are not reported.",
        },
    ],
};

/// ## What it does
///
/// Checks for variables, functions and parameters that are never read.
///
/// ## Why is this bad?
///
/// Unused bindings are usually left over from a refactor, or point to a bug
/// where the wrong variable is used instead. In both cases they make the
/// code harder to follow.
///
/// A variable only written to (`x = 1`, `x++`) is not used. Neither is a
/// function whose only caller is itself.
///
/// Catch clause parameters and the names of function and class expressions
/// are never reported.
///
/// ## Options
///
/// - `vars` (`"all"` or `"local"`, default `"all"`)
/// - `args` (`"all"` or `"none"`, default `"all"`)
/// - `vars-ignore-pattern` (regular expression, default `""`): variables
///   matching the pattern are skipped. Parameters are not affected.
///
/// ## Example
///
/// ```js
/// var unused = 1;
/// let counter = 0;
/// counter += 1;
/// function fact(n) { return n < 2 ? 1 : n * fact(n - 1); }
/// ```
impl Rule for NoUnusedVars {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn validate(&self, options: &RuleOptions) -> anyhow::Result<()> {
        ignore_pattern(options)?;
        Ok(())
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        let local_only = context.options().get_str("vars") == Some("local");
        let skip_args = context.options().get_str("args") == Some("none");
        let ignore = ignore_pattern(context.options())?;

        Ok(Listeners::new().on("Program:exit", move |_| {
            let scopes = context.scopes();
            let tree = context.tree();

            for (_, variable) in scopes.variables() {
                let Some(first) = variable.defs.first() else {
                    continue;
                };
                let scope_kind = scopes.scope(variable.scope).kind;
                // A class's own name, as seen from its body.
                if scope_kind == ScopeKind::Class {
                    continue;
                }
                if local_only && scope_kind == ScopeKind::Global {
                    continue;
                }
                let is_parameter = first.kind == DefinitionKind::Parameter;
                if is_parameter && skip_args {
                    continue;
                }
                if !is_parameter
                    && ignore.as_ref().is_some_and(|regex| regex.is_match(&variable.name))
                {
                    continue;
                }
                if variable.defs.iter().any(|def| is_exempt(tree, def.kind, def.node)) {
                    continue;
                }
                if is_used(tree, scopes, variable) {
                    continue;
                }

                let assigned = variable
                    .references
                    .iter()
                    .any(|id| scopes.reference(*id).is_write());
                let message = if assigned {
                    "'{{ name }}' is assigned a value but never used."
                } else {
                    "'{{ name }}' is defined but never used."
                };
                context.report(
                    Report::new(tree.node(first.name), message).data("name", &variable.name),
                );
            }
            Ok(())
        }))
    }
}

fn ignore_pattern(options: &RuleOptions) -> anyhow::Result<Option<Regex>> {
    match options.get_str("vars-ignore-pattern") {
        Some(pattern) if !pattern.is_empty() => Regex::new(pattern)
            .map(Some)
            .context("invalid `vars-ignore-pattern`"),
        _ => Ok(None),
    }
}

fn is_exempt(tree: &Tree, kind: DefinitionKind, node: NodeId) -> bool {
    match kind {
        DefinitionKind::CatchClause => true,
        DefinitionKind::FunctionName | DefinitionKind::ClassName => matches!(
            tree.node(node).kind(),
            NodeKind::FunctionExpression | NodeKind::ClassExpression
        ),
        _ => false,
    }
}

fn is_used(tree: &Tree, scopes: &ScopeManager, variable: &Variable) -> bool {
    let functions: Vec<NodeRef<'_>> = variable
        .defs
        .iter()
        .filter(|def| def.kind == DefinitionKind::FunctionName)
        .map(|def| tree.node(def.node))
        .collect();

    variable.references.iter().any(|id| {
        let reference = scopes.reference(*id);
        let identifier = tree.node(reference.identifier);
        reference.is_read()
            && !(reference.is_write() && is_self_update(identifier))
            && !functions.iter().any(|function| identifier.is_within(*function))
    })
}

/// `x++;` or `x += 1;` as a statement of its own reads `x` only to write it
/// back.
fn is_self_update(identifier: NodeRef<'_>) -> bool {
    let Some(parent) = identifier.parent() else {
        return false;
    };
    let updates = match parent.kind() {
        NodeKind::UpdateExpression => true,
        NodeKind::AssignmentExpression => identifier.parent_field() == Some(Field::Left),
        _ => false,
    };
    updates
        && parent
            .parent()
            .is_some_and(|statement| statement.kind() == NodeKind::ExpressionStatement)
}
