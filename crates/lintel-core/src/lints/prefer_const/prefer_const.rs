use lintel_scope::{DefinitionKind, ScopeManager, Variable, pattern_identifiers};
use lintel_syntax::{Field, NodeId, NodeKind, NodeRef, Tree};
use rustc_hash::FxHashSet;

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::fix::Fix;
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct PreferConst;

static META: RuleMeta = RuleMeta {
    name: "prefer-const",
    description: "Require `const` for variables that are never reassigned.",
    categories: "style",
    default_status: DefaultStatus::Disabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::Fixable,
    schema: &[],
};

/// ## What it does
///
/// Checks for `let` variables that are initialized in their declaration and
/// never assigned again.
///
/// ## Why is this bad?
///
/// `const` tells the reader the binding won't change, and turns an
/// accidental reassignment into an error.
///
/// The declaration is only rewritten when every variable it declares
/// qualifies. `let a = 1, b = 2; b++;` is reported for `a` but left as is.
///
/// ## Example
///
/// ```js
/// let a = 3;
/// console.log(a);
///
/// for (let item of items) {
///   console.log(item);
/// }
/// ```
///
/// Use instead:
/// ```js
/// const a = 3;
/// console.log(a);
///
/// for (const item of items) {
///   console.log(item);
/// }
/// ```
impl Rule for PreferConst {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        Ok(Listeners::new().on("Program:exit", move |_| {
            let scopes = context.scopes();
            let tree = context.tree();

            let mut candidates: Vec<NodeRef<'_>> = scopes
                .variables()
                .filter_map(|(_, variable)| never_reassigned(tree, scopes, variable))
                .collect();
            candidates.sort_by_key(|identifier| identifier.range().start());

            let mut seen: FxHashSet<NodeId> = FxHashSet::default();
            for identifier in &candidates {
                let Some(declaration) = identifier
                    .ancestors()
                    .find(|ancestor| ancestor.kind() == NodeKind::VariableDeclaration)
                else {
                    continue;
                };

                // The first report of a declaration carries its fix.
                let fix = if seen.insert(declaration.id()) && can_fix(declaration, &candidates) {
                    tree.first_token(declaration.range())
                        .map(|keyword| Fix::replace(keyword.range, "const"))
                } else {
                    None
                };

                let message = "'{{ name }}' is never reassigned. Use 'const' instead.";
                context.report(
                    Report::new(declaration, message)
                        .with_range(identifier.range())
                        .data("name", identifier.text())
                        .with_fix(fix),
                );
            }
            Ok(())
        }))
    }
}

/// The declared identifier of a `let` variable whose only write is its
/// initialization.
fn never_reassigned<'t>(
    tree: &'t Tree,
    scopes: &ScopeManager,
    variable: &Variable,
) -> Option<NodeRef<'t>> {
    let [definition] = variable.defs.as_slice() else {
        return None;
    };
    if definition.kind != DefinitionKind::Let {
        return None;
    }

    let mut writes = variable
        .references
        .iter()
        .map(|id| scopes.reference(*id))
        .filter(|reference| reference.is_write());
    match (writes.next(), writes.next()) {
        (Some(write), None) if write.init => Some(tree.node(definition.name)),
        _ => None,
    }
}

fn can_fix(declaration: NodeRef<'_>, candidates: &[NodeRef<'_>]) -> bool {
    let in_for_in_of = declaration.parent_field() == Some(Field::Left);

    declaration.fields(Field::Declarations).all(|declarator| {
        (in_for_in_of || declarator.field(Field::Init).is_some())
            && declarator.field(Field::Id).is_some_and(|id| {
                pattern_identifiers(id)
                    .iter()
                    .all(|identifier| candidates.contains(identifier))
            })
    })
}
