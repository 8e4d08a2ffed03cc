use lintel_scope::{ScopeKind, ScopeManager, pattern_identifiers};
use lintel_syntax::{Field, NodeKind, NodeRef};

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::fix::Fix;
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct NoVar;

static META: RuleMeta = RuleMeta {
    name: "no-var",
    description: "Require `let` or `const` instead of `var`.",
    categories: "style",
    default_status: DefaultStatus::Disabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::Fixable,
    schema: &[],
};

/// ## What it does
///
/// Checks for `var` declarations.
///
/// ## Why is this bad?
///
/// `var` is scoped to the whole function and hoisted, so a variable
/// declared in a block leaks out of it. `let` and `const` are scoped to the
/// block they are declared in.
///
/// `var` is only replaced by `let` when the two behave the same: the
/// variable is not global, not redeclared, not used before its declaration
/// or outside its block, and not captured by a closure inside a loop.
///
/// ## Example
///
/// ```js
/// function f() {
///   var x = 1;
///   return x;
/// }
/// ```
///
/// Use instead:
/// ```js
/// function f() {
///   let x = 1;
///   return x;
/// }
/// ```
impl Rule for NoVar {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        Ok(Listeners::new().on(r#"VariableDeclaration[kind="var"]"#, move |node| {
            let fix = if can_become_let(node, context.scopes()) {
                context
                    .tree()
                    .first_token(node.range())
                    .map(|keyword| Fix::replace(keyword.range, "let"))
            } else {
                None
            };
            context.report(
                Report::new(node, "Unexpected var, use let or const instead.").with_fix(fix),
            );
            Ok(())
        }))
    }
}

fn can_become_let(declaration: NodeRef<'_>, scopes: &ScopeManager) -> bool {
    let Some(parent) = declaration.parent() else {
        return false;
    };
    let is_loop_head = parent.kind().is_loop()
        && matches!(declaration.parent_field(), Some(Field::Init | Field::Left));
    if !is_loop_head && !matches!(parent.kind(), NodeKind::Program | NodeKind::BlockStatement) {
        return false;
    }

    let enclosing_loop = declaration
        .ancestors()
        .take_while(|ancestor| !ancestor.kind().is_function())
        .find(|ancestor| ancestor.kind().is_loop());

    for declarator in declaration.fields(Field::Declarations) {
        if enclosing_loop.is_some() && !is_loop_head && declarator.field(Field::Init).is_none() {
            // `let x;` is reset on every iteration, `var x;` keeps its value.
            return false;
        }
        let Some(id) = declarator.field(Field::Id) else {
            return false;
        };
        for identifier in pattern_identifiers(id) {
            let Some(variable) = scopes.variable_of(identifier.id()) else {
                return false;
            };
            let variable = scopes.variable(variable);
            if scopes.scope(variable.scope).kind == ScopeKind::Global
                || variable.defs.len() > 1
                || variable.name == "let"
            {
                return false;
            }

            for reference in &variable.references {
                let reference = scopes.reference(*reference);
                let used = declaration.tree().node(reference.identifier);
                if !used.is_within(parent) {
                    return false;
                }
                if !reference.init && used.range().start() < declaration.range().end() {
                    return false;
                }
                if let Some(enclosing_loop) = enclosing_loop
                    && used
                        .ancestors()
                        .take_while(|ancestor| *ancestor != enclosing_loop)
                        .any(|ancestor| ancestor.kind().is_function())
                {
                    return false;
                }
            }
        }
    }
    true
}
