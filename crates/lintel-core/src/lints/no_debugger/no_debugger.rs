use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::fix::Fix;
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};
use crate::utils::{is_in_statement_list, removal_range};

pub struct NoDebugger;

static META: RuleMeta = RuleMeta {
    name: "no-debugger",
    description: "Disallow `debugger` statements.",
    categories: "correctness",
    default_status: DefaultStatus::Enabled,
    default_severity: Severity::Error,
    fix_status: FixStatus::Fixable,
    schema: &[],
};

/// ## What it does
///
/// Checks for `debugger` statements.
///
/// ## Why is this bad?
///
/// `debugger` pauses execution when developer tools are open. It is useful
/// while debugging but should not be left in code that ships.
///
/// The statement is removed, along with its line when nothing else is on it.
/// It is kept when removing it would leave a statement without a body, as in
/// `if (x) debugger;`.
///
/// ## Example
///
/// ```js
/// function isTruthy(x) {
///     debugger;
///     return Boolean(x);
/// }
/// ```
///
/// Use instead:
/// ```js
/// function isTruthy(x) {
///     return Boolean(x);
/// }
/// ```
impl Rule for NoDebugger {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        Ok(Listeners::new().on("DebuggerStatement", move |node| {
            let fix = is_in_statement_list(node)
                .then(|| Fix::remove(removal_range(context.source(), node.range())).unbounded());
            context.report(Report::new(node, "Unexpected 'debugger' statement.").with_fix(fix));
            Ok(())
        }))
    }
}
