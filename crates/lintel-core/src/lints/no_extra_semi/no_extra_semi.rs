use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::fix::Fix;
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};
use crate::utils::is_in_statement_list;

pub struct NoExtraSemi;

static META: RuleMeta = RuleMeta {
    name: "no-extra-semi",
    description: "Disallow unnecessary semicolons.",
    categories: "style",
    default_status: DefaultStatus::Enabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::Fixable,
    schema: &[],
};

/// ## What it does
///
/// Checks for semicolons that don't end a statement, such as the one after
/// a function declaration or a doubled `;;`.
///
/// Empty statements used as the body of a loop or an `if` are left alone.
///
/// ## Example
///
/// ```js
/// var x = 5;;
///
/// function foo() {
///     // code
/// };
/// ```
///
/// Use instead:
/// ```js
/// var x = 5;
///
/// function foo() {
///     // code
/// }
/// ```
impl Rule for NoExtraSemi {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        Ok(Listeners::new().on("EmptyStatement", move |node| {
            if !is_in_statement_list(node) {
                return Ok(());
            }
            // Several semicolons in a row are removed in the same pass.
            let fix = Fix::remove(node.range()).compatible();
            context.report(Report::new(node, "Unnecessary semicolon.").fix(fix));
            Ok(())
        }))
    }
}
