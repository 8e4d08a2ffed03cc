use lintel_syntax::{Field, NodeRef, TextRange};

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::fix::Fix;
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct Semi;

static META: RuleMeta = RuleMeta {
    name: "semi",
    description: "Require semicolons instead of automatic semicolon insertion.",
    categories: "style",
    default_status: DefaultStatus::Disabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::Fixable,
    schema: &[],
};

const STATEMENTS: &str = "VariableDeclaration, ExpressionStatement, ReturnStatement, \
    ThrowStatement, DoWhileStatement, DebuggerStatement, BreakStatement, ContinueStatement, \
    ImportDeclaration";

/// ## What it does
///
/// Checks for statements that rely on automatic semicolon insertion.
///
/// ## Why is this bad?
///
/// A newline only ends a statement when the next line can't continue it. A
/// line starting with `(`, `[` or a template is glued to the previous one,
/// which is rarely what the author meant.
///
/// ## Example
///
/// ```js
/// var name = "ESLint"
/// let object = {}
/// ```
///
/// Use instead:
/// ```js
/// var name = "ESLint";
/// let object = {};
/// ```
impl Rule for Semi {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        Ok(Listeners::new().on(STATEMENTS, move |node| {
            if is_loop_head(node) {
                return Ok(());
            }
            let Some(last) = context.tree().last_token(node.range()) else {
                return Ok(());
            };
            if last.text(context.source()) == ";" {
                return Ok(());
            }
            context.report(
                Report::new(node, "Missing semicolon.")
                    .with_range(TextRange::empty(last.range.end()))
                    .fix(Fix::insert_after(last.range, ";")),
            );
            Ok(())
        }))
    }
}

/// `for (let i = 0; ...)` and `for (const x of xs)` declare in the loop head,
/// where the loop syntax provides the separators.
fn is_loop_head(node: NodeRef<'_>) -> bool {
    node.parent().is_some_and(|parent| parent.kind().is_loop())
        && matches!(node.parent_field(), Some(Field::Init | Field::Left))
}
