use lintel_syntax::{NodeKind, NodeRef};

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::rule_options::{OptionDefault, OptionKind, OptionSpec};
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct NoUndef;

static META: RuleMeta = RuleMeta {
    name: "no-undef",
    description: "Disallow the use of undeclared variables.",
    categories: "correctness",
    default_status: DefaultStatus::Enabled,
    default_severity: Severity::Error,
    fix_status: FixStatus::None,
    schema: &[OptionSpec {
        name: "typeof",
        kind: OptionKind::Bool,
        default: OptionDefault::Bool(false),
        description: "Also report undeclared identifiers used as the operand of `typeof`.",
    }],
};

/// ## What it does
///
/// Checks for identifiers that are neither declared in the file nor provided
/// by the configured environments and globals.
///
/// ## Why is this bad?
///
/// An undeclared identifier is either a typo or a global the linter wasn't
/// told about. Reading it throws a `ReferenceError`, and assigning to it
/// silently creates a property on the global object.
///
/// `typeof x` is allowed by default since it is the usual way to test
/// whether a global exists.
///
/// ## Example
///
/// ```js
/// var foo = someFunction();
/// bar = 10;
/// ```
///
/// Use instead:
/// ```js
/// import { someFunction } from "./some";
/// var foo = someFunction();
/// let bar = 10;
/// ```
impl Rule for NoUndef {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        let check_typeof = context.options().get_bool("typeof").unwrap_or(false);

        Ok(Listeners::new().on("Program:exit", move |_| {
            let scopes = context.scopes();
            for id in scopes.through() {
                let reference = scopes.reference(*id);
                let identifier = context.tree().node(reference.identifier);
                if !check_typeof && is_typeof_operand(identifier) {
                    continue;
                }
                context.report(
                    Report::new(identifier, "'{{ name }}' is not defined.")
                        .data("name", &reference.name),
                );
            }
            Ok(())
        }))
    }
}

fn is_typeof_operand(identifier: NodeRef<'_>) -> bool {
    identifier.parent().is_some_and(|parent| {
        parent.kind() == NodeKind::UnaryExpression && parent.detail().operator() == Some("typeof")
    })
}
