use lintel_scope::Ambient;

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::rule_options::{OptionDefault, OptionKind, OptionSpec};
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct NoGlobalAssign;

static META: RuleMeta = RuleMeta {
    name: "no-global-assign",
    description: "Disallow assignments to read-only globals.",
    categories: "correctness",
    default_status: DefaultStatus::Enabled,
    default_severity: Severity::Error,
    fix_status: FixStatus::None,
    schema: &[OptionSpec {
        name: "exceptions",
        kind: OptionKind::StringList,
        default: OptionDefault::StringList(&[]),
        description: "Read-only globals that may be assigned anyway.",
    }],
};

/// ## What it does
///
/// Checks for assignments to globals that are marked read-only, such as
/// built-in objects or the `readonly` entries of `[lint.globals]`.
///
/// ## Why is this bad?
///
/// Overwriting `undefined`, `Object` or `window` affects every script
/// sharing the global object, and in strict mode the assignment throws.
///
/// Declaring a variable of the same name shadows the global, which is
/// allowed.
///
/// ## Example
///
/// ```js
/// Object = null;
/// undefined = 1;
/// ```
impl Rule for NoGlobalAssign {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        let exceptions = context.options().get_list("exceptions").unwrap_or_default();

        Ok(Listeners::new().on("Program:exit", move |_| {
            let scopes = context.scopes();
            for (_, variable) in scopes.variables() {
                if variable.ambient != Some(Ambient::ReadOnly)
                    || variable.is_declared()
                    || exceptions.contains(&variable.name)
                {
                    continue;
                }
                for id in &variable.references {
                    let reference = scopes.reference(*id);
                    if !reference.is_write() || reference.init {
                        continue;
                    }
                    context.report(
                        Report::new(
                            context.tree().node(reference.identifier),
                            "Read-only global '{{ name }}' should not be modified.",
                        )
                        .data("name", &variable.name),
                    );
                }
            }
            Ok(())
        }))
    }
}
