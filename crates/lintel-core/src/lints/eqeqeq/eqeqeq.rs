use lintel_syntax::{Detail, Field, NodeKind, NodeRef, TextRange};

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::fix::Fix;
use crate::rule_options::{OptionDefault, OptionKind, OptionSpec};
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};
use crate::utils::find_token;

pub struct Eqeqeq;

static META: RuleMeta = RuleMeta {
    name: "eqeqeq",
    description: "Require `===` and `!==`.",
    categories: "suspicious",
    default_status: DefaultStatus::Enabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::Fixable,
    schema: &[OptionSpec {
        name: "null",
        kind: OptionKind::Enum(&["always", "ignore"]),
        default: OptionDefault::String("always"),
        description: "Whether comparisons with `null` are reported too.",
    }],
};

/// ## What it does
///
/// Checks for `==` and `!=`.
///
/// ## Why is this bad?
///
/// The loose operators convert their operands before comparing them, with
/// rules few people remember: `[] == false` and `"0" == false` are both true.
///
/// The operator is only replaced when both versions are known to behave the
/// same: a comparison between two literals of the same type, or with a
/// `typeof` expression.
///
/// ## Options
///
/// - `null` (`"always"` or `"ignore"`, default `"always"`): with `"ignore"`,
///   `x == null` is allowed since it is a common way to test for both `null`
///   and `undefined`.
///
/// ## Example
///
/// ```js
/// if (typeof foo == "undefined") {}
/// if (x != y) {}
/// ```
///
/// Use instead:
/// ```js
/// if (typeof foo === "undefined") {}
/// if (x !== y) {}
/// ```
impl Rule for Eqeqeq {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        let ignore_null = context.options().get_str("null") == Some("ignore");

        Ok(Listeners::new().on(
            r#"BinaryExpression[operator="=="], BinaryExpression[operator="!="]"#,
            move |node| {
                let (Some(left), Some(right)) = (node.field(Field::Left), node.field(Field::Right))
                else {
                    return Ok(());
                };
                if ignore_null && (is_null(left) || is_null(right)) {
                    return Ok(());
                }

                let actual = node.detail().operator().unwrap_or("==");
                let expected = if actual == "==" { "===" } else { "!==" };
                let between = TextRange::new(left.range().end(), right.range().start());
                let operator = find_token(context.tree(), between, actual)
                    .map_or(node.range(), |token| token.range);

                let safe = is_typeof(left)
                    || is_typeof(right)
                    || are_same_type_literals(left, right);
                let fix = safe.then(|| Fix::replace(operator, expected));

                context.report(
                    Report::new(node, "Expected '{{ expected }}' and instead saw '{{ actual }}'.")
                        .with_range(operator)
                        .data("expected", expected)
                        .data("actual", actual)
                        .with_fix(fix),
                );
                Ok(())
            },
        ))
    }
}

fn is_null(node: NodeRef<'_>) -> bool {
    node.kind() == NodeKind::Literal && node.text() == "null"
}

fn is_typeof(node: NodeRef<'_>) -> bool {
    node.kind() == NodeKind::UnaryExpression && node.detail().operator() == Some("typeof")
}

fn are_same_type_literals(left: NodeRef<'_>, right: NodeRef<'_>) -> bool {
    match (left.detail(), right.detail()) {
        (Detail::Literal(left), Detail::Literal(right)) => left == right,
        _ => false,
    }
}
