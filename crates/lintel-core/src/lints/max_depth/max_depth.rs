use std::cell::RefCell;
use std::rc::Rc;

use lintel_syntax::{Field, NodeKind, NodeRef};

use crate::checker::{Report, RuleContext};
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::rule_options::{OptionDefault, OptionKind, OptionSpec};
use crate::rule_table::{DefaultStatus, FixStatus, Rule, RuleMeta};

pub struct MaxDepth;

const DEFAULT_MAX: i64 = 4;

static META: RuleMeta = RuleMeta {
    name: "max-depth",
    description: "Limit how deeply blocks can be nested.",
    categories: "complexity",
    default_status: DefaultStatus::Disabled,
    default_severity: Severity::Warn,
    fix_status: FixStatus::None,
    schema: &[OptionSpec {
        name: "max",
        kind: OptionKind::Integer,
        default: OptionDefault::Integer(DEFAULT_MAX),
        description: "Deepest nesting allowed.",
    }],
};

const MESSAGE: &str = "Blocks are nested too deeply ({{ depth }}). Maximum allowed is {{ max }}.";

const BLOCKS: &str = "IfStatement, WhileStatement, DoWhileStatement, ForStatement, \
    ForInStatement, ForOfStatement, TryStatement";
const BLOCKS_EXIT: &str = "IfStatement:exit, WhileStatement:exit, DoWhileStatement:exit, \
    ForStatement:exit, ForInStatement:exit, ForOfStatement:exit, TryStatement:exit";
const FUNCTIONS: &str = "FunctionDeclaration, FunctionExpression, ArrowFunctionExpression";
const FUNCTIONS_EXIT: &str =
    "FunctionDeclaration:exit, FunctionExpression:exit, ArrowFunctionExpression:exit";

/// ## What it does
///
/// Checks for control flow statements nested more than `max` levels deep
/// (4 by default). Every function starts again from zero, and `else if`
/// doesn't count as a new level.
///
/// ## Why is this bad?
///
/// Deeply nested code is hard to read. Early returns or helper functions
/// usually flatten it.
///
/// ## Example
///
/// ```js
/// function process(items) {
///   for (const item of items) {
///     if (item) {
///       while (item.next) {
///         if (item.ready) {
///           if (item.valid) {}
///         }
///       }
///     }
///   }
/// }
/// ```
impl Rule for MaxDepth {
    fn meta(&self) -> &'static RuleMeta {
        &META
    }

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
        let max = context.options().get_integer("max").unwrap_or(DEFAULT_MAX);
        // One counter per function being visited, the program included.
        let depths = Rc::new(RefCell::new(vec![0_i64]));

        let enter_block = {
            let depths = Rc::clone(&depths);
            move |node: NodeRef<'a>| -> anyhow::Result<()> {
                if is_else_if(node) {
                    return Ok(());
                }
                if let Some(depth) = depths.borrow_mut().last_mut() {
                    *depth += 1;
                    if *depth > max {
                        context.report(
                            Report::new(node, MESSAGE).data("depth", *depth).data("max", max),
                        );
                    }
                }
                Ok(())
            }
        };
        let exit_block = {
            let depths = Rc::clone(&depths);
            move |node: NodeRef<'a>| -> anyhow::Result<()> {
                if !is_else_if(node)
                    && let Some(depth) = depths.borrow_mut().last_mut()
                {
                    *depth -= 1;
                }
                Ok(())
            }
        };
        let enter_function = {
            let depths = Rc::clone(&depths);
            move |_: NodeRef<'a>| -> anyhow::Result<()> {
                depths.borrow_mut().push(0);
                Ok(())
            }
        };
        let exit_function = move |_: NodeRef<'a>| -> anyhow::Result<()> {
            depths.borrow_mut().pop();
            Ok(())
        };

        Ok(Listeners::new()
            .on(BLOCKS, enter_block)
            .on(BLOCKS_EXIT, exit_block)
            .on(FUNCTIONS, enter_function)
            .on(FUNCTIONS_EXIT, exit_function))
    }
}

fn is_else_if(node: NodeRef<'_>) -> bool {
    node.kind() == NodeKind::IfStatement
        && node.parent_field() == Some(Field::Alternate)
        && node.parent().is_some_and(|parent| parent.kind() == NodeKind::IfStatement)
}
