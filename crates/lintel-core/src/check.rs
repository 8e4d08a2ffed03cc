//! The lint and fix cycle of a single source text.
//!
//! ```text
//! Parsing -> Analyzing -> Dispatching -> Collecting -> Fixing -> Parsing ...
//!                                                          \-> Converged
//! ```
//!
//! Every cycle starts from the text alone: the tree, the scopes and the
//! suppression directives are rebuilt from scratch. Only the text and the
//! pass counter carry over from one cycle to the next.

use lintel_scope::{Globals, ScopeManager, analyze};
use lintel_syntax::{LineIndex, ParseError, TextRange, Tree};

use crate::checker::{Checker, Report, RuleContext};
use crate::config::Config;
use crate::diagnostic::{Problem, Severity};
use crate::dispatch::Dispatcher;
use crate::error::{ConfigError, EngineError};
use crate::fix::apply_fixes;
use crate::rule_set::ActiveRuleSet;
use crate::suppression::SuppressionManager;

pub const DEFAULT_MAX_PASSES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
    /// Apply fixes and relint until nothing changes.
    pub fix: bool,
    /// Upper bound on the number of fixing passes.
    pub max_passes: usize,
    pub globals: Globals,
    /// Severity of the problems about suppression comments, `Off` to skip
    /// them.
    pub unused_directives: Severity,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            fix: false,
            max_passes: DEFAULT_MAX_PASSES,
            globals: Globals::builtin(),
            unused_directives: Severity::Warn,
        }
    }
}

impl LintOptions {
    pub fn from_config(config: &Config) -> Self {
        let defaults = Self::default();
        Self {
            fix: false,
            max_passes: config.lint.max_passes.unwrap_or(defaults.max_passes),
            globals: config.globals(),
            unused_directives: config.lint.unused_directives.unwrap_or(defaults.unused_directives),
        }
    }

    pub fn with_fix(mut self, fix: bool) -> Self {
        self.fix = fix;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    /// Problems of the final text, ordered by position.
    pub problems: Vec<Problem>,
    /// The fixed text, if fixing was requested and changed anything.
    pub output: Option<String>,
    /// Fixing stopped at the pass bound with fixable problems left.
    pub fix_not_converged: bool,
    /// Number of passes that applied fixes.
    pub passes: usize,
    pub config_errors: Vec<ConfigError>,
}

impl LintResult {
    pub fn has_fatal(&self) -> bool {
        self.problems.iter().any(|problem| problem.fatal)
    }
}

enum State {
    Parsing,
    Analyzing(Tree),
    Dispatching(Tree, ScopeManager),
    Collecting(Tree, Vec<Vec<Report>>),
    Fixing(Vec<Problem>),
    Converged(Vec<Problem>),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Parsing => "parsing",
            State::Analyzing(..) => "analyzing",
            State::Dispatching(..) => "dispatching",
            State::Collecting(..) => "collecting",
            State::Fixing(..) => "fixing",
            State::Converged(..) => "converged",
        }
    }
}

/// Lint `source` with `rules`, fixing it if `options.fix` is set.
///
/// With fixing, the text goes through at most `options.max_passes` fixing
/// passes. The text a pass produces is always linted once more, so the
/// returned problems describe the returned text.
pub fn lint(
    source: &str,
    rules: &ActiveRuleSet,
    options: &LintOptions,
) -> Result<LintResult, EngineError> {
    let mut text = source.to_string();
    let mut passes = 0;
    let mut state = State::Parsing;

    let problems = loop {
        tracing::debug!(state = state.name(), pass = passes, "Lint cycle");

        state = match state {
            State::Parsing => match Tree::parse(text.as_str()) {
                Ok(tree) => State::Analyzing(tree),
                Err(error) => State::Converged(vec![parse_error_problem(&text, &error)]),
            },
            State::Analyzing(tree) => {
                let scopes = analyze(&tree, &options.globals);
                State::Dispatching(tree, scopes)
            }
            State::Dispatching(tree, scopes) => {
                let reports = dispatch(&tree, &scopes, rules)?;
                State::Collecting(tree, reports)
            }
            State::Collecting(tree, reports) => {
                let problems = collect(&tree, rules, reports, options.unused_directives);
                if options.fix && passes < options.max_passes {
                    State::Fixing(problems)
                } else {
                    State::Converged(problems)
                }
            }
            State::Fixing(problems) => {
                let outcome = apply_fixes(&problems, &text);
                tracing::debug!(
                    pass = passes + 1,
                    applied = outcome.applied.len(),
                    rejected = outcome.rejected.len(),
                    invalid = outcome.invalid.len(),
                    "Applied fixes"
                );
                if outcome.made_progress() {
                    passes += 1;
                    text = outcome.text;
                    State::Parsing
                } else {
                    State::Converged(problems)
                }
            }
            State::Converged(problems) => break problems,
        };
    };

    let fix_not_converged =
        options.fix && passes >= options.max_passes && problems.iter().any(Problem::has_fix);
    if fix_not_converged {
        tracing::debug!(passes, "Fixes did not converge");
    }

    Ok(LintResult {
        problems,
        output: (passes > 0).then_some(text),
        fix_not_converged,
        passes,
        config_errors: rules.config_errors().to_vec(),
    })
}

/// Run the listeners of every rule over `tree`. Returns the reports of each
/// rule, in rule order.
fn dispatch(
    tree: &Tree,
    scopes: &ScopeManager,
    rules: &ActiveRuleSet,
) -> Result<Vec<Vec<Report>>, EngineError> {
    let contexts: Vec<RuleContext> = rules
        .iter()
        .map(|active| RuleContext::new(active.meta(), &active.options, tree, scopes))
        .collect();

    {
        let mut listeners = Vec::with_capacity(contexts.len());
        for (active, context) in rules.iter().zip(&contexts) {
            let rule_listeners = active.rule.create(context).map_err(|source| {
                EngineError::RuleSetup { rule: active.name().to_string(), source }
            })?;
            listeners.push((active.name(), rule_listeners));
        }

        let mut dispatcher = Dispatcher::new(listeners)?;
        dispatcher.run(tree)?;
    }

    Ok(contexts.into_iter().map(RuleContext::into_reports).collect())
}

fn collect(
    tree: &Tree,
    rules: &ActiveRuleSet,
    reports: Vec<Vec<Report>>,
    unused_directives: Severity,
) -> Vec<Problem> {
    let suppressions = SuppressionManager::from_tree(tree, |name| rules.is_known(name));
    let mut checker = Checker::new(tree);
    for (index, (active, reports)) in rules.iter().zip(reports).enumerate() {
        checker.report_diagnostics(index, active.meta(), active.severity, reports);
    }
    checker.finish(suppressions, unused_directives)
}

fn parse_error_problem(text: &str, error: &ParseError) -> Problem {
    let offset = error.offset.min(text.len());
    let location = LineIndex::new(text).line_col(text, offset);
    tracing::debug!(%error, offset, "Parse failure");
    Problem {
        rule: None,
        severity: Severity::Error,
        message: format!("Parsing error: {error}"),
        help: None,
        range: TextRange::empty(offset),
        start: location,
        end: location,
        fix: None,
        fatal: true,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lintel_syntax::NodeRef;

    use super::*;
    use crate::dispatch::Listeners;
    use crate::fix::Fix;
    use crate::rule_set::ActiveRule;
    use crate::rule_table::{DefaultStatus, FixStatus, Registry, Rule, RuleMeta};

    const fn meta(name: &'static str) -> RuleMeta {
        RuleMeta {
            name,
            description: "Test rule.",
            categories: "test",
            default_status: DefaultStatus::Enabled,
            default_severity: Severity::Warn,
            fix_status: FixStatus::Fixable,
            schema: &[],
        }
    }

    /// Renames `a` to `b` and `b` to `a`, so fixing never settles.
    struct Swap;

    static SWAP: RuleMeta = meta("swap");

    impl Rule for Swap {
        fn meta(&self) -> &'static RuleMeta {
            &SWAP
        }

        fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
            Ok(Listeners::new().on("Identifier", move |node: NodeRef<'a>| {
                let replacement = match node.text() {
                    "a" => "b",
                    "b" => "a",
                    _ => return Ok(()),
                };
                context.report(
                    Report::new(node, "Swap me.").fix(Fix::replace(node.range(), replacement)),
                );
                Ok(())
            }))
        }
    }

    /// Fails on the first `throw` statement.
    struct Broken;

    static BROKEN: RuleMeta = meta("broken");

    impl Rule for Broken {
        fn meta(&self) -> &'static RuleMeta {
            &BROKEN
        }

        fn create<'a>(&self, _context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>> {
            Ok(Listeners::new().on("ThrowStatement", |_| anyhow::bail!("unsupported")))
        }
    }

    fn builtin(toml: &str) -> ActiveRuleSet {
        ActiveRuleSet::resolve(&Registry::builtin(), &Config::from_toml(toml).unwrap())
    }

    fn summary(result: &LintResult) -> Vec<String> {
        result
            .problems
            .iter()
            .map(|p| format!("{}:{} {} {}", p.start.line, p.start.column, p.rule_name(), p.message))
            .collect()
    }

    #[test]
    fn test_implicit_global_assignment() {
        let rules = builtin("");
        let result = lint("foo = 1", &rules, &LintOptions::default()).unwrap();
        assert_eq!(summary(&result), vec!["1:1 no-undef 'foo' is not defined."]);
        assert_eq!(result.output, None);
        assert_eq!(result.passes, 0);
    }

    #[test]
    fn test_lint_is_deterministic() {
        let rules = builtin("[lint]\nselect = [\"ALL\"]");
        let source = "var x = 1\nif (x == y) { debugger; };\nlet z = x;;\n";
        let first = lint(source, &rules, &LintOptions::default()).unwrap();
        let second = lint(source, &rules, &LintOptions::default()).unwrap();
        assert_eq!(first, second);
        assert!(first.problems.len() > 5);
        assert!(first.problems.windows(2).all(|w| w[0].range.start() <= w[1].range.start()));
    }

    #[test]
    fn test_fix_until_stable() {
        let rules = builtin("[lint]\nselect = [\"eqeqeq\", \"semi\", \"no-extra-semi\"]");
        let options = LintOptions::default().with_fix(true);
        let result = lint("if (typeof a == \"x\") {};\nc != d\n", &rules, &options).unwrap();

        assert_eq!(result.output.as_deref(), Some("if (typeof a === \"x\") {}\nc != d;\n"));
        assert_eq!(result.passes, 1);
        // Not safe to fix, so left for the user.
        assert_eq!(summary(&result), vec!["2:3 eqeqeq Expected '!==' and instead saw '!='."]);
        assert!(!result.fix_not_converged);

        // The fixed text is a fixed point.
        let again = lint(result.output.as_deref().unwrap(), &rules, &options).unwrap();
        assert_eq!(again.output, None);
        assert_eq!(again.passes, 0);
    }

    #[test]
    fn test_oscillating_fixes_stop_at_the_bound() {
        let rules = ActiveRuleSet::new(vec![ActiveRule::new(Arc::new(Swap))]);
        let options = LintOptions { fix: true, max_passes: 3, ..LintOptions::default() };
        let result = lint("a;", &rules, &options).unwrap();

        assert_eq!(result.passes, 3);
        assert_eq!(result.output.as_deref(), Some("b;"));
        assert!(result.fix_not_converged);
        assert_eq!(summary(&result), vec!["1:1 swap Swap me."]);
        assert!(result.problems[0].has_fix());
    }

    #[test]
    fn test_no_fixing_without_the_flag() {
        let rules = ActiveRuleSet::new(vec![ActiveRule::new(Arc::new(Swap))]);
        let result = lint("a;", &rules, &LintOptions::default()).unwrap();
        assert_eq!(result.output, None);
        assert!(!result.fix_not_converged);
        assert!(result.problems[0].has_fix());
    }

    #[test]
    fn test_parse_error_is_fatal() {
        let rules = builtin("");
        let result = lint("let x = ;\nfoo = 1", &rules, &LintOptions::default()).unwrap();
        assert_eq!(result.problems.len(), 1);
        let problem = &result.problems[0];
        assert!(problem.fatal);
        assert_eq!(problem.rule, None);
        assert_eq!(problem.severity, Severity::Error);
        assert_eq!((problem.start.line, problem.start.column), (1, 9));
        assert!(problem.message.starts_with("Parsing error: "));
        assert!(result.has_fatal());
    }

    #[test]
    fn test_deep_nesting_is_a_parse_error() {
        let rules = builtin("");
        let source = format!("a();\nx = {}1{};\n", "[".repeat(5000), "]".repeat(5000));
        let result = lint(&source, &rules, &LintOptions::default().with_fix(true)).unwrap();
        assert_eq!(result.problems.len(), 1);
        assert!(result.problems[0].fatal);
        assert_eq!(result.problems[0].message, "Parsing error: nesting too deep");
        assert_eq!(result.problems[0].start.line, 2);
        assert_eq!(result.output, None);
    }

    #[test]
    fn test_rule_fault_aborts_the_cycle() {
        let rules = ActiveRuleSet::new(vec![
            ActiveRule::new(Arc::new(Swap)),
            ActiveRule::new(Arc::new(Broken)),
        ]);
        let error = lint("a;\nthrow b;", &rules, &LintOptions::default()).unwrap_err();
        insta::assert_snapshot!(error, @"rule `broken` failed on `ThrowStatement` at 2:1");
    }

    #[test]
    fn test_suppression_problems() {
        let rules = builtin("");
        let source = "// lintel-disable eqeqeq\nfoo = 1;\n// lintel-enable eqeqeq\n";
        let result = lint(source, &rules, &LintOptions::default()).unwrap();
        assert_eq!(
            summary(&result),
            vec![
                "1:1 unused-suppression Unused `lintel-disable` directive (no problems were reported from `eqeqeq`).",
                "2:1 no-undef 'foo' is not defined.",
                "3:1 unused-suppression Unused `lintel-enable` directive (nothing from `eqeqeq` was suppressed before it).",
            ]
        );

        let quiet = LintOptions { unused_directives: Severity::Off, ..LintOptions::default() };
        let result = lint(source, &rules, &quiet).unwrap();
        assert_eq!(summary(&result), vec!["2:1 no-undef 'foo' is not defined."]);
    }
}
