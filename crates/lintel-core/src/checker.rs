use std::cell::RefCell;
use std::sync::LazyLock;

use lintel_scope::ScopeManager;
use lintel_syntax::{NodeRef, TextRange, Tree};
use regex::Regex;

use crate::diagnostic::{Problem, Severity};
use crate::fix::Fix;
use crate::rule_options::RuleOptions;
use crate::rule_table::RuleMeta;
use crate::suppression::SuppressionManager;

/// Pseudo-rule of problems about directives that suppressed nothing.
pub const UNUSED_SUPPRESSION: &str = "unused-suppression";
/// Pseudo-rule of problems about malformed directives.
pub const INVALID_SUPPRESSION: &str = "invalid-suppression";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_-]*)\s*\}\}").unwrap());

/// A problem as reported by a rule, before it is located, checked against
/// suppression comments and turned into a [`Problem`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Range of the node the report is about. Fixes must stay inside it.
    anchor: Option<TextRange>,
    range: TextRange,
    message: String,
    data: Vec<(String, String)>,
    help: Option<String>,
    fix: Option<Fix>,
}

impl Report {
    /// A report about `node`. `message` may contain `{{ key }}` placeholders
    /// filled in by [`Report::data`].
    pub fn new(node: NodeRef<'_>, message: impl Into<String>) -> Self {
        Self {
            anchor: Some(node.range()),
            range: node.range(),
            message: message.into(),
            data: Vec::new(),
            help: None,
            fix: None,
        }
    }

    /// A report about a range that no node covers.
    pub fn at_range(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            anchor: None,
            range,
            message: message.into(),
            data: Vec::new(),
            help: None,
            fix: None,
        }
    }

    /// Point at `range` rather than at the whole node.
    pub fn with_range(mut self, range: TextRange) -> Self {
        self.range = range;
        self
    }

    pub fn data(mut self, key: &str, value: impl ToString) -> Self {
        self.data.push((key.to_string(), value.to_string()));
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    pub fn with_fix(mut self, fix: Option<Fix>) -> Self {
        self.fix = fix;
        self
    }
}

/// What a rule sees of the file being linted.
pub struct RuleContext<'a> {
    meta: &'static RuleMeta,
    options: &'a RuleOptions,
    tree: &'a Tree,
    scopes: &'a ScopeManager,
    reports: RefCell<Vec<Report>>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        meta: &'static RuleMeta,
        options: &'a RuleOptions,
        tree: &'a Tree,
        scopes: &'a ScopeManager,
    ) -> Self {
        Self { meta, options, tree, scopes, reports: RefCell::new(Vec::new()) }
    }

    pub fn rule(&self) -> &'static str {
        self.meta.name
    }

    pub fn options(&self) -> &'a RuleOptions {
        self.options
    }

    pub fn tree(&self) -> &'a Tree {
        self.tree
    }

    pub fn source(&self) -> &'a str {
        self.tree.source()
    }

    pub fn scopes(&self) -> &'a ScopeManager {
        self.scopes
    }

    pub fn report(&self, report: Report) {
        self.reports.borrow_mut().push(report);
    }

    pub fn into_reports(self) -> Vec<Report> {
        self.reports.into_inner()
    }
}

#[derive(Debug)]
struct Collected {
    /// Registration index of the rule; suppression problems sort last.
    rule_index: usize,
    problem: Problem,
}

/// Collects the reports of all rules for one file and turns them into the
/// final, ordered list of problems.
#[derive(Debug)]
pub struct Checker<'a> {
    tree: &'a Tree,
    collected: Vec<Collected>,
}

impl<'a> Checker<'a> {
    pub fn new(tree: &'a Tree) -> Self {
        Self { tree, collected: Vec::new() }
    }

    pub fn report_diagnostics(
        &mut self,
        rule_index: usize,
        meta: &RuleMeta,
        severity: Severity,
        reports: Vec<Report>,
    ) {
        if severity.is_off() {
            return;
        }

        for report in reports {
            let mut fix = report.fix;

            if fix.is_some() && !meta.has_fix() {
                tracing::debug!(rule = meta.name, "Dropping the fix of a rule without fixes");
                fix = None;
            }
            if let (Some(proposed), Some(anchor)) = (&fix, report.anchor)
                && !proposed.unbounded
                && !anchor.contains_range(proposed.range)
            {
                tracing::warn!(
                    rule = meta.name,
                    node = ?anchor,
                    fix = ?proposed.range,
                    "Dropping a fix that edits outside of its node"
                );
                fix = None;
            }

            let problem = self.problem(
                meta.name,
                severity,
                render_template(&report.message, &report.data),
                report.help,
                report.range,
                fix,
            );
            self.collected.push(Collected { rule_index, problem });
        }
    }

    fn problem(
        &self,
        rule: &str,
        severity: Severity,
        message: String,
        help: Option<String>,
        range: TextRange,
        fix: Option<Fix>,
    ) -> Problem {
        Problem {
            rule: Some(rule.to_string()),
            severity,
            message,
            help,
            range,
            start: self.tree.line_col(range.start()),
            end: self.tree.line_col(range.end()),
            fix,
            fatal: false,
        }
    }

    /// Apply suppression comments, add the problems about the comments
    /// themselves and sort everything by position.
    pub fn finish(
        self,
        mut suppressions: SuppressionManager,
        unused_directives: Severity,
    ) -> Vec<Problem> {
        let Checker { tree, collected } = self;

        let mut kept: Vec<Collected> = collected
            .into_iter()
            .filter(|collected| {
                let problem = &collected.problem;
                let rule = problem.rule_name();
                !suppressions.suppress(rule, problem.range.start(), problem.start.line)
            })
            .collect();

        if !unused_directives.is_off() {
            let checker = Checker::new(tree);
            for invalid in suppressions.invalid() {
                let problem = checker.problem(
                    INVALID_SUPPRESSION,
                    unused_directives,
                    invalid.message.clone(),
                    None,
                    invalid.range,
                    None,
                );
                kept.push(Collected { rule_index: usize::MAX, problem });
            }
            for unused in suppressions.unused(tree.source()) {
                let problem = checker.problem(
                    UNUSED_SUPPRESSION,
                    unused_directives,
                    unused.message,
                    None,
                    unused.range,
                    Some(unused.fix),
                );
                kept.push(Collected { rule_index: usize::MAX, problem });
            }
        }

        // Stable: problems of a rule at the same offset keep their report order.
        kept.sort_by_key(|collected| (collected.problem.range.start(), collected.rule_index));
        kept.into_iter().map(|collected| collected.problem).collect()
    }
}

/// Replace `{{ key }}` placeholders with the matching data. Unknown keys are
/// left as they are.
pub(crate) fn render_template(template: &str, data: &[(String, String)]) -> String {
    if data.is_empty() {
        return template.to_string();
    }
    PLACEHOLDER
        .replace_all(template, |captures: &regex::Captures| {
            let key = &captures[1];
            match data.iter().find(|(name, _)| name == key) {
                Some((_, value)) => value.clone(),
                None => captures[0].to_string(),
            }
        })
        .into_owned()
}
