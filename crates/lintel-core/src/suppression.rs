//! Comment-based suppression of problems
//!
//! Directive comments are read once from the token stream into an ordered
//! list of regions. The collector then asks, for every problem, whether a
//! region covers it, which also records that the directive was useful.

use comments::{LintDirective, parse_comment_directive};
use lintel_syntax::{TextRange, Tree};

use crate::fix::Fix;
use crate::utils::removal_range;

#[derive(Debug, Clone, PartialEq, Eq)]
enum RuleScope {
    /// Every rule but the ones re-enabled since.
    All { except: Vec<String> },
    Only(Vec<String>),
}

impl RuleScope {
    fn covers(&self, rule: &str) -> bool {
        match self {
            RuleScope::All { except } => !except.iter().any(|name| name == rule),
            RuleScope::Only(names) => names.iter().any(|name| name == rule),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Extent {
    /// Byte offsets, end excluded.
    Range { start: usize, end: usize },
    Line(usize),
}

#[derive(Debug, Clone)]
struct Region {
    /// Index of the directive the region comes from.
    directive: usize,
    scope: RuleScope,
    extent: Extent,
}

#[derive(Debug, Clone)]
struct Entry {
    kind: LintDirective,
    rules: Vec<String>,
    range: TextRange,
    /// For `lintel-enable`: the disable directives it closed.
    closes: Vec<usize>,
}

/// A directive comment that can't be honored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDirective {
    pub range: TextRange,
    pub message: String,
}

/// A directive comment that didn't suppress anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnusedDirective {
    pub range: TextRange,
    pub message: String,
    /// Removes the comment.
    pub fix: Fix,
}

/// Tracks the suppression directives of one file and which of them were
/// used.
#[derive(Debug, Default)]
pub struct SuppressionManager {
    entries: Vec<Entry>,
    regions: Vec<Region>,
    used: Vec<bool>,
    invalid: Vec<InvalidDirective>,
}

impl SuppressionManager {
    /// Read the directives of `tree`. `is_known_rule` decides which rule
    /// names directives may refer to.
    pub fn from_tree(tree: &Tree, is_known_rule: impl Fn(&str) -> bool) -> Self {
        let mut manager = Self::default();
        // Regions of range directives that no enable closed yet.
        let mut open: Vec<usize> = Vec::new();

        for comment in tree.comments() {
            let text = comment.text(tree.source());
            let directive = match parse_comment_directive(text) {
                None => continue,
                Some(Ok(directive)) => directive,
                Some(Err(error)) => {
                    manager.invalid.push(InvalidDirective {
                        range: comment.range,
                        message: format!("Invalid suppression comment: {error}."),
                    });
                    continue;
                }
            };

            let unknown: Vec<&String> =
                directive.rules.iter().filter(|rule| !is_known_rule(rule)).collect();
            if !unknown.is_empty() {
                for rule in unknown {
                    manager.invalid.push(InvalidDirective {
                        range: comment.range,
                        message: format!("Unknown rule `{rule}` in suppression comment."),
                    });
                }
                continue;
            }

            let index = manager.entries.len();
            let offset = comment.range.start();
            let scope = if directive.applies_to_all() {
                RuleScope::All { except: Vec::new() }
            } else {
                RuleScope::Only(directive.rules.clone())
            };
            let mut closes = Vec::new();

            match directive.kind {
                LintDirective::Disable => {
                    open.push(manager.regions.len());
                    manager.regions.push(Region {
                        directive: index,
                        scope,
                        extent: Extent::Range { start: offset, end: usize::MAX },
                    });
                }
                LintDirective::Enable => {
                    closes = manager.enable(&mut open, &directive.rules, offset);
                }
                LintDirective::DisableLine => {
                    manager.regions.push(Region {
                        directive: index,
                        scope,
                        extent: Extent::Line(tree.line_col(offset).line),
                    });
                }
                LintDirective::DisableNextLine => {
                    manager.regions.push(Region {
                        directive: index,
                        scope,
                        extent: Extent::Line(tree.line_col(comment.range.end()).line + 1),
                    });
                }
            }

            manager.entries.push(Entry {
                kind: directive.kind,
                rules: directive.rules,
                range: comment.range,
                closes,
            });
        }

        manager.used = vec![false; manager.entries.len()];
        manager
    }

    /// Close the open regions an enable directive naming `rules` applies to.
    /// Returns the disable directives it closed.
    fn enable(&mut self, open: &mut Vec<usize>, rules: &[String], offset: usize) -> Vec<usize> {
        let mut closed = Vec::new();
        let mut still_open = Vec::new();

        for region_index in open.drain(..) {
            let region = &self.regions[region_index];
            let reopened = if rules.is_empty() {
                Some(None)
            } else {
                match &region.scope {
                    RuleScope::All { except } => {
                        let newly: Vec<&String> =
                            rules.iter().filter(|rule| !except.contains(rule)).collect();
                        (!newly.is_empty()).then(|| {
                            let mut except = except.clone();
                            except.extend(newly.into_iter().cloned());
                            Some(RuleScope::All { except })
                        })
                    }
                    RuleScope::Only(names) => {
                        let affected = names.iter().any(|name| rules.contains(name));
                        affected.then(|| {
                            let remaining: Vec<String> = names
                                .iter()
                                .filter(|name| !rules.contains(name))
                                .cloned()
                                .collect();
                            (!remaining.is_empty()).then_some(RuleScope::Only(remaining))
                        })
                    }
                }
            };

            let Some(reopened) = reopened else {
                still_open.push(region_index);
                continue;
            };

            let directive = self.regions[region_index].directive;
            if let Extent::Range { end, .. } = &mut self.regions[region_index].extent {
                *end = offset;
            }
            if !closed.contains(&directive) {
                closed.push(directive);
            }
            if let Some(scope) = reopened {
                still_open.push(self.regions.len());
                self.regions.push(Region {
                    directive,
                    scope,
                    extent: Extent::Range { start: offset, end: usize::MAX },
                });
            }
        }

        *open = still_open;
        open.sort_unstable();
        closed
    }

    /// Whether a problem of `rule` starting at `offset` on `line` is
    /// suppressed. Every directive covering it is marked as used.
    pub fn suppress(&mut self, rule: &str, offset: usize, line: usize) -> bool {
        let mut suppressed = false;
        for region in &self.regions {
            let in_extent = match region.extent {
                Extent::Range { start, end } => start <= offset && offset < end,
                Extent::Line(target) => target == line,
            };
            if in_extent && region.scope.covers(rule) {
                self.used[region.directive] = true;
                suppressed = true;
            }
        }
        suppressed
    }

    pub fn invalid(&self) -> &[InvalidDirective] {
        &self.invalid
    }

    /// Directives that suppressed nothing. An enable is unused unless it
    /// closes a disable that was used.
    pub fn unused(&self, source: &str) -> Vec<UnusedDirective> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(index, entry)| match entry.kind {
                LintDirective::Enable => !entry.closes.iter().any(|disable| self.used[*disable]),
                _ => !self.used[*index],
            })
            .map(|(_, entry)| {
                let keyword = entry.kind.keyword();
                let message = match (entry.kind, entry.rules.as_slice()) {
                    (LintDirective::Enable, []) => {
                        format!("Unused `{keyword}` directive (nothing was suppressed before it).")
                    }
                    (LintDirective::Enable, rules) => format!(
                        "Unused `{keyword}` directive (nothing from {} was suppressed before it).",
                        quoted(rules)
                    ),
                    (_, []) => format!("Unused `{keyword}` directive (no problems were reported)."),
                    (_, rules) => format!(
                        "Unused `{keyword}` directive (no problems were reported from {}).",
                        quoted(rules)
                    ),
                };
                UnusedDirective {
                    range: entry.range,
                    message,
                    fix: Fix::remove(removal_range(source, entry.range)).unbounded(),
                }
            })
            .collect()
    }
}

fn quoted(rules: &[String]) -> String {
    rules
        .iter()
        .map(|rule| format!("`{rule}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
