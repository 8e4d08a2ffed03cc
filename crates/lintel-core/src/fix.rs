use lintel_syntax::TextRange;
use serde::Serialize;

use crate::diagnostic::Problem;

/// A text edit proposed by a rule to resolve the problem it reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fix {
    pub range: TextRange,
    pub replacement: String,
    /// May touch another compatible fix of the same rule end-to-start.
    #[serde(skip)]
    pub compatible: bool,
    /// May edit text outside of the node it was reported on.
    #[serde(skip)]
    pub unbounded: bool,
}

impl Fix {
    pub fn replace(range: TextRange, replacement: impl Into<String>) -> Self {
        Self { range, replacement: replacement.into(), compatible: false, unbounded: false }
    }

    pub fn insert_before(range: TextRange, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(range.start()), text)
    }

    pub fn insert_after(range: TextRange, text: impl Into<String>) -> Self {
        Self::replace(TextRange::empty(range.end()), text)
    }

    pub fn remove(range: TextRange) -> Self {
        Self::replace(range, "")
    }

    pub fn compatible(mut self) -> Self {
        self.compatible = true;
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.unbounded = true;
        self
    }

    /// Whether the edit can be applied to `text` at all.
    pub fn is_valid_for(&self, text: &str) -> bool {
        !self.range.is_inverted()
            && self.range.end() <= text.len()
            && text.is_char_boundary(self.range.start())
            && text.is_char_boundary(self.range.end())
    }
}

/// The result of applying one round of fixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    pub text: String,
    /// Indices (into the problem list) of the problems whose fix was applied.
    pub applied: Vec<usize>,
    /// Fixes left for a later pass because they conflict with an applied one.
    pub rejected: Vec<usize>,
    /// Fixes that could never apply: inverted or out of the text.
    pub invalid: Vec<usize>,
}

impl FixOutcome {
    pub fn made_progress(&self) -> bool {
        !self.applied.is_empty()
    }
}

/// Apply the largest set of non-conflicting fixes carried by `problems`.
///
/// Fixes are taken by ascending start (then end, then problem order) and a
/// fix is accepted only if it starts after the end of the last accepted one.
/// Two fixes may touch (`start == last end`) when both are marked compatible
/// and come from the same rule.
pub fn apply_fixes(problems: &[Problem], contents: &str) -> FixOutcome {
    let mut candidates: Vec<(usize, &Fix)> = Vec::new();
    let mut invalid = Vec::new();

    for (index, problem) in problems.iter().enumerate() {
        let Some(fix) = &problem.fix else {
            continue;
        };
        if fix.is_valid_for(contents) {
            candidates.push((index, fix));
        } else {
            tracing::warn!(
                rule = problem.rule_name(),
                range = ?fix.range,
                "Ignoring a fix that doesn't fit in the file"
            );
            invalid.push(index);
        }
    }

    candidates.sort_by_key(|(index, fix)| (fix.range.start(), fix.range.end(), *index));

    let mut accepted: Vec<(usize, &Fix)> = Vec::new();
    let mut rejected = Vec::new();

    for (index, fix) in candidates {
        let fits = match accepted.last() {
            None => true,
            Some((last_index, last)) => {
                let last_end = last.range.end();
                let start = fix.range.start();
                start > last_end
                    || (start == last_end
                        && fix.compatible
                        && last.compatible
                        && problems[index].rule == problems[*last_index].rule)
            }
        };
        if fits {
            accepted.push((index, fix));
        } else {
            rejected.push(index);
        }
    }

    let mut text = String::with_capacity(contents.len());
    let mut last_end = 0;
    for (_, fix) in &accepted {
        text.push_str(&contents[last_end..fix.range.start()]);
        text.push_str(&fix.replacement);
        last_end = fix.range.end();
    }
    text.push_str(&contents[last_end..]);

    let mut applied: Vec<usize> = accepted.into_iter().map(|(index, _)| index).collect();
    applied.sort_unstable();
    rejected.sort_unstable();

    FixOutcome { text, applied, rejected, invalid }
}
