use std::fmt;

use annotate_snippets::{Level, Renderer, Snippet};
use lintel_syntax::{LineCol, TextRange};
use serde::{Deserialize, Serialize};

use crate::fix::Fix;

/// How seriously a rule's problems are taken.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The rule does not run.
    Off,
    #[default]
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    pub fn is_off(self) -> bool {
        self == Severity::Off
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A problem found in a file, as handed to callers of the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Problem {
    /// `None` for parse errors.
    pub rule: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub help: Option<String>,
    pub range: TextRange,
    pub start: LineCol,
    pub end: LineCol,
    pub fix: Option<Fix>,
    /// Parse failures: nothing else was checked.
    pub fatal: bool,
}

impl Problem {
    pub fn rule_name(&self) -> &str {
        self.rule.as_deref().unwrap_or("parse-error")
    }

    pub fn has_fix(&self) -> bool {
        self.fix.is_some()
    }
}

/// One line per problem: `path [line:column] rule message`.
pub fn render_concise(path: &str, problem: &Problem) -> String {
    format!(
        "{path} [{}:{}] {} {}",
        problem.start.line,
        problem.start.column,
        problem.rule_name(),
        problem.message
    )
}

/// Render a problem with the offending source lines, the way compilers do.
pub fn render_diagnostic(
    source: &str,
    path: &str,
    problem: &Problem,
    renderer: &Renderer,
) -> String {
    let level = match problem.severity {
        Severity::Error => Level::Error,
        Severity::Warn | Severity::Off => Level::Warning,
    };
    let span = visible_span(source, problem.range);

    let snippet = Snippet::source(source)
        .line_start(1)
        .origin(path)
        .fold(true)
        .annotation(level.span(span).label(&problem.message));

    let mut message = level.title(problem.rule_name()).snippet(snippet);
    if let Some(help) = &problem.help {
        message = message.footer(Level::Help.title(help));
    }

    renderer.render(message).to_string()
}

/// Annotations need at least one character to point at.
fn visible_span(source: &str, range: TextRange) -> std::ops::Range<usize> {
    let start = range.start().min(source.len());
    let end = range.end().clamp(start, source.len());
    if start < end {
        return start..end;
    }
    if let Some(c) = source[start..].chars().next() {
        start..start + c.len_utf8()
    } else if let Some(c) = source[..start].chars().next_back() {
        start - c.len_utf8()..start
    } else {
        start..start
    }
}
