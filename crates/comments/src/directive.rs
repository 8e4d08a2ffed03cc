//! Parsing of suppression comment directives.
//!
//! This module only looks at the text of a single comment. It knows nothing
//! about the rules that exist: checking that a rule name is known, and
//! deciding which problems a directive suppresses, is up to the caller.

/// The prefix every directive starts with, once the comment delimiters and
/// leading whitespace have been removed.
pub const DIRECTIVE_PREFIX: &str = "lintel-";

/// What a directive does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LintDirective {
    /// Start suppressing from here: `// lintel-disable [rules]`
    Disable,
    /// Stop suppressing from here: `// lintel-enable [rules]`
    Enable,
    /// Suppress on the line of the comment: `// lintel-disable-line [rules]`
    DisableLine,
    /// Suppress on the line after the comment: `// lintel-disable-next-line [rules]`
    DisableNextLine,
}

impl LintDirective {
    pub fn keyword(self) -> &'static str {
        match self {
            LintDirective::Disable => "lintel-disable",
            LintDirective::Enable => "lintel-enable",
            LintDirective::DisableLine => "lintel-disable-line",
            LintDirective::DisableNextLine => "lintel-disable-next-line",
        }
    }

    /// Whether the directive applies to a single line rather than to the
    /// rest of the file.
    pub fn is_line_scoped(self) -> bool {
        matches!(self, LintDirective::DisableLine | LintDirective::DisableNextLine)
    }
}

/// A complete, well-formed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: LintDirective,
    /// Rule names in the order they were written. Empty means "all rules".
    pub rules: Vec<String>,
    /// Free text after ` -- `, if any.
    pub explanation: Option<String>,
}

impl Directive {
    pub fn applies_to_all(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn names(&self, rule: &str) -> bool {
        self.rules.iter().any(|r| r == rule)
    }
}

/// Why a comment that looks like a directive couldn't be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error("empty rule name in `{0}` directive")]
    EmptyRuleName(&'static str),
    #[error("`{name}` is not a valid rule name")]
    InvalidRuleName { name: String },
    #[error("`{0}` is not a known directive")]
    UnknownDirective(String),
}

/// Parse a comment directive
///
/// Supported formats, in both `//` and `/* */` comments:
///
/// ```text
/// // lintel-disable
/// // lintel-disable eqeqeq, no-var -- migrating this file
/// /* lintel-enable eqeqeq */
/// // lintel-disable-line semi
/// // lintel-disable-next-line
/// ```
///
/// Returns:
/// - `None` if the comment is not a directive at all
/// - `Some(Ok(directive))` for a valid directive
/// - `Some(Err(_))` for a comment that starts like a directive but is malformed
pub fn parse_comment_directive(comment: &str) -> Option<Result<Directive, DirectiveError>> {
    let body = strip_delimiters(comment)?.trim();

    let rest = body.strip_prefix(DIRECTIVE_PREFIX)?;
    let keyword_end = rest
        .find(|c: char| c.is_whitespace())
        .unwrap_or(rest.len());
    let (keyword, after) = rest.split_at(keyword_end);

    let kind = match keyword {
        "disable" => LintDirective::Disable,
        "enable" => LintDirective::Enable,
        "disable-line" => LintDirective::DisableLine,
        "disable-next-line" => LintDirective::DisableNextLine,
        // Things like `lintel-config` or `lintel-disabled` are not directives
        // we know of, but they are clearly meant as one.
        other => {
            return Some(Err(DirectiveError::UnknownDirective(format!(
                "{DIRECTIVE_PREFIX}{other}"
            ))));
        }
    };

    let (list, explanation) = match after.find(" --") {
        Some(pos) => {
            let explanation = after[pos + 3..].trim();
            (
                &after[..pos],
                (!explanation.is_empty()).then(|| explanation.to_string()),
            )
        }
        None => (after, None),
    };

    Some(parse_rule_list(list, kind).map(|rules| Directive { kind, rules, explanation }))
}

/// Remove `//`, `/*` and `*/` around the comment text.
fn strip_delimiters(comment: &str) -> Option<&str> {
    let comment = comment.trim_start();
    if let Some(rest) = comment.strip_prefix("//") {
        Some(rest)
    } else if let Some(rest) = comment.strip_prefix("/*") {
        Some(rest.strip_suffix("*/").unwrap_or(rest))
    } else {
        None
    }
}

fn parse_rule_list(list: &str, kind: LintDirective) -> Result<Vec<String>, DirectiveError> {
    let list = list.trim();
    if list.is_empty() {
        return Ok(Vec::new());
    }

    let mut rules = Vec::new();
    for name in list.split(',') {
        let name = name.trim();
        if name.is_empty() {
            return Err(DirectiveError::EmptyRuleName(kind.keyword()));
        }
        if !name.chars().all(is_rule_name_char) {
            return Err(DirectiveError::InvalidRuleName { name: name.to_string() });
        }
        if !rules.iter().any(|r| r == name) {
            rules.push(name.to_string());
        }
    }
    Ok(rules)
}

fn is_rule_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '@')
}
