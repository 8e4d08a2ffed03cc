use lintel_syntax::NodeKind;

/// A selector string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unknown node kind `{0}`")]
    UnknownKind(String),
    #[error("unknown attribute `{0}`")]
    UnknownAttribute(String),
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of selector, expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("`:exit` must end the selector")]
    MisplacedExit,
}

/// Invalid configuration of a single rule. The rule is left out of the run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("rule `{rule}`: unknown option `{key}`")]
    UnknownOption { rule: String, key: String },
    #[error("rule `{rule}`: option `{key}` expects {expected}, found {found}")]
    InvalidType {
        rule: String,
        key: String,
        expected: String,
        found: String,
    },
    #[error("rule `{rule}`: option `{key}` must be one of {allowed}, found `{found}`")]
    InvalidValue {
        rule: String,
        key: String,
        allowed: String,
        found: String,
    },
    #[error("rule `{rule}`: {message}")]
    Rejected { rule: String, message: String },
}

impl ConfigError {
    /// The rule the error is about.
    pub fn rule(&self) -> &str {
        match self {
            ConfigError::UnknownRule(rule)
            | ConfigError::UnknownOption { rule, .. }
            | ConfigError::InvalidType { rule, .. }
            | ConfigError::InvalidValue { rule, .. }
            | ConfigError::Rejected { rule, .. } => rule,
        }
    }
}

/// Errors aborting a lint cycle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("rule `{rule}` has an invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        rule: String,
        selector: String,
        #[source]
        reason: SelectorError,
    },
    #[error("rule `{rule}` failed to start")]
    RuleSetup {
        rule: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("rule `{rule}` failed on `{kind}` at {line}:{column}")]
    RuleFault {
        rule: String,
        kind: NodeKind,
        line: usize,
        column: usize,
        #[source]
        source: anyhow::Error,
    },
}
