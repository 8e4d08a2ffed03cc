//! Core functionality of the lintel linter
//!
//! This crate provides:
//! - the rule registry and the rule contract
//! - selector parsing and single-pass dispatch of rule listeners
//! - problem collection and suppression comments
//! - conflict-free application of fixes
//! - the lint and fix cycle driving all of the above

pub mod check;
pub mod checker;
pub mod config;
pub mod diagnostic;
pub mod dispatch;
pub mod error;
pub mod fix;
pub mod lints;
pub mod rule_options;
pub mod rule_set;
pub mod rule_table;
pub mod selector;
pub mod suppression;
pub mod utils;


// Re-export commonly used types for convenience
pub use check::{LintOptions, LintResult, lint};
pub use checker::{Report, RuleContext};
pub use config::Config;
pub use diagnostic::{Problem, Severity};
pub use dispatch::Listeners;
pub use error::{ConfigError, EngineError, SelectorError};
pub use fix::Fix;
pub use rule_set::{ActiveRule, ActiveRuleSet};
pub use rule_table::{Registry, Rule, RuleMeta};
