//! The `lintel.toml` configuration file.
//!
//! ```toml
//! [lint]
//! select = ["no-undef", "eqeqeq"]
//! ignore = ["semi"]
//! unused-directives = "warn"
//! max-passes = 10
//! env = ["browser"]
//!
//! [lint.globals]
//! jQuery = "readonly"
//!
//! [lint.rules.eqeqeq]
//! severity = "error"
//! null = "ignore"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use lintel_scope::{Ambient, Environment, Globals};
use serde::Deserialize;

use crate::diagnostic::Severity;

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub lint: LintConfig,
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct LintConfig {
    /// Rules to run. `None` runs the rules enabled by default, `"ALL"`
    /// selects every rule.
    pub select: Option<Vec<String>>,
    #[serde(default)]
    pub ignore: Vec<String>,
    /// Severity of the problems about suppression comments.
    pub unused_directives: Option<Severity>,
    pub max_passes: Option<usize>,
    #[serde(default)]
    pub env: Vec<Environment>,
    #[serde(default)]
    pub globals: BTreeMap<String, Ambient>,
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

/// The `[lint.rules.<name>]` table of a rule. Every key but `severity` is a
/// rule option, checked against the rule's schema later on.
#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
pub struct RuleConfig {
    pub severity: Option<Severity>,
    #[serde(flatten)]
    pub options: toml::Table,
}

impl Config {
    pub fn from_toml(contents: &str) -> anyhow::Result<Config> {
        toml::from_str(contents).context("Failed to parse the configuration")
    }

    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    /// The ambient bindings: the ECMAScript builtins, the configured
    /// environments, then the explicit globals.
    pub fn globals(&self) -> Globals {
        let mut globals = Globals::builtin();
        for environment in &self.lint.env {
            globals.add_environment(*environment);
        }
        for (name, ambient) in &self.lint.globals {
            globals.insert(name.clone(), *ambient);
        }
        globals
    }
}
