use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::checker::RuleContext;
use crate::diagnostic::Severity;
use crate::dispatch::Listeners;
use crate::rule_options::{OptionSpec, RuleOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultStatus {
    #[default]
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixStatus {
    #[default]
    None,
    Fixable,
}

/// Static description of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMeta {
    pub name: &'static str,
    pub description: &'static str,
    /// Comma separated.
    pub categories: &'static str,
    pub default_status: DefaultStatus,
    pub default_severity: Severity,
    pub fix_status: FixStatus,
    pub schema: &'static [OptionSpec],
}

impl RuleMeta {
    pub fn categories(&self) -> impl Iterator<Item = &'static str> {
        self.categories.split(',').map(str::trim)
    }

    pub fn has_fix(&self) -> bool {
        self.fix_status == FixStatus::Fixable
    }

    pub fn is_enabled_by_default(&self) -> bool {
        self.default_status == DefaultStatus::Enabled
    }
}

/// A lint rule: metadata plus a factory of listeners.
///
/// `create` runs once per lint cycle. The listeners it returns are called by
/// the dispatcher during the single traversal of the tree and report
/// problems through the context.
pub trait Rule: Send + Sync {
    fn meta(&self) -> &'static RuleMeta;

    fn create<'a>(&self, context: &'a RuleContext<'a>) -> anyhow::Result<Listeners<'a>>;

    /// Checks on option values that the schema can't express. Called once
    /// when the configuration is resolved.
    fn validate(&self, _options: &RuleOptions) -> anyhow::Result<()> {
        Ok(())
    }
}

/// The set of known rules, in registration order.
///
/// Read-only once built, so a single registry can be shared across threads
/// linting different files.
#[derive(Clone, Default)]
pub struct Registry {
    rules: Vec<Arc<dyn Rule>>,
    by_name: FxHashMap<&'static str, usize>,
}

impl Registry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// All the rules shipped with lintel.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for rule in crate::lints::builtin_rules() {
            registry.add_rule(rule);
        }
        registry
    }

    /// Registers `rule`. A rule with the same name replaces the previous one
    /// in place.
    pub fn add_rule(&mut self, rule: Arc<dyn Rule>) {
        let name = rule.meta().name;
        match self.by_name.get(name) {
            Some(index) => self.rules[*index] = rule,
            None => {
                self.by_name.insert(name, self.rules.len());
                self.rules.push(rule);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Rule>> {
        self.by_name.get(name).map(|index| &self.rules[*index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.meta().name))
            .finish()
    }
}

impl FromIterator<Arc<dyn Rule>> for Registry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Rule>>>(iter: I) -> Self {
        let mut registry = Registry::empty();
        for rule in iter {
            registry.add_rule(rule);
        }
        registry
    }
}
