use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::config::Config;
use crate::diagnostic::Severity;
use crate::error::ConfigError;
use crate::rule_options::RuleOptions;
use crate::rule_table::{Registry, Rule, RuleMeta};

/// A rule taking part in a run, with its configured severity and validated
/// options.
#[derive(Clone)]
pub struct ActiveRule {
    pub rule: Arc<dyn Rule>,
    pub severity: Severity,
    pub options: RuleOptions,
}

impl ActiveRule {
    /// The rule with its default severity and options.
    pub fn new(rule: Arc<dyn Rule>) -> Self {
        let meta = rule.meta();
        Self {
            severity: meta.default_severity,
            options: RuleOptions::defaults(meta.schema),
            rule,
        }
    }

    pub fn meta(&self) -> &'static RuleMeta {
        self.rule.meta()
    }

    pub fn name(&self) -> &'static str {
        self.rule.meta().name
    }
}

impl std::fmt::Debug for ActiveRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveRule")
            .field("name", &self.name())
            .field("severity", &self.severity)
            .field("options", &self.options)
            .finish()
    }
}

/// The rules of a run, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ActiveRuleSet {
    rules: Vec<ActiveRule>,
    /// Every rule suppression comments may name, active or not.
    known: FxHashSet<&'static str>,
    config_errors: Vec<ConfigError>,
}

impl ActiveRuleSet {
    /// Exactly `rules`, in that order.
    pub fn new(rules: Vec<ActiveRule>) -> Self {
        let known = rules.iter().map(ActiveRule::name).collect();
        Self { rules, known, config_errors: Vec::new() }
    }

    /// The rules of `registry` enabled by default.
    pub fn defaults(registry: &Registry) -> Self {
        Self::resolve(registry, &Config::default())
    }

    /// Select the rules of `registry` that `config` enables and validate
    /// their options.
    ///
    /// `select` (or the rules enabled by default) comes first, then every
    /// rule given a severity other than `off` is added, then `ignore`
    /// removes rules. A rule whose options are invalid is left out and the
    /// error is kept in [`ActiveRuleSet::config_errors`].
    pub fn resolve(registry: &Registry, config: &Config) -> Self {
        let lint = &config.lint;
        let mut config_errors = Vec::new();
        let mut unknown = |name: &str| {
            let unknown = !registry.contains(name);
            if unknown {
                config_errors.push(ConfigError::UnknownRule(name.to_string()));
            }
            unknown
        };

        let mut selected: FxHashSet<&str> = FxHashSet::default();
        match &lint.select {
            None => selected.extend(
                registry
                    .iter()
                    .map(|rule| rule.meta())
                    .filter(|meta| meta.is_enabled_by_default())
                    .map(|meta| meta.name),
            ),
            Some(names) => {
                for name in names {
                    if name == "ALL" {
                        selected.extend(registry.iter().map(|rule| rule.meta().name));
                    } else if !unknown(name) {
                        selected.insert(name.as_str());
                    }
                }
            }
        }
        for (name, rule_config) in &lint.rules {
            if unknown(name) {
                continue;
            }
            if rule_config.severity.is_some_and(|severity| !severity.is_off()) {
                selected.insert(name.as_str());
            }
        }
        for name in &lint.ignore {
            if !unknown(name) {
                selected.remove(name.as_str());
            }
        }

        let mut rules = Vec::new();
        for rule in registry.iter() {
            let meta = rule.meta();
            if !selected.contains(meta.name) {
                continue;
            }

            let rule_config = lint.rules.get(meta.name);
            let severity = rule_config
                .and_then(|rule_config| rule_config.severity)
                .unwrap_or(meta.default_severity);
            if severity.is_off() {
                continue;
            }

            let options = match rule_config {
                Some(rule_config) => {
                    RuleOptions::resolve(meta.name, meta.schema, &rule_config.options)
                }
                None => Ok(RuleOptions::defaults(meta.schema)),
            };
            let options = match options {
                Ok(options) => options,
                Err(error) => {
                    tracing::debug!(rule = meta.name, %error, "Invalid rule options");
                    config_errors.push(error);
                    continue;
                }
            };
            if let Err(error) = rule.validate(&options) {
                let message = format!("{error:#}");
                tracing::debug!(rule = meta.name, %message, "Rule rejected its options");
                config_errors.push(ConfigError::Rejected { rule: meta.name.to_string(), message });
                continue;
            }

            rules.push(ActiveRule { rule: Arc::clone(rule), severity, options });
        }

        tracing::debug!(
            active = rules.len(),
            errors = config_errors.len(),
            "Resolved the active rules"
        );

        Self {
            rules,
            known: registry.iter().map(|rule| rule.meta().name).collect(),
            config_errors,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveRule> {
        self.rules.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ActiveRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether suppression comments may name `rule`.
    pub fn is_known(&self, rule: &str) -> bool {
        self.known.contains(rule)
    }

    pub fn config_errors(&self) -> &[ConfigError] {
        &self.config_errors
    }
}
