//! Per-rule options.
//!
//! Every rule declares the options it accepts with a list of
//! [`OptionSpec`]s. The option table of a rule in the configuration file is
//! checked against it before anything runs: unknown keys and values of the
//! wrong type are configuration errors, and the rule is left out of the run.

use std::collections::BTreeMap;

use crate::error::ConfigError;

/// The type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Integer,
    String,
    StringList,
    /// A string restricted to the given values.
    Enum(&'static [&'static str]),
}

impl OptionKind {
    fn describe(self) -> String {
        match self {
            OptionKind::Bool => "a boolean".to_string(),
            OptionKind::Integer => "an integer".to_string(),
            OptionKind::String => "a string".to_string(),
            OptionKind::StringList => "a list of strings".to_string(),
            OptionKind::Enum(values) => format!("one of {}", quoted_list(values)),
        }
    }
}

/// Default value of an option, usable in `const` rule metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    Bool(bool),
    Integer(i64),
    String(&'static str),
    StringList(&'static [&'static str]),
}

impl OptionDefault {
    fn to_value(self) -> OptionValue {
        match self {
            OptionDefault::Bool(value) => OptionValue::Bool(value),
            OptionDefault::Integer(value) => OptionValue::Integer(value),
            OptionDefault::String(value) => OptionValue::String(value.to_string()),
            OptionDefault::StringList(values) => {
                OptionValue::StringList(values.iter().map(|value| value.to_string()).collect())
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub kind: OptionKind,
    pub default: OptionDefault,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    String(String),
    StringList(Vec<String>),
}

/// Validated options of one rule. Every option of the schema is present,
/// either configured or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleOptions {
    values: BTreeMap<&'static str, OptionValue>,
}

impl RuleOptions {
    /// The defaults of every option in `schema`.
    pub fn defaults(schema: &[OptionSpec]) -> Self {
        let values = schema
            .iter()
            .map(|spec| (spec.name, spec.default.to_value()))
            .collect();
        Self { values }
    }

    /// Check the configured `table` of `rule` against `schema`.
    pub fn resolve(
        rule: &str,
        schema: &[OptionSpec],
        table: &toml::Table,
    ) -> Result<RuleOptions, ConfigError> {
        let mut options = Self::defaults(schema);

        for (key, value) in table {
            let Some(spec) = schema.iter().find(|spec| spec.name == key) else {
                return Err(ConfigError::UnknownOption { rule: rule.to_string(), key: key.clone() });
            };
            let invalid_type = || ConfigError::InvalidType {
                rule: rule.to_string(),
                key: key.clone(),
                expected: spec.kind.describe(),
                found: value.type_str().to_string(),
            };

            let value = match (spec.kind, value) {
                (OptionKind::Bool, toml::Value::Boolean(value)) => OptionValue::Bool(*value),
                (OptionKind::Integer, toml::Value::Integer(value)) => OptionValue::Integer(*value),
                (OptionKind::String, toml::Value::String(value)) => {
                    OptionValue::String(value.clone())
                }
                (OptionKind::Enum(allowed), toml::Value::String(value)) => {
                    if !allowed.contains(&value.as_str()) {
                        return Err(ConfigError::InvalidValue {
                            rule: rule.to_string(),
                            key: key.clone(),
                            allowed: quoted_list(allowed),
                            found: value.clone(),
                        });
                    }
                    OptionValue::String(value.clone())
                }
                (OptionKind::StringList, toml::Value::Array(items)) => {
                    let items = items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(invalid_type)?;
                    OptionValue::StringList(items)
                }
                _ => return Err(invalid_type()),
            };
            options.values.insert(spec.name, value);
        }

        Ok(options)
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            OptionValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_integer(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            OptionValue::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            OptionValue::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        match self.get(name)? {
            OptionValue::StringList(values) => Some(values),
            _ => None,
        }
    }
}

fn quoted_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|value| format!("\"{value}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &[OptionSpec] = &[
        OptionSpec {
            name: "max",
            kind: OptionKind::Integer,
            default: OptionDefault::Integer(4),
            description: "",
        },
        OptionSpec {
            name: "vars",
            kind: OptionKind::Enum(&["all", "local"]),
            default: OptionDefault::String("all"),
            description: "",
        },
        OptionSpec {
            name: "exceptions",
            kind: OptionKind::StringList,
            default: OptionDefault::StringList(&[]),
            description: "",
        },
    ];

    fn resolve(table: &str) -> Result<RuleOptions, ConfigError> {
        let table: toml::Table = toml::from_str(table).unwrap();
        RuleOptions::resolve("some-rule", SCHEMA, &table)
    }

    #[test]
    fn test_defaults_are_filled_in() {
        let options = resolve("max = 2").unwrap();
        assert_eq!(options.get_integer("max"), Some(2));
        assert_eq!(options.get_str("vars"), Some("all"));
        assert_eq!(options.get_list("exceptions"), Some(&[][..]));
        assert_eq!(options.get_bool("max"), None);
        assert_eq!(options.get("other"), None);
    }

    #[test]
    fn test_valid_values() {
        let options = resolve("vars = \"local\"\nexceptions = [\"Object\", \"Array\"]").unwrap();
        assert_eq!(options.get_str("vars"), Some("local"));
        assert_eq!(
            options.get_list("exceptions"),
            Some(&["Object".to_string(), "Array".to_string()][..])
        );
    }

    #[test]
    fn test_invalid_options() {
        insta::assert_snapshot!(
            resolve("maximum = 2").unwrap_err(),
            @"rule `some-rule`: unknown option `maximum`"
        );
        insta::assert_snapshot!(
            resolve("max = \"2\"").unwrap_err(),
            @"rule `some-rule`: option `max` expects an integer, found string"
        );
        insta::assert_snapshot!(
            resolve("vars = \"some\"").unwrap_err(),
            @r#"rule `some-rule`: option `vars` must be one of "all", "local", found `some`"#
        );
        insta::assert_snapshot!(
            resolve("exceptions = [\"a\", 1]").unwrap_err(),
            @"rule `some-rule`: option `exceptions` expects a list of strings, found array"
        );
    }
}
