// Rule engine

use crate::config::ValidatorConfig;
use crate::errors::{Result, ValidatorError};
use crate::flatten::{FlattenedData, flatten};
use crate::result::{MessageBag, ValidationResult};
use crate::rules::RuleSet;
use crate::value::FlatValue;
use serde_json::Value;
use tracing::{debug, trace};

/// Validates flattened input against pipe-delimited rule declarations.
///
/// A validator only holds configuration. Each call flattens its own input
/// and fills its own message bag, so one validator can be shared freely.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with `config`.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Flatten `fields` and `files` and check them against `rules`.
    ///
    /// `rules` pairs attribute paths (`email`, `name.*`) with rule strings
    /// (`required|email`) and is evaluated in order.
    pub fn validate<I, A, R>(&self, fields: &Value, files: &Value, rules: I) -> Result<ValidationResult>
    where
        I: IntoIterator<Item = (A, R)>,
        A: AsRef<str>,
        R: AsRef<str>,
    {
        let data = flatten(fields, files);
        self.validate_flattened(&data, rules)
    }

    /// Check already flattened data against `rules`.
    pub fn validate_flattened<I, A, R>(&self, data: &FlattenedData, rules: I) -> Result<ValidationResult>
    where
        I: IntoIterator<Item = (A, R)>,
        A: AsRef<str>,
        R: AsRef<str>,
    {
        let mut messages = MessageBag::new();
        let mut declarations = 0usize;

        for (attribute, rules) in rules {
            let (attribute, rules) = (attribute.as_ref(), rules.as_ref());
            declarations += 1;

            if data.is_empty() {
                return Err(ValidatorError::NoDataToValidate);
            }

            let rule_set = RuleSet::parse(rules)?;
            let targets = resolve(data, attribute);

            for token in rule_set.tokens() {
                let predicate = token.rule.predicate();
                for target in &targets {
                    let passed = predicate(data, target, &token.parameters, &self.config);
                    trace!(attribute = %target, rule = %token.rule, passed, "Checked rule");

                    if !passed {
                        let message =
                            self.config
                                .messages
                                .render(token.rule, target, &token.parameters);
                        messages.add(target, message);
                    }
                }
            }

            if rule_set.is_nullable() {
                for target in &targets {
                    if is_blank(data, target) && messages.remove(target).is_some() {
                        trace!(attribute = %target, "Discarded failure for empty nullable value");
                    }
                }
            }
        }

        debug!(
            declarations,
            values = data.len(),
            failures = messages.len(),
            "Validation finished"
        );

        Ok(ValidationResult::new(messages))
    }
}

/// Validate with the default configuration.
///
/// Shorthand for `Validator::new().validate(fields, files, rules)`.
pub fn validate<I, A, R>(fields: &Value, files: &Value, rules: I) -> Result<ValidationResult>
where
    I: IntoIterator<Item = (A, R)>,
    A: AsRef<str>,
    R: AsRef<str>,
{
    Validator::new().validate(fields, files, rules)
}

/// Whether `attribute` itself holds nothing.
///
/// Unlike `required`, an element of a group is judged on its own value,
/// not on its siblings. A group is blank when all of its elements are.
fn is_blank(data: &FlattenedData, attribute: &str) -> bool {
    if data.is_group(attribute) {
        return data.group_elements(attribute).all(|(_, value)| value.is_empty());
    }
    data.get(attribute).is_none_or(FlatValue::is_empty)
}

/// Expand a declared attribute into the concrete paths to check.
///
/// A plain attribute is checked as declared. A wildcard attribute is
/// checked once per matching element, with each `*` replaced by the
/// element's key at that position. Keys under other fields never match.
/// When no element matches, the bare field name is checked instead so
/// rules like `required` still see the field.
pub(crate) fn resolve(data: &FlattenedData, attribute: &str) -> Vec<String> {
    let pattern: Vec<&str> = attribute.split('.').collect();
    let Some(first_wildcard) = pattern.iter().position(|s| *s == "*") else {
        return vec![attribute.to_string()];
    };

    let mut targets: Vec<String> = Vec::new();
    for key in data.keys() {
        let segments: Vec<&str> = key.split('.').collect();
        if segments.len() <= first_wildcard || segments[..first_wildcard] != pattern[..first_wildcard] {
            continue;
        }

        let concrete: Option<Vec<&str>> = pattern
            .iter()
            .enumerate()
            .map(|(i, segment)| match *segment {
                "*" => segments.get(i).copied(),
                literal => Some(literal),
            })
            .collect();

        if let Some(concrete) = concrete {
            let concrete = concrete.join(".");
            if !targets.contains(&concrete) {
                targets.push(concrete);
            }
        }
    }

    if targets.is_empty() {
        targets.push(pattern[..first_wildcard].join("."));
    }

    targets
}
