//! Failure message catalog.
//!
//! Templates use two placeholders: `:attribute` (the concrete attribute
//! path) and `:extras` (the rule parameters joined by commas).

use crate::errors::{Result, ValidatorError};
use crate::rules::Rule;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const DEFAULT_TEMPLATES: &[(Rule, &str)] = &[
    (Rule::Required, "The :attribute is required"),
    (Rule::Email, "The :attribute must be a valid email"),
    (Rule::Integer, "The :attribute must be an integer"),
    (Rule::Array, "The :attribute must be an array"),
    (Rule::Image, "The :attribute must be a valid image"),
    (
        Rule::Confirmed,
        "The :attribute must be same with :attribute_confirmation",
    ),
    (Rule::Mimes, "The :attribute must be a mime type of :extras"),
    (Rule::Min, "The :attribute must be atleast minimum of :extras"),
    (Rule::Max, "The :attribute must be maximum of :extras"),
    (Rule::String, "The :attribute must be string"),
    (Rule::Number, "The :attribute must be a number"),
    (
        Rule::RequiredWithAll,
        "The :attribute field is required when :extras is present.",
    ),
    (
        Rule::StrongPassword,
        "Password must contain uppercase, lowercase, number, special characters and at least 8 characters",
    ),
    (Rule::Url, "The :attribute must be a valid url"),
];

/// Used for rules without a template of their own.
pub const FALLBACK_TEMPLATE: &str = "The :attribute is invalid";

/// Templates keyed by rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: HashMap<Rule, String>,
}

impl MessageCatalog {
    /// Create a catalog with the built-in English templates.
    pub fn new() -> Self {
        Self {
            templates: DEFAULT_TEMPLATES
                .iter()
                .map(|(rule, template)| (*rule, template.to_string()))
                .collect(),
        }
    }

    /// Override the template for `rule`.
    pub fn set(&mut self, rule: Rule, template: impl Into<String>) {
        self.templates.insert(rule, template.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, rule: Rule, template: impl Into<String>) -> Self {
        self.set(rule, template);
        self
    }

    /// Template for `rule`.
    pub fn get(&self, rule: Rule) -> &str {
        self.templates
            .get(&rule)
            .map(String::as_str)
            .unwrap_or(FALLBACK_TEMPLATE)
    }

    /// Apply overrides from a JSON object of `{"rule": "template"}`.
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let overrides: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

        for (name, template) in overrides {
            let rule: Rule = name.parse()?;
            let serde_json::Value::String(template) = template else {
                return Err(ValidatorError::Catalog(format!(
                    "template for {} must be a string",
                    name
                )));
            };
            self.set(rule, template);
        }

        Ok(())
    }

    /// Default catalog with overrides from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let mut catalog = Self::new();
        catalog.merge_json(json)?;
        Ok(catalog)
    }

    /// Default catalog with overrides from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Render the failure message for `rule` on `attribute`.
    pub fn render(&self, rule: Rule, attribute: &str, parameters: &[String]) -> String {
        self.get(rule)
            .replace(":attribute", attribute)
            .replace(":extras", &parameters.join(","))
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::new()
    }
}
