// Validation results

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// Failure messages keyed by concrete attribute path.
///
/// Holds at most one message per attribute: the first failure recorded
/// wins and later ones are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageBag {
    messages: IndexMap<String, String>,
}

impl MessageBag {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `attribute` unless one is already recorded.
    ///
    /// Returns whether the message was stored.
    pub fn add(&mut self, attribute: &str, message: impl Into<String>) -> bool {
        if self.messages.contains_key(attribute) {
            return false;
        }
        self.messages.insert(attribute.to_string(), message.into());
        true
    }

    /// Drop the message for `attribute`.
    pub fn remove(&mut self, attribute: &str) -> Option<String> {
        self.messages.shift_remove(attribute)
    }

    /// Message recorded for `attribute`.
    pub fn get(&self, attribute: &str) -> Option<&str> {
        self.messages.get(attribute).map(String::as_str)
    }

    /// Whether `attribute` has a message.
    pub fn has(&self, attribute: &str) -> bool {
        self.messages.contains_key(attribute)
    }

    /// Messages in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes with a message.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if there are any messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The underlying map.
    pub fn into_inner(self) -> IndexMap<String, String> {
        self.messages
    }
}

/// Outcome of one validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    messages: MessageBag,
}

impl ValidationResult {
    pub(crate) fn new(messages: MessageBag) -> Self {
        Self { messages }
    }

    /// Whether any attribute failed.
    pub fn fails(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Whether every attribute passed.
    pub fn passes(&self) -> bool {
        self.messages.is_empty()
    }

    /// Failure messages by attribute.
    pub fn messages(&self) -> &MessageBag {
        &self.messages
    }

    /// Failure message for `attribute`.
    pub fn first(&self, attribute: &str) -> Option<&str> {
        self.messages.get(attribute)
    }

    /// Whether `attribute` failed.
    pub fn has(&self, attribute: &str) -> bool {
        self.messages.has(attribute)
    }

    /// Number of failed attributes.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Take the failure messages.
    pub fn into_messages(self) -> MessageBag {
        self.messages
    }

    /// Convert to JSON representation
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "errors": self.messages.iter().map(|(field, message)| {
                serde_json::json!({
                    "field": field,
                    "message": message,
                })
            }).collect::<Vec<_>>()
        })
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (field, message) in self.messages.iter() {
            writeln!(f, "{}: {}", field, message)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_wins() {
        let mut bag = MessageBag::new();
        assert!(bag.add("email", "The email is required"));
        assert!(!bag.add("email", "The email must be a valid email"));
        assert_eq!(bag.get("email"), Some("The email is required"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut bag = MessageBag::new();
        bag.add("a", "1");
        bag.add("b", "2");
        bag.add("c", "3");
        bag.remove("b");
        assert_eq!(bag.iter().map(|(k, _)| k).collect::<Vec<_>>(), ["a", "c"]);
    }

    #[test]
    fn test_result_to_json() {
        let mut bag = MessageBag::new();
        bag.add("age", "The age must be an integer");
        let result = ValidationResult::new(bag);

        assert!(result.fails());
        assert!(result.has("age"));
        assert_eq!(result.len(), 1);
        assert_eq!(
            result.to_json(),
            serde_json::json!({
                "errors": [{"field": "age", "message": "The age must be an integer"}]
            })
        );
        assert_eq!(result.to_string(), "age: The age must be an integer\n");
    }

    #[test]
    fn test_bag_serializes_as_map() {
        let mut bag = MessageBag::new();
        bag.add("name.0", "The name.0 is required");
        assert_eq!(
            serde_json::to_value(&bag).unwrap(),
            serde_json::json!({"name.0": "The name.0 is required"})
        );
    }
}
