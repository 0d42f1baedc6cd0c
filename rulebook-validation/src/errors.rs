// Validator errors

use thiserror::Error;

/// Conditions that abort a validation call.
///
/// These signal a bug in the caller's rule declarations or configuration.
/// Bad input data never shows up here; it is reported through the
/// [`MessageBag`](crate::MessageBag).
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("The validation {{{0}}} not found")]
    UnknownRule(String),

    #[error("No data to validate")]
    NoDataToValidate,

    #[error("Invalid message catalog: {0}")]
    Catalog(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ValidatorError {
    fn from(err: serde_json::Error) -> Self {
        ValidatorError::Catalog(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ValidatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_message() {
        let err = ValidatorError::UnknownRule("alpha_dash".to_string());
        assert_eq!(err.to_string(), "The validation {alpha_dash} not found");
    }
}
