//! Rule-string validation for form-style input.
//!
//! Input is a JSON tree of fields plus an optional tree of uploaded files.
//! Both are flattened into dot-joined paths (`name.0`, `users.1.email`)
//! and checked against declarations such as `"required|email"` or
//! `"name.*" => "required|min:3"`. The result maps each failing attribute
//! to the first message it produced.
//!
//! # Examples
//!
//! ## Basic Validation
//!
//! ```
//! use rulebook_validation::{Validator, rules};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), rulebook_validation::ValidatorError> {
//! let fields = json!({"email": "not-an-email", "age": 42});
//!
//! let result = Validator::new().validate(
//!     &fields,
//!     &json!({}),
//!     rules! {
//!         "email" => "required|email",
//!         "age" => "integer",
//!     },
//! )?;
//!
//! assert!(result.fails());
//! assert_eq!(result.first("email"), Some("The email must be a valid email"));
//! assert_eq!(result.first("age"), None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Array Fields
//!
//! ```
//! use rulebook_validation::validate;
//! use serde_json::json;
//!
//! # fn main() -> Result<(), rulebook_validation::ValidatorError> {
//! let fields = json!({"name": ["dfd", ""]});
//! let result = validate(&fields, &json!({}), [("name.*", "string|min:2")])?;
//!
//! assert_eq!(result.first("name.1"), Some("The name.1 must be atleast minimum of 2"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Custom Messages
//!
//! ```
//! use rulebook_validation::{MessageCatalog, Rule, Validator, ValidatorConfig};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), rulebook_validation::ValidatorError> {
//! let messages = MessageCatalog::new().with(Rule::Required, "Please fill in :attribute");
//! let validator = Validator::with_config(ValidatorConfig::new().with_messages(messages));
//!
//! let result = validator.validate(&json!({"city": ""}), &json!({}), [("city", "required")])?;
//! assert_eq!(result.first("city"), Some("Please fill in city"));
//! # Ok(())
//! # }
//! ```

mod config;
mod engine;
mod errors;
mod flatten;
mod messages;
mod result;
mod rules;
mod validators;
mod value;

pub use config::*;
pub use engine::*;
pub use errors::*;
pub use flatten::*;
pub use messages::*;
pub use result::*;
pub use rules::*;
pub use validators::Predicate;
pub use value::*;

/// Builds an ordered list of `(attribute, rules)` declarations.
///
/// ```
/// let declarations = rulebook_validation::rules! {
///     "email" => "required|email",
///     "name.*" => "string",
/// };
/// assert_eq!(declarations[1], ("name.*".to_string(), "string".to_string()));
/// ```
#[macro_export]
macro_rules! rules {
    ($($attribute:expr => $rules:expr),* $(,)?) => {{
        let declarations: ::std::vec::Vec<(::std::string::String, ::std::string::String)> =
            ::std::vec![$(($attribute.to_string(), $rules.to_string())),*];
        declarations
    }};
}

/// Predicate functions for each built-in rule.
pub mod predicates {
    pub use crate::validators::{
        array, confirmed, email, image, integer, max, mimes, min, number, required,
        required_with_all, string, strong_password, url,
    };
}
