// Rulebook - pipe-rule validation for form fields and file uploads
//
// This library re-exports the member crates behind feature flags and offers
// a prelude for the common imports.

// Re-export optional crates
#[cfg(feature = "validation")]
pub use rulebook_validation;

#[cfg(feature = "files")]
pub use rulebook_files;

#[cfg(feature = "validation")]
pub use rulebook_validation::{
    FlattenedData, MessageBag, MessageCatalog, Rule, RuleSet, ValidationResult, Validator,
    ValidatorConfig, ValidatorError, rules, validate,
};

#[cfg(feature = "files")]
pub use rulebook_files::{FileError, UploadedFile};

// Prelude for common imports
pub mod prelude {
    pub use serde_json::json;

    #[cfg(feature = "files")]
    pub use crate::UploadedFile;

    #[cfg(feature = "validation")]
    pub use crate::{
        MessageCatalog, Rule, ValidationResult, Validator, ValidatorConfig, ValidatorError,
        rules, validate,
    };
}
