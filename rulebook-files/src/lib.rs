//! Uploaded file handling for rulebook
//!
//! Describes files received alongside form fields and resolves which
//! extensions they may carry, from their content first and their client
//! name second.
//!
//! # Examples
//!
//! ```
//! use rulebook_files::{FileError, UploadedFile};
//!
//! // A temp path that does not exist is not an upload.
//! let missing = UploadedFile::new("/tmp/php-does-not-exist", "car.jpg", 2048);
//! assert!(matches!(missing, Err(FileError::NotFound(_))));
//! ```

mod error;
mod file;
pub mod sniff;

pub use error::*;
pub use file::*;
pub use sniff::{is_sniffable, sniff_bytes, sniff_path};
