//! Uploaded file descriptor.

use crate::error::{FileError, FileResult};
use crate::sniff::{is_sniffable, sniff_path};
use mime::Mime;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A file received with a request and parked at a temporary path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFile {
    path: PathBuf,
    original_name: String,
    size: u64,
}

impl UploadedFile {
    /// Describe an upload stored at `path`.
    ///
    /// Fails when the temporary path does not exist or the declared size is
    /// zero; callers treat either case as "no file sent".
    pub fn new(
        path: impl Into<PathBuf>,
        original_name: impl Into<String>,
        size: u64,
    ) -> FileResult<Self> {
        let path = path.into();
        let original_name = original_name.into();

        if size == 0 {
            return Err(FileError::EmptyUpload {
                name: original_name,
            });
        }
        if !path.is_file() {
            return Err(FileError::NotFound(path.display().to_string()));
        }

        Ok(Self {
            path,
            original_name,
            size,
        })
    }

    /// Temporary path of the upload.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as sent by the client.
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    /// Size declared by the client.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Lowercased extension of the client file name.
    pub fn client_extension(&self) -> Option<String> {
        Path::new(&self.original_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
    }

    /// Content type of the upload.
    ///
    /// The file content wins; the client name is only consulted when the
    /// content is not recognised and the name does not claim a type whose
    /// signature should have been found.
    pub fn content_type(&self) -> Option<Mime> {
        match sniff_path(&self.path) {
            Ok(Some(mime)) => return Some(mime),
            Ok(None) => {}
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Failed to read upload");
                return None;
            }
        }

        mime_guess::from_path(&self.original_name)
            .first()
            .filter(|guess| !is_sniffable(guess.essence_str()))
    }

    /// Extensions the upload may legitimately carry, lowercased.
    pub fn extensions(&self) -> Vec<String> {
        let Some(mime) = self.content_type() else {
            return Vec::new();
        };

        let mut extensions: Vec<String> = mime_guess::get_mime_extensions(&mime)
            .unwrap_or_default()
            .iter()
            .map(|e| e.to_string())
            .collect();

        if let Some(client) = self.client_extension() {
            let claimed = mime_guess::from_ext(&client).iter().any(|m| m == mime);
            if claimed && !extensions.contains(&client) {
                extensions.push(client);
            }
        }

        extensions
    }

    /// Whether any resolved extension is in `allowed` (case-insensitive).
    pub fn has_extension_in<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        let extensions = self.extensions();
        allowed.iter().any(|a| {
            let a = a.as_ref().trim().to_lowercase();
            extensions.iter().any(|e| *e == a)
        })
    }
}
