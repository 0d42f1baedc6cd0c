// Validator configuration

use crate::errors::{Result, ValidatorError};
use crate::messages::MessageCatalog;
use std::env;
use tracing::warn;

/// Extensions accepted by the `image` rule unless configured otherwise.
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["jpeg", "png", "gif", "bmp", "svg"];

/// Minimum `strong_password` length when the rule has no parameter.
pub const DEFAULT_PASSWORD_MIN_LENGTH: usize = 8;

/// Validator configuration.
///
/// # Environment Variables
///
/// - `RULEBOOK_MESSAGES` - path to a JSON file of message template overrides
/// - `RULEBOOK_IMAGE_EXTENSIONS` - comma list of extensions for `image`
/// - `RULEBOOK_PASSWORD_MIN_LENGTH` - default `strong_password` length
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Failure message templates
    pub messages: MessageCatalog,
    /// Extensions the `image` rule accepts
    pub image_extensions: Vec<String>,
    /// Default minimum length for `strong_password`
    pub password_min_length: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            messages: MessageCatalog::new(),
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            password_min_length: DEFAULT_PASSWORD_MIN_LENGTH,
        }
    }
}

impl ValidatorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables, keeping the default for
    /// any value that cannot be used.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let lookup = |key: &str| env::var(key).ok();

        for key in [ENV_MESSAGES, ENV_IMAGE_EXTENSIONS, ENV_PASSWORD_MIN_LENGTH] {
            if let Err(e) = config.apply(key, lookup) {
                warn!(variable = key, error = %e, "Ignoring invalid configuration");
            }
        }

        config
    }

    /// Create config from environment variables, failing on the first
    /// value that cannot be used.
    pub fn try_from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for key in [ENV_MESSAGES, ENV_IMAGE_EXTENSIONS, ENV_PASSWORD_MIN_LENGTH] {
            config.apply(key, &lookup)?;
        }
        Ok(config)
    }

    fn apply<F>(&mut self, key: &str, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(value) = lookup(key) else {
            return Ok(());
        };

        match key {
            ENV_MESSAGES => self.messages = MessageCatalog::load(value.trim())?,
            ENV_IMAGE_EXTENSIONS => {
                let extensions: Vec<String> = value
                    .split(',')
                    .map(|e| e.trim().to_lowercase())
                    .filter(|e| !e.is_empty())
                    .collect();
                if extensions.is_empty() {
                    return Err(ValidatorError::Config(format!("{} is empty", key)));
                }
                self.image_extensions = extensions;
            }
            ENV_PASSWORD_MIN_LENGTH => {
                self.password_min_length = value.trim().parse().map_err(|_| {
                    ValidatorError::Config(format!("{} must be a number, got {:?}", key, value))
                })?;
            }
            _ => {}
        }

        Ok(())
    }

    /// Set the message catalog.
    pub fn with_messages(mut self, messages: MessageCatalog) -> Self {
        self.messages = messages;
        self
    }

    /// Set the extensions the `image` rule accepts.
    pub fn with_image_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.image_extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default `strong_password` length.
    pub fn with_password_min_length(mut self, length: usize) -> Self {
        self.password_min_length = length;
        self
    }
}

const ENV_MESSAGES: &str = "RULEBOOK_MESSAGES";
const ENV_IMAGE_EXTENSIONS: &str = "RULEBOOK_IMAGE_EXTENSIONS";
const ENV_PASSWORD_MIN_LENGTH: &str = "RULEBOOK_PASSWORD_MIN_LENGTH";
