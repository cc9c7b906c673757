/// Configuration for directory resolution
use crate::error::{UserDirError, UserDirResult};
use std::env;

/// Resolution configuration, fixed at construction.
///
/// Reconfiguration is a new instance; nothing mutates this while lookups
/// are running. Cache capacity and expiration are constants in
/// [`crate::cache`].
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Email addresses must end with this suffix to be resolved; stripping
    /// it yields the candidate username. Matching is exact, with no case
    /// folding or trimming.
    pub email_suffix: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            email_suffix: "@example.com".to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> UserDirResult<Self> {
        dotenv::dotenv().ok();

        let email_suffix =
            env::var("USERDIR_EMAIL_SUFFIX").unwrap_or_else(|_| "@example.com".to_string());

        let config = Self { email_suffix };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> UserDirResult<()> {
        if self.email_suffix.is_empty() {
            return Err(UserDirError::Validation(
                "Email suffix cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
