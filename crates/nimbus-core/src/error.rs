//! Centralized error types for the Nimbus application.
//!
//! The widget crates keep their own typed errors; everything converges here
//! at the application boundary, where `user_message()` produces text safe to
//! show on the new-tab page.

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadFailed(String),

    #[error("Failed to parse config: {0}")]
    ParseFailed(String),

    #[error("Failed to write config: {0}")]
    WriteFailed(String),

    #[error("Invalid config value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    /// Returns a user-friendly message suitable for display in the UI.
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::ReadFailed(_) | ConfigError::WriteFailed(_) => {
                "Could not access the settings file."
            }
            ConfigError::ParseFailed(_) | ConfigError::InvalidValue { .. } => {
                "The settings file is invalid."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_user_messages() {
        let err = ConfigError::ReadFailed("denied".into());
        assert!(err.user_message().contains("settings file"));

        let err = ConfigError::InvalidValue {
            field: "weather.language".into(),
            message: "empty".into(),
        };
        assert!(err.user_message().contains("invalid"));
    }

    #[test]
    fn test_app_error_wraps_config() {
        let err: AppError = ConfigError::ParseFailed("bad toml".into()).into();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!err.user_message().is_empty());
    }
}
