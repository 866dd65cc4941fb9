//! Error types for s4-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for s4-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s4-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid object key or prefix
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// User input rejected before any remote call was made
    #[error("{0}")]
    Validation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// s3cmd-style INI parsing error
    #[error("Credentials file error: {0}")]
    Ini(#[from] ini::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Authentication error
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network error (retryable)
    #[error("Network error: {0}")]
    Network(String),

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidKey(_) | Error::Validation(_) => 2, // UsageError
            Error::Config(_) | Error::Ini(_) => 2,           // UsageError
            Error::TomlParse(_) | Error::InvalidUrl(_) => 2, // UsageError
            Error::Network(_) => 3,                          // NetworkError
            Error::Auth(_) => 4,                             // AuthError
            Error::NotFound(_) => 5,                         // NotFound
            Error::Conflict(_) => 6,                         // Conflict
            _ => 1,                                          // GeneralError
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(Error::InvalidKey("test".into()).exit_code(), 2);
        assert_eq!(Error::Validation("test".into()).exit_code(), 2);
        assert_eq!(Error::Config("test".into()).exit_code(), 2);
        assert_eq!(Error::Network("test".into()).exit_code(), 3);
        assert_eq!(Error::Auth("test".into()).exit_code(), 4);
        assert_eq!(Error::NotFound("test".into()).exit_code(), 5);
        assert_eq!(Error::Conflict("test".into()).exit_code(), 6);
        assert_eq!(Error::General("test".into()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = Error::NotFound("bucket 'photos' does not exist".into());
        assert_eq!(err.to_string(), "Not found: bucket 'photos' does not exist");

        let err = Error::Validation("Name cannot be empty".into());
        assert_eq!(err.to_string(), "Name cannot be empty");
    }
}
