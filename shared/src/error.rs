//! Error types for the AI tutor services.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the AI tutor services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Upstream completion failure; the message is surfaced to API callers as-is.
    #[error("{0}")]
    Upstream(String),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_message_is_unprefixed() {
        let err = Error::Upstream("quota exceeded".into());
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_other_variants_are_prefixed() {
        assert_eq!(
            Error::Config("PORT must be a number".into()).to_string(),
            "Configuration error: PORT must be a number"
        );
        assert_eq!(Error::Aws("denied".into()).to_string(), "AWS error: denied");
    }
}
