//! Client error types.

use thiserror::Error;

use campuscal_core::TracingError;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A secret reference could not be resolved.
    #[error("secret error: {0}")]
    Secret(String),

    /// A date argument did not match the expected layout.
    #[error("invalid date {input:?}, expected {expected}")]
    DateArgument {
        input: String,
        expected: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tracing(#[from] TracingError),
}

impl ClientError {
    pub fn date_argument(input: impl Into<String>, expected: &'static str) -> Self {
        Self::DateArgument {
            input: input.into(),
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            ClientError::Config("bad url".into()).to_string(),
            "configuration error: bad url"
        );
        assert_eq!(
            ClientError::date_argument("2025-13", "YYYY-MM").to_string(),
            "invalid date \"2025-13\", expected YYYY-MM"
        );
    }

    #[test]
    fn io_conversion() {
        let err: ClientError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
