//! Error types for embedding and completion operations.

use thiserror::Error;

/// Error type for remote LLM capabilities.
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    /// No API credential is configured. Surfaced as a distinct condition so
    /// the caller can point the user at settings instead of retrying.
    #[error("API key missing: configure an OpenRouter key in settings")]
    ApiKeyMissing,

    /// Transport-level failure (connection, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be interpreted.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for LLM operations.
pub type LlmResult<T> = Result<T, LlmError>;

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_missing_message_names_settings() {
        let msg = LlmError::ApiKeyMissing.to_string();
        assert!(msg.contains("API key missing"));
        assert!(msg.contains("settings"));
    }
}
