use thiserror::Error;

/// Failure raised by a pagination, query or payload extractor
///
/// The message reaches the client unchanged in the 500 response body.
///
/// # Example
///
/// ```rust
/// use resty::extract::ExtractorError;
///
/// let error = ExtractorError::new("field \"email\" is required");
/// assert_eq!(error.to_string(), "field \"email\" is required");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtractorError {
    message: String,
}

impl ExtractorError {
    /// Create an extractor error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message sent to the client
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_json::Error> for ExtractorError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}
