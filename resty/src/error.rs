//! Error types and HTTP response conversion
//!
//! Every failure a request can hit, from body decoding to the adapter call,
//! becomes an [`Error`]. The responder renders all of them the same way: a
//! `500 Internal Server Error` with a JSON body `{"message": "..."}`. The
//! variant is only visible in the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::adapter::{AdapterError, AdapterErrorKind, Capability};
use crate::extract::ExtractorError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Crate error type
#[derive(Debug, Error)]
pub enum Error {
    /// A handler was reached for a capability the adapter does not provide
    #[error("{0} not yet implemented")]
    NotImplemented(Capability),

    /// A configured pagination, query or payload extractor failed
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// The request body or query string could not be decoded
    #[error("{0}")]
    MalformedRequest(String),

    /// The adapter rejected the call
    #[error("{message}")]
    Adapter {
        /// Capability that was called
        capability: Capability,
        /// Adapter error category
        kind: AdapterErrorKind,
        /// Whether the adapter reported a transient failure
        retriable: bool,
        /// Handler prefix followed by the adapter message
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Resource options rejected at construction
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap an adapter failure, prefixing its message with `prefix`
    ///
    /// # Example
    ///
    /// ```rust
    /// use resty::adapter::{AdapterError, Capability};
    /// use resty::Error;
    ///
    /// let error = Error::adapter(
    ///     Capability::SelectOne,
    ///     "could not get the resource \"42\"",
    ///     AdapterError::not_found("no such row"),
    /// );
    /// assert_eq!(error.to_string(), "could not get the resource \"42\", no such row");
    /// ```
    pub fn adapter(capability: Capability, prefix: impl AsRef<str>, err: AdapterError) -> Self {
        Self::Adapter {
            capability,
            kind: err.kind,
            retriable: err.is_retriable(),
            message: format!("{}, {}", prefix.as_ref(), err.message),
        }
    }

    /// Short name of the variant, used as the `kind` log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotImplemented(_) => "not_implemented",
            Self::Extractor(_) => "extractor",
            Self::MalformedRequest(_) => "malformed_request",
            Self::Adapter { .. } => "adapter",
            Self::Config(_) => "config",
            Self::InvalidOptions(_) => "invalid_options",
            Self::Io(_) => "io",
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Adapter {
                capability,
                kind,
                retriable,
                ..
            } => {
                tracing::error!(
                    kind = self.kind(),
                    capability = %capability,
                    adapter_kind = %kind,
                    retriable = *retriable,
                    "{}", self
                );
            }
            _ => tracing::error!(kind = self.kind(), "{}", self),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(self.to_string())),
        )
            .into_response()
    }
}
