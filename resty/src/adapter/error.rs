//! Data adapter error types
//!
//! Adapters reject with an [`AdapterError`]. The kind is carried into the
//! request log; on the wire every adapter failure is a 500 whose message is
//! the handler prefix followed by [`AdapterError::message`].
//!
//! # Example
//!
//! ```rust
//! use resty::adapter::{AdapterError, AdapterErrorKind};
//!
//! let error = AdapterError::not_found("no user with id 42");
//! assert_eq!(error.kind, AdapterErrorKind::NotFound);
//! assert_eq!(error.to_string(), "no user with id 42");
//! ```

use std::fmt;

/// Category of adapter failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterErrorKind {
    /// The addressed resource does not exist
    NotFound,
    /// A resource with the same identity already exists
    AlreadyExists,
    /// The payload was rejected by the backend
    ValidationFailed,
    /// The backend could not be reached
    ConnectionFailed,
    /// The backend did not answer in time
    Timeout,
    /// The backend reported a failure while executing the operation
    Storage,
    /// The adapter result could not be converted to JSON
    Serialization,
    /// Anything else
    Other,
}

impl fmt::Display for AdapterErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::AlreadyExists => write!(f, "already_exists"),
            Self::ValidationFailed => write!(f, "validation_failed"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::Storage => write!(f, "storage"),
            Self::Serialization => write!(f, "serialization"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Failure returned by a data adapter capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterError {
    /// The category of failure
    pub kind: AdapterErrorKind,
    /// Human-readable reason, appended to the handler's message prefix
    pub message: String,
}

impl AdapterError {
    /// Create a new adapter error
    pub fn new(kind: AdapterErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a "not found" error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::NotFound, message)
    }

    /// Create an "already exists" error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::AlreadyExists, message)
    }

    /// Create a validation failed error
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::ValidationFailed, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Timeout, message)
    }

    /// Create a storage error
    ///
    /// # Example
    ///
    /// ```rust
    /// use resty::adapter::AdapterError;
    ///
    /// let error = AdapterError::storage("SQLITE_CONSTRAINT: UNIQUE constraint failed: users.email");
    /// assert!(!error.is_retriable());
    /// ```
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Storage, message)
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Serialization, message)
    }

    /// Create an unclassified error
    pub fn other(message: impl Into<String>) -> Self {
        Self::new(AdapterErrorKind::Other, message)
    }

    /// Check if this error is transient
    ///
    /// The router never retries; this is only reported in the request log.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            AdapterErrorKind::ConnectionFailed | AdapterErrorKind::Timeout
        )
    }
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for AdapterError {}

impl From<serde_json::Error> for AdapterError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<std::io::Error> for AdapterError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => AdapterErrorKind::NotFound,
            std::io::ErrorKind::AlreadyExists => AdapterErrorKind::AlreadyExists,
            std::io::ErrorKind::TimedOut => AdapterErrorKind::Timeout,
            std::io::ErrorKind::ConnectionRefused
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::ConnectionAborted => AdapterErrorKind::ConnectionFailed,
            _ => AdapterErrorKind::Storage,
        };
        Self::new(kind, err.to_string())
    }
}
