//! Domain-level error types.
//!
//! These errors are transport agnostic. Every façade operation returns
//! [`Error`]; services build it from the failing port's error so callers can
//! branch on [`ErrorCode`] while the original cause stays available in
//! [`Error::details`] for logging.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::ports::BackendFailure;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Credentials were rejected or no session exists.
    AuthFailed,
    /// The requested resource does not exist.
    NotFound,
    /// Input failed validation locally or was rejected by the backend.
    ValidationFailed,
    /// A file could not be stored.
    UploadFailed,
    /// Transport, decoding or otherwise unclassified failure.
    Unknown,
}

impl ErrorCode {
    fn fallback_message(self) -> &'static str {
        match self {
            Self::AuthFailed => "authentication failed",
            Self::NotFound => "resource not found",
            Self::ValidationFailed => "validation failed",
            Self::UploadFailed => "upload failed",
            Self::Unknown => "unexpected backend failure",
        }
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is non-empty once trimmed of whitespace. Blank messages are
///   replaced by a per-code fallback.
///
/// # Examples
/// ```
/// use aora_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("missing");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "missing");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            code.fallback_message().to_owned()
        } else {
            message
        };
        Self {
            code,
            message,
            details: None,
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary error details, including the preserved cause.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Record the underlying failure under `details.cause`.
    ///
    /// # Examples
    /// ```
    /// use aora_backend::domain::Error;
    ///
    /// let err = Error::unknown("backend unavailable").with_cause("status 503");
    /// assert_eq!(err.cause(), Some("status 503"));
    /// ```
    pub fn with_cause(self, cause: impl std::fmt::Display) -> Self {
        self.with_details(json!({ "cause": cause.to_string() }))
    }

    /// The preserved cause, when one was recorded.
    pub fn cause(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|details| details.get("cause"))
            .and_then(Value::as_str)
    }

    /// Map a port failure into a domain error, keeping the port error as cause.
    ///
    /// Rejections and conflicts are the backend refusing input, so they
    /// surface as [`ErrorCode::ValidationFailed`].
    pub fn from_backend(
        failure: BackendFailure,
        message: impl Into<String>,
        cause: impl std::fmt::Display,
    ) -> Self {
        let code = match failure {
            BackendFailure::Unauthorized => ErrorCode::AuthFailed,
            BackendFailure::NotFound => ErrorCode::NotFound,
            BackendFailure::Conflict | BackendFailure::Rejected => ErrorCode::ValidationFailed,
            BackendFailure::Transport | BackendFailure::Decode => ErrorCode::Unknown,
        };
        Self::new(code, message).with_cause(cause)
    }

    /// Convenience constructor for [`ErrorCode::AuthFailed`].
    pub fn auth_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ValidationFailed`].
    pub fn validation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::UploadFailed`].
    pub fn upload_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UploadFailed, message)
    }

    /// Convenience constructor for [`ErrorCode::Unknown`].
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unknown, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
