//! Shared primitives for all Rust crates in the Authress provider.

#![forbid(unsafe_code)]

/// Diagnostics reported back to the plugin host.
pub mod diagnostics;
/// Tri-state attribute values exchanged with the plugin host.
pub mod value;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use diagnostics::{AttributePath, Diagnostic, Diagnostics, Severity};
pub use value::TfValue;

/// Result type used across provider crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist locally.
    #[error("not found: {0}")]
    NotFound(String),

    /// Provider settings are missing, unknown or unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote API answered with a status other than 200.
    #[error("status: {status}, body: {body}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The remote API answered 200 but the body could not be decoded.
    #[error("invalid response body: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status for remote errors.
    #[must_use]
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Reports whether the remote answered with markup instead of JSON.
    ///
    /// A custom domain that points at a website rather than the Authress API
    /// yields an HTML page, so callers use this to replace the raw decoder
    /// message with configuration guidance.
    #[must_use]
    pub fn indicates_html_response(&self) -> bool {
        match self {
            Self::Remote { body, .. } | Self::Decode { body, .. } => {
                body.trim_start().starts_with('<')
            }
            _ => false,
        }
    }
}
