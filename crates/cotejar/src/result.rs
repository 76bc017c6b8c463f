//! Result and error types for Cotejar.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Cotejar operations
pub type CotejarResult<T> = Result<T, CotejarError>;

/// Errors that can occur while building a visual regression report
#[derive(Debug, Error)]
pub enum CotejarError {
    /// A capture id was submitted twice in the same session
    #[error("Capture id already used: \"{id}\"")]
    DuplicateCapture {
        /// The offending capture id
        id: String,
    },

    /// A capture was submitted with an empty id
    #[error("Capture id must not be empty")]
    EmptyCaptureId,

    /// The report folder layout could not be prepared
    #[error("Failed to prepare report layout at {}: {source}", .path.display())]
    Layout {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying filesystem error
        source: std::io::Error,
    },

    /// An image byte stream could not be decoded
    #[error("Failed to decode image: {message}")]
    Decode {
        /// Error message
        message: String,
    },

    /// A diff image could not be encoded
    #[error("Failed to encode image: {message}")]
    Encode {
        /// Error message
        message: String,
    },

    /// A base64 capture payload was malformed
    #[error("Invalid base64 capture payload: {0}")]
    Base64(#[from] base64::DecodeError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_capture_names_id() {
        let err = CotejarError::DuplicateCapture {
            id: String::from("login-button"),
        };
        assert_eq!(
            err.to_string(),
            "Capture id already used: \"login-button\""
        );
    }

    #[test]
    fn test_layout_error_names_path() {
        let err = CotejarError::Layout {
            path: PathBuf::from("/nope/report"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let message = err.to_string();
        assert!(message.contains("/nope/report"));
        assert!(message.contains("denied"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = CotejarError::from(io);
        assert!(matches!(err, CotejarError::Io(_)));
    }
}
