//! Error types for docflow.
//!
//! - [`ApiError`] - failures talking to the storage and workflow endpoints
//! - [`SelectionError`] - selection rejected before any request is made
//! - [`UploadError`] - upload form cannot be submitted
//!
//! Partial failures (some deletes or tasks failed) are not errors; they are
//! carried by [`crate::DeleteOutcome`] and [`crate::JobSummary`].

use serde::Deserialize;
use thiserror::Error;

use crate::types::Container;

// =============================================================================
// API Errors
// =============================================================================

/// Errors returned by a [`crate::StorageApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Request never produced a response (DNS, connection, CORS, timeout).
    #[error("{0}")]
    Network(String),

    /// Non-success HTTP status, with whatever error list the server sent.
    #[error("{}", server_display(.status, .errors))]
    Server { status: u16, errors: Vec<String> },

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    Decode(String),
}

fn server_display(status: &u16, errors: &[String]) -> String {
    if errors.is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, errors.join("\n"))
    }
}

/// Error bodies seen from the backend: `{errors: [...]}` or `{error: "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    /// Build a [`ApiError::Server`] from a status code and the raw body.
    ///
    /// JSON bodies contribute their `errors` list (or single `error`); plain
    /// text bodies are kept as one entry; empty bodies give no entries.
    pub fn from_response(status: u16, body: &str) -> Self {
        let body = body.trim();
        let errors = match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => {
                let mut errors = parsed.errors;
                errors.extend(parsed.error);
                errors
            }
            Err(_) if body.is_empty() => Vec::new(),
            Err(_) => vec![body.to_string()],
        };
        ApiError::Server { status, errors }
    }

    /// Text shown after `Error: ` when a job cannot be started.
    ///
    /// Server errors show their list, one per line, or `Unknown error`.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Server { errors, .. } if errors.is_empty() => "Unknown error".to_string(),
            ApiError::Server { errors, .. } => errors.join("\n"),
            other => other.to_string(),
        }
    }
}

// =============================================================================
// Selection Errors
// =============================================================================

/// Workflow preconditions that failed on the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// Nothing selected at all.
    #[error("Please select a file in the {0} container for this function to process")]
    Empty(Container),

    /// Files selected, none of them in the required container.
    #[error("Please select a file in the {0} container for this function to process")]
    NoneInContainer(Container),

    /// Some selected files are outside the required container.
    #[error("Please select only files in the {0} container for this function to process")]
    MixedContainers(Container),
}

// =============================================================================
// Upload Errors
// =============================================================================

/// Reasons an upload cannot be submitted or did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// No local file has been picked.
    #[error("No file selected")]
    NoFile,

    /// Another upload from the same form is still running.
    #[error("Upload already in progress")]
    Busy,

    /// File exceeds the configured limit.
    #[error("File too large ({size} bytes, limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// Local file could not be read.
    #[error("Could not read file")]
    Read(String),

    /// Server or transport rejected the upload.
    #[error("Upload failed")]
    Rejected(#[from] ApiError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for API calls.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_reads_error_list() {
        let err = ApiError::from_response(400, r#"{"errors": ["bad blob", "missing url"]}"#);
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                errors: vec!["bad blob".into(), "missing url".into()],
            }
        );
        assert_eq!(err.detail(), "bad blob\nmissing url");
    }

    #[test]
    fn test_from_response_single_error_and_plain_text() {
        let err = ApiError::from_response(500, r#"{"error": "boom"}"#);
        assert_eq!(err.detail(), "boom");

        let err = ApiError::from_response(500, "Error uploading file: denied");
        assert_eq!(err.to_string(), "HTTP 500: Error uploading file: denied");
    }

    #[test]
    fn test_detail_falls_back_to_unknown_error() {
        let err = ApiError::from_response(502, "");
        assert_eq!(err.to_string(), "HTTP 502");
        assert_eq!(err.detail(), "Unknown error");

        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.detail(), "connection refused");
    }

    #[test]
    fn test_selection_error_messages_name_container() {
        let msg = SelectionError::MixedContainers(Container::Bronze).to_string();
        assert_eq!(
            msg,
            "Please select only files in the bronze container for this function to process"
        );
    }
}
