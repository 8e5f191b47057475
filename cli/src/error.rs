//! Error type for the CLI.
//!
//! Wraps the core errors so `?` works across them, plus what only the
//! command line can get wrong (paths, local files).

use std::path::PathBuf;

use docflow_core::{ApiError, SelectionError, UploadError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Backend call failed.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Upload could not be sent or was rejected.
    #[error("{0}")]
    Upload(#[from] UploadError),

    /// Selection not accepted by the workflow.
    #[error("{0}")]
    Selection(#[from] SelectionError),

    /// `<container>/<name>` argument could not be parsed.
    #[error("Invalid blob path '{0}': expected <container>/<name>")]
    BadPath(String),

    /// Blob named on the command line is not in the listing.
    #[error("Blob not found: {0}")]
    NotFound(String),

    /// Local file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing to stdout/stderr failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Some deletes failed.
    #[error("{0}")]
    PartialDelete(String),

    /// Job did not end with every task successful.
    #[error("{0}")]
    Workflow(String),
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_passes_through() {
        let err: CliError = ApiError::Network("connection refused".into()).into();
        assert_eq!(err.to_string(), "connection refused");
    }

    #[test]
    fn test_read_file_names_path() {
        let err = CliError::ReadFile {
            path: PathBuf::from("/tmp/missing.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("/tmp/missing.pdf"));
    }
}
