//! Application configuration.
//!
//! Compile-time constants for the Docflow frontend. The app is served from
//! the same origin as the Functions API, so the base URL is empty and every
//! request path is relative.

use std::time::Duration;

use docflow_core::Container;

/// Backend API base URL.
///
/// Empty: requests go to `/api/...` on the page's own origin.
pub const API_BASE: &str = "";

/// Application name, shown in the header and the page title.
pub const APP_NAME: &str = "Docflow";

/// Delay between two job status fetches.
pub const POLL_INTERVAL: Duration = docflow_core::DEFAULT_POLL_INTERVAL;

/// How long the upload dialog shows its success line before closing.
pub const UPLOAD_CLOSE_DELAY: Duration = Duration::from_millis(1500);

/// Only files from this container can be sent to the workflow.
pub const REQUIRED_CONTAINER: Container = docflow_core::REQUIRED_CONTAINER;

/// Maximum file size for upload (in bytes).
///
/// 50 MB limit: the file travels base64-encoded in one JSON body.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
