//! # Docflow core - model and workflow logic shared by every front end
//!
//! Docflow manages files in tiered blob containers (`bronze`, `silver`, `gold`)
//! and starts a remote document-processing workflow on a selection of them.
//! Storage and orchestration live behind HTTP endpoints; this crate holds
//! everything the front ends need to talk to them consistently.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  Selection   │────▶│   Workflow   │────▶│  StorageApi  │──▶ HTTP
//! │ (validation) │     │ (start+poll) │     │   (trait)    │
//! └──────────────┘     └──────┬───────┘     └──────────────┘
//!                             │
//!                       ┌─────▼─────┐
//!                       │   Pause   │──▶ timer (browser / tokio)
//!                       └───────────┘
//! ```
//!
//! ## Modules
//!
//! - [`error`] - API and validation errors
//! - [`types`] - Wire types (FileRef, Listing, JobStatus, ...)
//! - [`selection`] - Multi-select set and workflow preconditions
//! - [`browser`] - File browser and delete-confirmation state
//! - [`upload`] - Upload form state and payload encoding
//! - [`api`] - `StorageApi` and `Pause` seams plus endpoint paths
//! - [`workflow`] - Job submission and the cancellable status poller

// Core modules
pub mod error;
pub mod types;

// Client-side state
pub mod selection;
pub mod browser;
pub mod upload;

// Remote calls
pub mod api;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ApiError, ApiResult, SelectionError, UploadError};

pub use types::{
    BlobsPayload, Container, DeleteOutcome, FileRef, JobStatus, Listing, RuntimeStatus, StartedJob,
    UploadReceipt, UploadRequest,
};

pub use selection::Selection;

pub use browser::{BrowserState, DeleteConfirm};

pub use upload::{encode_upload, PickedFile, UploadForm, UploadStatus};

pub use api::{endpoints, Pause, StorageApi};

pub use workflow::{
    poll_job, run_workflow, JobSummary, WorkflowOutcome, WorkflowSettings, WorkflowUpdate,
    DEFAULT_POLL_INTERVAL, REQUIRED_CONTAINER,
};

pub use tokio_util::sync::CancellationToken;
