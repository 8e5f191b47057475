//! Seams to the outside world: the storage/workflow HTTP API and timers.
//!
//! Futures are `?Send`: the browser build runs them on the single UI thread
//! through `spawn_local`.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::types::{
    DeleteOutcome, FileRef, JobStatus, Listing, StartedJob, UploadReceipt, UploadRequest,
};

/// Endpoint paths, relative to the API base URL.
pub mod endpoints {
    /// GET, `{container: FileRef[]}`
    pub const LIST_FILES: &str = "/api/getBlobsByContainer";
    /// POST `{container, filename, fileContent}`
    pub const UPLOAD: &str = "/api/uploadBlob";
    /// POST `{blobs}`, `{success, failed}`
    pub const DELETE: &str = "/api/deleteBlobs";
    /// POST `{blobs}`, `{statusQueryGetUri, ...}` or `{errors}`
    pub const START_WORKFLOW: &str = "/api/startWorkflow";

    /// Join a base URL (possibly empty for same-origin) and a path.
    pub fn url(base: &str, path: &str) -> String {
        format!("{}{}", base.trim_end_matches('/'), path)
    }
}

/// Calls to the storage and workflow backend.
#[async_trait(?Send)]
pub trait StorageApi {
    /// Files of every container.
    async fn list_files(&self) -> ApiResult<Listing>;

    /// Store one file.
    async fn upload(&self, request: &UploadRequest) -> ApiResult<UploadReceipt>;

    /// Delete files in one bulk request.
    async fn delete(&self, files: &[FileRef]) -> ApiResult<DeleteOutcome>;

    /// Submit files to the processing workflow.
    async fn start_workflow(&self, files: &[FileRef]) -> ApiResult<StartedJob>;

    /// Fetch the status document at a URI returned by `start_workflow`.
    async fn job_status(&self, status_uri: &str) -> ApiResult<JobStatus>;

    /// Ask the orchestrator to terminate a job.
    async fn terminate(&self, terminate_uri: &str, reason: &str) -> ApiResult<()>;
}

/// Non-blocking delay on the caller's executor.
#[async_trait(?Send)]
pub trait Pause {
    async fn pause(&self, duration: Duration);
}
