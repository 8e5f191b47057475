//! Workflow trigger and status poller.
//!
//! ```text
//! validate selection ──▶ POST start ──▶ ┌──────────── loop ────────────┐
//!   (no request on error)               │ cancelled? ──▶ stop          │
//!                                       │ GET status ──▶ error ─▶ stop │
//!                                       │ terminal?  ──▶ summary ─▶ stop│
//!                                       │ pause ∥ cancelled            │
//!                                       └──────────────────────────────┘
//! ```
//!
//! The loop runs on the caller's executor. It ends on a terminal status, a
//! failed status fetch, or the cancellation token; it never retries.

use std::time::Duration;

use futures::future::{self, Either};
use futures::pin_mut;
use tokio_util::sync::CancellationToken;

use crate::api::{Pause, StorageApi};
use crate::error::{ApiError, SelectionError};
use crate::selection::Selection;
use crate::types::{Container, JobStatus, RuntimeStatus, StartedJob};

/// Container whose files the processing workflow accepts.
pub const REQUIRED_CONTAINER: Container = Container::Bronze;

/// Delay between two status fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorkflowSettings {
    pub required: Container,
    pub poll_interval: Duration,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            required: REQUIRED_CONTAINER,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Progress reported while a job is submitted and polled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkflowUpdate {
    /// Selection accepted, start request about to be sent
    Launching,
    /// Orchestrator accepted the job
    Started(StartedJob),
    /// A non-final or final status was fetched
    Status(RuntimeStatus),
}

impl WorkflowUpdate {
    /// Status line text.
    pub fn message(&self) -> String {
        match self {
            WorkflowUpdate::Launching => "Launching job...".to_string(),
            WorkflowUpdate::Started(_) => "Job started successfully!".to_string(),
            WorkflowUpdate::Status(status) => format!("Job Status: {}", status),
        }
    }
}

/// Counts taken from the final status document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobSummary {
    pub status: RuntimeStatus,
    pub total_tasks: usize,
    pub failed_tasks: usize,
    pub last_updated: Option<String>,
}

impl JobSummary {
    pub fn from_status(status: &JobStatus) -> Self {
        let results = status.task_results();
        Self {
            status: status.runtime_status.clone(),
            total_tasks: results.len(),
            failed_tasks: results.iter().filter(|ok| !**ok).count(),
            last_updated: status.last_updated_time.clone(),
        }
    }

    /// Whether the job completed with every task successful.
    pub fn is_success(&self) -> bool {
        self.failed_tasks == 0 && self.status == RuntimeStatus::Completed
    }

    pub fn message(&self) -> String {
        if self.failed_tasks > 0 {
            format!("Job Failed. {} tasks failed.", self.failed_tasks)
        } else if self.status == RuntimeStatus::Completed {
            "Job Completed.".to_string()
        } else {
            format!("Job {}.", self.status)
        }
    }
}

/// How a workflow run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkflowOutcome {
    /// Selection failed validation, nothing was sent
    Rejected(SelectionError),
    /// Start request failed
    StartFailed(ApiError),
    /// Job reached a terminal status
    Finished(JobSummary),
    /// A status fetch failed, polling stopped
    StatusFailed(ApiError),
    /// Owner went away before the job finished
    Cancelled,
}

impl WorkflowOutcome {
    pub fn message(&self) -> String {
        match self {
            WorkflowOutcome::Rejected(e) => e.to_string(),
            WorkflowOutcome::StartFailed(e) => format!("Error: {}", e.detail()),
            WorkflowOutcome::Finished(summary) => summary.message(),
            WorkflowOutcome::StatusFailed(e) => {
                format!("Error fetching job status: {}", e.detail())
            }
            WorkflowOutcome::Cancelled => "Job polling cancelled.".to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WorkflowOutcome::Finished(summary) if summary.is_success())
    }
}

/// Validate `selection`, start the workflow and poll it to the end.
pub async fn run_workflow<A, P, F>(
    api: &A,
    pause: &P,
    selection: &Selection,
    settings: &WorkflowSettings,
    cancel: &CancellationToken,
    mut on_update: F,
) -> WorkflowOutcome
where
    A: StorageApi + ?Sized,
    P: Pause + ?Sized,
    F: FnMut(&WorkflowUpdate),
{
    if let Err(e) = selection.validate_for(settings.required) {
        log::warn!("Workflow not started: {}", e);
        return WorkflowOutcome::Rejected(e);
    }
    if cancel.is_cancelled() {
        return WorkflowOutcome::Cancelled;
    }

    on_update(&WorkflowUpdate::Launching);
    let job = match api.start_workflow(selection.items()).await {
        Ok(job) => job,
        Err(e) => {
            log::error!("Start workflow failed: {}", e);
            return WorkflowOutcome::StartFailed(e);
        }
    };
    log::info!(
        "Workflow started: {}",
        job.id.as_deref().unwrap_or(&job.status_query_get_uri)
    );
    on_update(&WorkflowUpdate::Started(job.clone()));

    poll_job(
        api,
        pause,
        &job.status_query_get_uri,
        settings.poll_interval,
        cancel,
        on_update,
    )
    .await
}

/// Poll `status_uri` until the job is terminal, a fetch fails, or `cancel`
/// fires.
pub async fn poll_job<A, P, F>(
    api: &A,
    pause: &P,
    status_uri: &str,
    interval: Duration,
    cancel: &CancellationToken,
    mut on_update: F,
) -> WorkflowOutcome
where
    A: StorageApi + ?Sized,
    P: Pause + ?Sized,
    F: FnMut(&WorkflowUpdate),
{
    loop {
        if cancel.is_cancelled() {
            log::debug!("Polling cancelled before fetch");
            return WorkflowOutcome::Cancelled;
        }

        let status = match api.job_status(status_uri).await {
            Ok(status) => status,
            Err(e) => {
                log::error!("Error fetching job status: {}", e);
                return WorkflowOutcome::StatusFailed(e);
            }
        };
        // The owner may have gone away while the request was in flight.
        if cancel.is_cancelled() {
            return WorkflowOutcome::Cancelled;
        }

        log::debug!("Job status: {}", status.runtime_status);
        on_update(&WorkflowUpdate::Status(status.runtime_status.clone()));

        if status.runtime_status.is_terminal() {
            let summary = JobSummary::from_status(&status);
            log::info!(
                "Job finished: {} ({}/{} tasks failed)",
                summary.status,
                summary.failed_tasks,
                summary.total_tasks
            );
            return WorkflowOutcome::Finished(summary);
        }

        let wait = pause.pause(interval);
        let cancelled = cancel.cancelled();
        pin_mut!(cancelled);
        if let Either::Right(_) = future::select(wait, cancelled).await {
            log::debug!("Polling cancelled during pause");
            return WorkflowOutcome::Cancelled;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::ApiResult;
    use crate::types::{DeleteOutcome, FileRef, Listing, UploadReceipt, UploadRequest};

    /// Backend that replays scripted status documents and counts calls.
    #[derive(Default)]
    struct ScriptedApi {
        statuses: RefCell<VecDeque<ApiResult<JobStatus>>>,
        start_result: RefCell<Option<ApiResult<StartedJob>>>,
        calls: Cell<usize>,
        status_fetches: Cell<usize>,
        cancel_on_fetch: Option<CancellationToken>,
    }

    impl ScriptedApi {
        fn with_statuses(statuses: Vec<ApiResult<JobStatus>>) -> Self {
            Self {
                statuses: RefCell::new(statuses.into()),
                ..Default::default()
            }
        }
    }

    #[async_trait(?Send)]
    impl StorageApi for ScriptedApi {
        async fn list_files(&self) -> ApiResult<Listing> {
            self.calls.set(self.calls.get() + 1);
            Ok(Listing::default())
        }

        async fn upload(&self, _request: &UploadRequest) -> ApiResult<UploadReceipt> {
            self.calls.set(self.calls.get() + 1);
            Ok(UploadReceipt::default())
        }

        async fn delete(&self, _files: &[FileRef]) -> ApiResult<DeleteOutcome> {
            self.calls.set(self.calls.get() + 1);
            Ok(DeleteOutcome::default())
        }

        async fn start_workflow(&self, _files: &[FileRef]) -> ApiResult<StartedJob> {
            self.calls.set(self.calls.get() + 1);
            self.start_result.borrow_mut().take().unwrap_or_else(|| {
                Ok(StartedJob {
                    id: Some("abc123".into()),
                    status_query_get_uri: "https://orch/status/abc123".into(),
                    terminate_post_uri: None,
                })
            })
        }

        async fn job_status(&self, status_uri: &str) -> ApiResult<JobStatus> {
            assert_eq!(status_uri, "https://orch/status/abc123");
            self.calls.set(self.calls.get() + 1);
            self.status_fetches.set(self.status_fetches.get() + 1);
            if let Some(token) = &self.cancel_on_fetch {
                token.cancel();
            }
            self.statuses
                .borrow_mut()
                .pop_front()
                .expect("more status fetches than scripted")
        }

        async fn terminate(&self, _terminate_uri: &str, _reason: &str) -> ApiResult<()> {
            self.calls.set(self.calls.get() + 1);
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingPause {
        pauses: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl Pause for CountingPause {
        async fn pause(&self, duration: Duration) {
            assert_eq!(duration, DEFAULT_POLL_INTERVAL);
            self.pauses.set(self.pauses.get() + 1);
        }
    }

    /// Cancels the token and never wakes, like a view torn down mid-delay.
    struct TeardownPause {
        token: CancellationToken,
    }

    #[async_trait(?Send)]
    impl Pause for TeardownPause {
        async fn pause(&self, _duration: Duration) {
            self.token.cancel();
            future::pending::<()>().await
        }
    }

    fn status(label: &str, output: serde_json::Value) -> ApiResult<JobStatus> {
        Ok(serde_json::from_value(json!({ "runtimeStatus": label, "output": output })).unwrap())
    }

    fn tasks(ok: usize, failed: usize) -> serde_json::Value {
        let mut items = Vec::new();
        items.extend((0..ok).map(|_| json!({ "task_result": { "success": true } })));
        items.extend((0..failed).map(|_| json!({ "task_result": { "success": false } })));
        json!(items)
    }

    fn bronze_selection() -> Selection {
        vec![FileRef {
            container: Container::Bronze,
            name: "invoice.pdf".into(),
            url: "https://store/bronze/invoice.pdf".into(),
        }]
        .into_iter()
        .collect()
    }

    async fn run(
        api: &ScriptedApi,
        pause: &dyn Pause,
        selection: &Selection,
    ) -> (WorkflowOutcome, Vec<String>) {
        let mut messages = Vec::new();
        let outcome = run_workflow(
            api,
            pause,
            selection,
            &WorkflowSettings::default(),
            &CancellationToken::new(),
            |update| messages.push(update.message()),
        )
        .await;
        (outcome, messages)
    }

    #[tokio::test]
    async fn test_mixed_selection_makes_no_request() {
        let api = ScriptedApi::default();
        let pause = CountingPause::default();
        let mut selection = bronze_selection();
        selection.toggle(&FileRef {
            container: Container::Silver,
            name: "summary.json".into(),
            url: String::new(),
        });

        let (outcome, messages) = run(&api, &pause, &selection).await;
        assert_eq!(
            outcome,
            WorkflowOutcome::Rejected(SelectionError::MixedContainers(Container::Bronze))
        );
        assert_eq!(api.calls.get(), 0);
        assert!(messages.is_empty());

        let (outcome, _) = run(&api, &pause, &Selection::new()).await;
        assert!(matches!(outcome, WorkflowOutcome::Rejected(SelectionError::Empty(_))));
        assert_eq!(api.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_polls_until_completed() {
        let api = ScriptedApi::with_statuses(vec![
            status("Running", json!(null)),
            status("Running", json!(null)),
            status("Completed", tasks(3, 0)),
        ]);
        let pause = CountingPause::default();

        let (outcome, messages) = run(&api, &pause, &bronze_selection()).await;
        assert_eq!(outcome.message(), "Job Completed.");
        assert!(outcome.is_success());
        assert_eq!(api.status_fetches.get(), 3);
        assert_eq!(pause.pauses.get(), 2);
        assert_eq!(
            messages,
            vec![
                "Launching job...",
                "Job started successfully!",
                "Job Status: Running",
                "Job Status: Running",
                "Job Status: Completed",
            ]
        );
    }

    #[tokio::test]
    async fn test_reports_failed_task_count() {
        let api = ScriptedApi::with_statuses(vec![status("Completed", tasks(3, 2))]);
        let pause = CountingPause::default();

        let (outcome, _) = run(&api, &pause, &bronze_selection()).await;
        match &outcome {
            WorkflowOutcome::Finished(summary) => {
                assert_eq!(summary.failed_tasks, 2);
                assert_eq!(summary.total_tasks, 5);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(outcome.message(), "Job Failed. 2 tasks failed.");
        assert_eq!(api.status_fetches.get(), 1);
        assert_eq!(pause.pauses.get(), 0);
    }

    #[tokio::test]
    async fn test_terminated_without_task_failures() {
        let api = ScriptedApi::with_statuses(vec![status("Terminated", json!(null))]);
        let (outcome, _) = run(&api, &CountingPause::default(), &bronze_selection()).await;
        assert_eq!(outcome.message(), "Job Terminated.");
        assert!(!outcome.is_success());
    }

    #[tokio::test]
    async fn test_status_error_stops_polling() {
        let api = ScriptedApi::with_statuses(vec![
            status("Pending", json!(null)),
            Err(ApiError::from_response(404, r#"{"errors": ["instance not found"]}"#)),
        ]);
        let pause = CountingPause::default();

        let (outcome, _) = run(&api, &pause, &bronze_selection()).await;
        assert_eq!(outcome.message(), "Error fetching job status: instance not found");
        assert_eq!(api.status_fetches.get(), 2);
    }

    #[tokio::test]
    async fn test_start_error_shows_server_errors() {
        let api = ScriptedApi::default();
        *api.start_result.borrow_mut() = Some(Err(ApiError::from_response(
            400,
            r#"{"errors": ["blob a missing", "blob b missing"]}"#,
        )));

        let (outcome, messages) = run(&api, &CountingPause::default(), &bronze_selection()).await;
        assert_eq!(outcome.message(), "Error: blob a missing\nblob b missing");
        assert_eq!(api.status_fetches.get(), 0);
        assert_eq!(messages, vec!["Launching job..."]);

        *api.start_result.borrow_mut() = Some(Err(ApiError::from_response(500, "")));
        let (outcome, _) = run(&api, &CountingPause::default(), &bronze_selection()).await;
        assert_eq!(outcome.message(), "Error: Unknown error");
    }

    #[tokio::test]
    async fn test_cancel_during_pause_stops_without_more_fetches() {
        let api = ScriptedApi::with_statuses(vec![status("Running", json!(null))]);
        let token = CancellationToken::new();
        let pause = TeardownPause {
            token: token.clone(),
        };

        let outcome = poll_job(
            &api,
            &pause,
            "https://orch/status/abc123",
            DEFAULT_POLL_INTERVAL,
            &token,
            |_| {},
        )
        .await;
        assert_eq!(outcome, WorkflowOutcome::Cancelled);
        assert_eq!(api.status_fetches.get(), 1);
    }

    #[tokio::test]
    async fn test_cancel_during_fetch_skips_update() {
        let token = CancellationToken::new();
        let api = ScriptedApi {
            cancel_on_fetch: Some(token.clone()),
            ..ScriptedApi::with_statuses(vec![status("Running", json!(null))])
        };
        let mut updates = 0;

        let outcome = poll_job(
            &api,
            &CountingPause::default(),
            "https://orch/status/abc123",
            DEFAULT_POLL_INTERVAL,
            &token,
            |_| updates += 1,
        )
        .await;
        assert_eq!(outcome, WorkflowOutcome::Cancelled);
        assert_eq!(updates, 0);
    }

    #[tokio::test]
    async fn test_cancelled_token_makes_no_request() {
        let api = ScriptedApi::default();
        let token = CancellationToken::new();
        token.cancel();

        let outcome = run_workflow(
            &api,
            &CountingPause::default(),
            &bronze_selection(),
            &WorkflowSettings::default(),
            &token,
            |_| {},
        )
        .await;
        assert_eq!(outcome, WorkflowOutcome::Cancelled);
        assert_eq!(api.calls.get(), 0);
    }
}
