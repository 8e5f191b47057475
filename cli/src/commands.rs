//! Command implementations.
//!
//! Each command writes its human-readable output to `out` and progress to the
//! log, so tests can capture the output.

use std::io::Write;
use std::path::Path;

use docflow_core::{
    encode_upload, poll_job, run_workflow, BrowserState, CancellationToken, Container,
    DeleteConfirm, FileRef, JobSummary, Pause, PickedFile, Selection, StartedJob, StorageApi,
    UploadError, UploadForm, WorkflowOutcome, WorkflowSettings, WorkflowUpdate,
};

use crate::error::{CliError, CliResult};

/// Parse a `<container>/<name>` argument. Names may contain further slashes.
pub fn parse_blob_path(arg: &str) -> CliResult<(Container, String)> {
    let (container, name) = arg
        .split_once('/')
        .ok_or_else(|| CliError::BadPath(arg.to_string()))?;
    let container = container
        .parse::<Container>()
        .map_err(|_| CliError::BadPath(arg.to_string()))?;
    if name.is_empty() {
        return Err(CliError::BadPath(arg.to_string()));
    }
    Ok((container, name.to_string()))
}

/// Look every path up in a fresh listing, keeping the order given.
async fn resolve_selection<A: StorageApi + ?Sized>(
    api: &A,
    paths: &[(Container, String)],
) -> CliResult<Selection> {
    let listing = api.list_files().await?;
    let mut selection = Selection::new();
    for (container, name) in paths {
        let file = listing
            .find(*container, name)
            .ok_or_else(|| CliError::NotFound(format!("{}/{}", container, name)))?;
        if !selection.is_selected(file) {
            selection.toggle(file);
        }
    }
    Ok(selection)
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Final line of a run, plus the job's own timestamp when it finished.
fn print_outcome(out: &mut impl Write, outcome: &WorkflowOutcome) -> CliResult<()> {
    writeln!(out, "[{}] {}", timestamp(), outcome.message())?;
    if let WorkflowOutcome::Finished(JobSummary {
        last_updated: Some(updated),
        ..
    }) = outcome
    {
        writeln!(out, "Last updated: {}", updated)?;
    }
    Ok(())
}

/// Progress lines are best effort: a closed stdout must not stop polling.
fn print_update(out: &mut impl Write, update: &WorkflowUpdate) {
    if let Err(e) = writeln!(out, "[{}] {}", timestamp(), update.message()) {
        log::warn!("Could not write progress: {}", e);
    }
}

// =============================================================================
// list
// =============================================================================

/// Print every container (or one) with its files.
pub async fn cmd_list<A: StorageApi + ?Sized>(
    api: &A,
    only: Option<Container>,
    out: &mut impl Write,
) -> CliResult<()> {
    let listing = api.list_files().await?;

    for container in Container::ALL {
        if only.is_some_and(|c| c != container) {
            continue;
        }
        writeln!(out, "Container: {}", container)?;
        let files = listing.files(container);
        if files.is_empty() {
            writeln!(out, "  No files present")?;
        }
        for file in files {
            writeln!(out, "  {}\t{}", file.name, file.url)?;
        }
    }
    Ok(())
}

// =============================================================================
// upload
// =============================================================================

/// Upload one local file.
pub async fn cmd_upload<A: StorageApi + ?Sized>(
    api: &A,
    path: &Path,
    container: Container,
    name: Option<String>,
    max_size: u64,
    out: &mut impl Write,
) -> CliResult<()> {
    let read_err = |source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    };
    let metadata = tokio::fs::metadata(path).await.map_err(read_err)?;
    let filename = match name {
        Some(name) => name,
        None => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CliError::BadPath(path.display().to_string()))?,
    };

    let mut form = UploadForm::new(max_size);
    form.set_container(container);
    form.pick_file(Some(PickedFile {
        name: filename,
        size: metadata.len(),
    }));
    let picked = form.begin()?;

    log::info!("Uploading {} to {}", picked.name, container);
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            form.finish(Err(UploadError::Read(e.to_string())));
            return Err(read_err(e));
        }
    };
    let request = encode_upload(container, &picked.name, &bytes);

    match api.upload(&request).await {
        Ok(receipt) => {
            form.finish(Ok(()));
            let size = receipt.size_bytes.unwrap_or(bytes.len() as u64);
            writeln!(out, "Upload successful: {}/{} ({} bytes)", container, picked.name, size)?;
            Ok(())
        }
        Err(e) => {
            form.finish(Err(UploadError::Rejected(e.clone())));
            Err(CliError::Upload(UploadError::Rejected(e)))
        }
    }
}

// =============================================================================
// delete
// =============================================================================

/// Delete blobs after confirmation, then report what is left.
///
/// `confirm` receives the prompt and returns whether to proceed.
pub async fn cmd_delete<A, C>(
    api: &A,
    paths: &[(Container, String)],
    confirm: C,
    out: &mut impl Write,
) -> CliResult<()>
where
    A: StorageApi + ?Sized,
    C: FnOnce(&str) -> bool,
{
    let mut selection = resolve_selection(api, paths).await?;
    let mut state = BrowserState::new();
    let mut dialog = DeleteConfirm::default();

    if !dialog.request(selection.len(), state.is_deleting()) {
        writeln!(out, "Nothing to delete")?;
        return Ok(());
    }
    if !confirm(&DeleteConfirm::prompt(selection.len())) {
        dialog.cancel();
        writeln!(out, "Cancelled")?;
        return Ok(());
    }
    dialog.confirm();

    let Some(files) = state.begin_delete(&selection) else {
        return Ok(());
    };
    let result = api.delete(&files).await;
    // Older backends answer with a bare message and no per-blob lists.
    let deleted = match &result {
        Ok(o) if o.success.is_empty() && o.failed.is_empty() => files.len(),
        Ok(o) => o.succeeded_count(),
        Err(_) => 0,
    };
    state.finish_delete(result, &mut selection);
    let delete_error = state.error().map(str::to_string);

    state.begin_refresh();
    state.finish_refresh(api.list_files().await);
    writeln!(
        out,
        "Deleted {} blobs, {} files remain",
        deleted,
        state.listing().total()
    )?;

    match delete_error {
        Some(message) => Err(CliError::PartialDelete(message)),
        None => Ok(()),
    }
}

// =============================================================================
// run
// =============================================================================

/// Start the workflow on the given blobs and poll it to the end.
///
/// When `cancel` fires (Ctrl-C) polling stops; with `terminate_on_cancel` the
/// remote job is terminated too.
pub async fn cmd_run<A, P>(
    api: &A,
    pause: &P,
    paths: &[(Container, String)],
    settings: &WorkflowSettings,
    cancel: &CancellationToken,
    terminate_on_cancel: bool,
    out: &mut impl Write,
) -> CliResult<()>
where
    A: StorageApi + ?Sized,
    P: Pause + ?Sized,
{
    // Reject before any request, urls are not needed to validate.
    let requested: Selection = paths
        .iter()
        .map(|(container, name)| FileRef {
            container: *container,
            name: name.clone(),
            url: String::new(),
        })
        .collect();
    requested.validate_for(settings.required)?;

    let selection = resolve_selection(api, paths).await?;
    let names: Vec<String> = selection.iter().map(FileRef::path).collect();
    writeln!(out, "Selected: {}", names.join(", "))?;

    let mut started: Option<StartedJob> = None;
    let outcome = run_workflow(api, pause, &selection, settings, cancel, |update| {
        if let WorkflowUpdate::Started(job) = update {
            started = Some(job.clone());
        }
        print_update(out, update);
    })
    .await;

    if outcome == WorkflowOutcome::Cancelled && terminate_on_cancel {
        if let Some(uri) = started.as_ref().and_then(|j| j.terminate_post_uri.as_deref()) {
            api.terminate(uri, "Cancelled from docflow CLI").await?;
            writeln!(out, "Terminate request sent")?;
        }
    }

    print_outcome(out, &outcome)?;
    if outcome.is_success() {
        Ok(())
    } else {
        Err(CliError::Workflow(outcome.message()))
    }
}

// =============================================================================
// status / watch
// =============================================================================

/// Fetch one status document and print it.
pub async fn cmd_status<A: StorageApi + ?Sized>(
    api: &A,
    status_uri: &str,
    out: &mut impl Write,
) -> CliResult<()> {
    let status = api.job_status(status_uri).await?;
    writeln!(out, "Job Status: {}", status.runtime_status)?;
    if let Some(updated) = &status.last_updated_time {
        writeln!(out, "Last updated: {}", updated)?;
    }
    if status.runtime_status.is_terminal() {
        let summary = JobSummary::from_status(&status);
        writeln!(
            out,
            "{} ({} of {} tasks failed)",
            summary.message(),
            summary.failed_tasks,
            summary.total_tasks
        )?;
    }
    Ok(())
}

/// Poll an already started job until it ends.
pub async fn cmd_watch<A, P>(
    api: &A,
    pause: &P,
    status_uri: &str,
    settings: &WorkflowSettings,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> CliResult<()>
where
    A: StorageApi + ?Sized,
    P: Pause + ?Sized,
{
    let outcome = poll_job(api, pause, status_uri, settings.poll_interval, cancel, |update| {
        print_update(out, update)
    })
    .await;
    print_outcome(out, &outcome)?;
    if outcome.is_success() {
        Ok(())
    } else {
        Err(CliError::Workflow(outcome.message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blob_path() {
        assert_eq!(
            parse_blob_path("bronze/scans/a.pdf").unwrap(),
            (Container::Bronze, "scans/a.pdf".to_string())
        );
        assert!(matches!(parse_blob_path("a.pdf"), Err(CliError::BadPath(_))));
        assert!(matches!(parse_blob_path("platinum/a.pdf"), Err(CliError::BadPath(_))));
        assert!(matches!(parse_blob_path("gold/"), Err(CliError::BadPath(_))));
    }
}
