//! Wire and domain types shared by the front ends.
//!
//! # Categories
//!
//! - **Storage Types** - containers, file references, listings
//! - **Request/Response Types** - upload and delete payloads
//! - **Job Types** - workflow start response and status document

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Storage Types
// =============================================================================

/// Storage tier. The vocabulary is fixed by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Container {
    /// Raw uploads, input of the processing workflow
    Bronze,
    /// Intermediate results
    Silver,
    /// Final results
    Gold,
}

impl Container {
    /// All containers in display order.
    pub const ALL: [Container; 3] = [Container::Bronze, Container::Silver, Container::Gold];

    /// Name used on the wire and in the UI.
    pub fn as_str(&self) -> &'static str {
        match self {
            Container::Bronze => "bronze",
            Container::Silver => "silver",
            Container::Gold => "gold",
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Container {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bronze" => Ok(Container::Bronze),
            "silver" => Ok(Container::Silver),
            "gold" => Ok(Container::Gold),
            other => Err(format!(
                "Container name must be one of: bronze, silver, gold (got '{}')",
                other
            )),
        }
    }
}

/// A blob as reported by the listing endpoint.
///
/// Identity is `(container, name)`; `url` is only used for display links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// Container holding the blob
    pub container: Container,
    /// Blob name, unique within its container
    pub name: String,
    /// Externally resolvable address (may carry a SAS token)
    pub url: String,
}

impl FileRef {
    /// Whether `self` and `other` name the same blob.
    pub fn same_blob(&self, other: &FileRef) -> bool {
        self.container == other.container && self.name == other.name
    }

    /// `container/name`, as typed on the command line.
    pub fn path(&self) -> String {
        format!("{}/{}", self.container, self.name)
    }
}

/// One entry of the listing response. The backend omits `container`, which
/// is implied by the map key.
#[derive(Clone, Debug, Deserialize)]
pub struct ListedBlob {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Files per container, as returned by the listing endpoint.
///
/// Every known container is present, possibly empty. Unknown keys in the
/// response are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "HashMap<String, Vec<ListedBlob>>")]
pub struct Listing {
    by_container: BTreeMap<Container, Vec<FileRef>>,
}

impl Default for Listing {
    fn default() -> Self {
        Self {
            by_container: Container::ALL.iter().map(|c| (*c, Vec::new())).collect(),
        }
    }
}

impl From<HashMap<String, Vec<ListedBlob>>> for Listing {
    fn from(raw: HashMap<String, Vec<ListedBlob>>) -> Self {
        let mut listing = Listing::default();
        for (key, blobs) in raw {
            let container = match key.parse::<Container>() {
                Ok(c) => c,
                Err(_) => {
                    log::warn!("Ignoring unknown container in listing: {}", key);
                    continue;
                }
            };
            let files = blobs
                .into_iter()
                .map(|b| FileRef {
                    container,
                    name: b.name,
                    url: b.url,
                })
                .collect();
            listing.by_container.insert(container, files);
        }
        listing
    }
}

impl Listing {
    /// Build a listing from files, grouping them by container.
    pub fn from_files(files: impl IntoIterator<Item = FileRef>) -> Self {
        let mut listing = Listing::default();
        for file in files {
            listing
                .by_container
                .entry(file.container)
                .or_default()
                .push(file);
        }
        listing
    }

    /// Files of one container.
    pub fn files(&self, container: Container) -> &[FileRef] {
        self.by_container
            .get(&container)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Look a blob up by container and name.
    pub fn find(&self, container: Container, name: &str) -> Option<&FileRef> {
        self.files(container).iter().find(|f| f.name == name)
    }

    /// Total number of files across containers.
    pub fn total(&self) -> usize {
        self.by_container.values().map(Vec::len).sum()
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body of the upload endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub container: Container,
    pub filename: String,
    /// Standard padded base64 of the whole file
    pub file_content: String,
}

/// Success body of the upload endpoint. Fields are optional because a bare
/// 200 is also a success.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub container: Option<Container>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

/// Body shared by the delete and start-workflow endpoints.
#[derive(Clone, Debug, Serialize)]
pub struct BlobsPayload<'a> {
    pub blobs: &'a [FileRef],
}

/// Response of the bulk delete endpoint.
///
/// Entries are opaque: only their counts are used.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    #[serde(default)]
    pub success: Vec<Value>,
    #[serde(default)]
    pub failed: Vec<Value>,
}

impl DeleteOutcome {
    pub fn succeeded_count(&self) -> usize {
        self.success.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Message for a partial failure, `None` when nothing failed.
    pub fn failure_message(&self) -> Option<String> {
        if self.failed.is_empty() {
            return None;
        }
        Some(format!(
            "Failed to delete {} blobs. Successfully deleted {} blobs.",
            self.failed_count(),
            self.succeeded_count()
        ))
    }
}

// =============================================================================
// Job Types
// =============================================================================

/// Response of the start-workflow endpoint (durable orchestration handle).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartedJob {
    /// Orchestration instance id
    #[serde(default)]
    pub id: Option<String>,
    /// Where to GET the job status
    pub status_query_get_uri: String,
    /// Where to POST to terminate the job
    #[serde(default)]
    pub terminate_post_uri: Option<String>,
}

/// `runtimeStatus` of a job. Labels not listed are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuntimeStatus {
    Pending,
    Running,
    ContinuedAsNew,
    Suspended,
    Completed,
    Failed,
    Terminated,
    Other(String),
}

impl RuntimeStatus {
    /// Whether the job will not change state anymore.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RuntimeStatus::Completed | RuntimeStatus::Failed | RuntimeStatus::Terminated
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuntimeStatus::Pending => "Pending",
            RuntimeStatus::Running => "Running",
            RuntimeStatus::ContinuedAsNew => "ContinuedAsNew",
            RuntimeStatus::Suspended => "Suspended",
            RuntimeStatus::Completed => "Completed",
            RuntimeStatus::Failed => "Failed",
            RuntimeStatus::Terminated => "Terminated",
            RuntimeStatus::Other(label) => label,
        }
    }
}

impl From<String> for RuntimeStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "Pending" => RuntimeStatus::Pending,
            "Running" => RuntimeStatus::Running,
            "ContinuedAsNew" => RuntimeStatus::ContinuedAsNew,
            "Suspended" => RuntimeStatus::Suspended,
            "Completed" => RuntimeStatus::Completed,
            "Failed" => RuntimeStatus::Failed,
            "Terminated" => RuntimeStatus::Terminated,
            _ => RuntimeStatus::Other(label),
        }
    }
}

impl From<RuntimeStatus> for String {
    fn from(status: RuntimeStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RuntimeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status document of a running or finished job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub runtime_status: RuntimeStatus,
    /// Per-blob results once the job is done: `[{task_result: {success}}]`
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub instance_id: Option<String>,
    #[serde(default)]
    pub custom_status: Value,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_updated_time: Option<String>,
}

impl JobStatus {
    /// Success flag of every task in `output`.
    ///
    /// A task without a boolean `task_result.success` counts as failed.
    /// A non-array `output` (null, or an error string) has no tasks.
    pub fn task_results(&self) -> Vec<bool> {
        match &self.output {
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.get("task_result")
                        .and_then(|r| r.get("success"))
                        .and_then(Value::as_bool)
                        .unwrap_or(false)
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}
