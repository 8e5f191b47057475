//! UI Components for the Docflow application.
//!
//! # Layout Components
//! - [`Header`] - Title bar, hosts the workflow trigger
//!
//! # Feature Components
//! - [`FileBrowser`] - Per-container listing with checkboxes and refresh
//! - [`UploadDialog`] - Container + file picker, base64 upload
//! - [`DeleteButton`] - Bulk delete behind a confirmation dialog
//! - [`WorkflowTrigger`] - Starts the workflow and polls its status

mod delete;
mod file_browser;
mod header;
mod upload;
mod workflow;

pub use delete::*;
pub use file_browser::*;
pub use header::*;
pub use upload::*;
pub use workflow::*;
