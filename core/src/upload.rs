//! Upload form state and payload encoding.
//!
//! The whole file is read into memory and sent as base64 in one request, so
//! the form carries a size limit.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::UploadError;
use crate::types::{Container, UploadRequest};

/// Encode a local file as an upload request body.
pub fn encode_upload(container: Container, filename: &str, bytes: &[u8]) -> UploadRequest {
    UploadRequest {
        container,
        filename: filename.to_string(),
        file_content: STANDARD.encode(bytes),
    }
}

/// Metadata of the local file chosen in the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PickedFile {
    pub name: String,
    pub size: u64,
}

/// Inline status line of the dialog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum UploadStatus {
    #[default]
    Idle,
    Uploading,
    Succeeded(String),
    Failed(String),
}

/// Container + file picker with its submit rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadForm {
    container: Container,
    file: Option<PickedFile>,
    status: UploadStatus,
    max_size: u64,
}

impl UploadForm {
    pub fn new(max_size: u64) -> Self {
        Self {
            container: Container::Bronze,
            file: None,
            status: UploadStatus::Idle,
            max_size,
        }
    }

    pub fn container(&self) -> Container {
        self.container
    }

    pub fn file(&self) -> Option<&PickedFile> {
        self.file.as_ref()
    }

    pub fn status(&self) -> &UploadStatus {
        &self.status
    }

    pub fn is_busy(&self) -> bool {
        self.status == UploadStatus::Uploading
    }

    /// Inputs are locked while an upload runs.
    pub fn set_container(&mut self, container: Container) {
        if !self.is_busy() {
            self.container = container;
        }
    }

    pub fn pick_file(&mut self, file: Option<PickedFile>) {
        if !self.is_busy() {
            self.file = file;
        }
    }

    /// Whether the submit button is enabled.
    pub fn can_submit(&self) -> bool {
        self.file.is_some() && !self.is_busy()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            "Uploading..."
        } else {
            "Upload"
        }
    }

    /// Start an upload: returns the file to read and marks the form busy.
    pub fn begin(&mut self) -> Result<PickedFile, UploadError> {
        if self.is_busy() {
            return Err(UploadError::Busy);
        }
        let file = self.file.clone().ok_or(UploadError::NoFile)?;
        if file.size > self.max_size {
            let err = UploadError::TooLarge {
                size: file.size,
                limit: self.max_size,
            };
            self.status = UploadStatus::Failed(err.to_string());
            return Err(err);
        }
        self.status = UploadStatus::Uploading;
        Ok(file)
    }

    /// Record the upload result. The form stays filled on failure so the user
    /// can retry.
    pub fn finish(&mut self, result: Result<(), UploadError>) {
        self.status = match result {
            Ok(()) => UploadStatus::Succeeded("Upload successful".to_string()),
            Err(e) => {
                log::warn!("Upload failed: {:?}", e);
                UploadStatus::Failed(e.to_string())
            }
        };
    }

    /// Clear the picked file and status, keeping the container choice.
    pub fn reset(&mut self) {
        self.file = None;
        self.status = UploadStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    fn picked(size: u64) -> Option<PickedFile> {
        Some(PickedFile {
            name: "scan.pdf".into(),
            size,
        })
    }

    #[test]
    fn test_submit_disabled_without_file() {
        let mut form = UploadForm::new(1024);
        assert!(!form.can_submit());
        assert_eq!(form.begin(), Err(UploadError::NoFile));
        assert_eq!(form.status(), &UploadStatus::Idle);
    }

    #[test]
    fn test_upload_locks_inputs_until_finished() {
        let mut form = UploadForm::new(1024);
        form.pick_file(picked(10));
        assert!(form.can_submit());

        let file = form.begin().unwrap();
        assert_eq!(file.name, "scan.pdf");
        assert!(!form.can_submit());
        assert_eq!(form.submit_label(), "Uploading...");

        form.set_container(Container::Gold);
        assert_eq!(form.container(), Container::Bronze);
        assert_eq!(form.begin(), Err(UploadError::Busy));

        form.finish(Ok(()));
        assert_eq!(form.status(), &UploadStatus::Succeeded("Upload successful".into()));
    }

    #[test]
    fn test_failure_keeps_file_for_retry() {
        let mut form = UploadForm::new(1024);
        form.pick_file(picked(10));
        form.begin().unwrap();
        form.finish(Err(UploadError::Rejected(ApiError::from_response(500, ""))));

        assert_eq!(form.status(), &UploadStatus::Failed("Upload failed".into()));
        assert!(form.can_submit());
    }

    #[test]
    fn test_oversized_file_rejected_before_read() {
        let mut form = UploadForm::new(4);
        form.pick_file(picked(5));
        assert!(matches!(form.begin(), Err(UploadError::TooLarge { size: 5, limit: 4 })));
        assert!(!form.is_busy());
    }

    #[test]
    fn test_encode_upload_is_padded_base64() {
        let req = encode_upload(Container::Silver, "hi.txt", b"hi");
        assert_eq!(req.file_content, "aGk=");
        assert_eq!(req.container, Container::Silver);
        assert_eq!(req.filename, "hi.txt");
    }
}
