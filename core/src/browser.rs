//! State of the file browser and its delete-confirmation flow.
//!
//! Kept free of any UI toolkit so the rules (what is disabled when, which
//! message follows which response) are the same in every front end.

use crate::error::ApiResult;
use crate::selection::Selection;
use crate::types::{DeleteOutcome, FileRef, Listing};

/// Listing plus the loading flags and messages of the file browser.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BrowserState {
    listing: Listing,
    refreshing: bool,
    deleting: bool,
    /// A refresh was asked for while one was in flight
    refresh_queued: bool,
    /// Last listing failure
    error: Option<String>,
    /// Last delete failure, partial or total
    delete_error: Option<String>,
    /// The delete message outlives the one refresh that follows the delete
    keep_delete_error: bool,
}

impl BrowserState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    /// Message to show under the toolbar, delete failures first.
    pub fn error(&self) -> Option<&str> {
        self.delete_error.as_deref().or(self.error.as_deref())
    }

    /// Mark a refresh as started. Returns `false` if one is already running;
    /// the request is then queued and reported by [`Self::finish_refresh`].
    pub fn begin_refresh(&mut self) -> bool {
        if self.refreshing {
            self.refresh_queued = true;
            return false;
        }
        self.refreshing = true;
        self.error = None;
        if !std::mem::take(&mut self.keep_delete_error) {
            self.delete_error = None;
        }
        true
    }

    /// Apply a listing response. Success replaces the listing wholesale, a
    /// failure takes over the message line.
    ///
    /// Returns `true` when another refresh was queued meanwhile: the state
    /// stays refreshing and the caller must fetch again.
    pub fn finish_refresh(&mut self, result: ApiResult<Listing>) -> bool {
        match result {
            Ok(listing) => {
                log::debug!("Listing refreshed: {} files", listing.total());
                self.listing = listing;
                self.error = None;
            }
            Err(e) => {
                log::error!("Listing failed: {}", e);
                self.error = Some(format!("Error: {}", e));
                self.delete_error = None;
            }
        }
        if std::mem::take(&mut self.refresh_queued) {
            self.keep_delete_error = false;
            return true;
        }
        self.refreshing = false;
        false
    }

    /// Whether the delete button is enabled.
    pub fn can_delete(&self, selected: usize) -> bool {
        DeleteConfirm::can_open(selected, self.deleting) && !self.refreshing
    }

    /// Files to send to the delete endpoint, or `None` when the action is
    /// disabled: empty selection, or a delete or refresh in flight.
    pub fn begin_delete(&mut self, selection: &Selection) -> Option<Vec<FileRef>> {
        if !self.can_delete(selection.len()) {
            return None;
        }
        self.deleting = true;
        self.delete_error = None;
        Some(selection.items().to_vec())
    }

    /// Apply a delete response.
    ///
    /// Whatever the outcome the selection is cleared; the caller must refresh
    /// the listing afterwards.
    pub fn finish_delete(&mut self, result: ApiResult<DeleteOutcome>, selection: &mut Selection) {
        self.deleting = false;
        match result {
            Ok(outcome) => {
                log::info!(
                    "Deleted {} blobs, {} failed",
                    outcome.succeeded_count(),
                    outcome.failed_count()
                );
                self.delete_error = outcome.failure_message();
            }
            Err(e) => {
                log::error!("Delete failed: {}", e);
                self.delete_error = Some(format!("Error during deletion: {}", e));
            }
        }
        self.keep_delete_error = self.delete_error.is_some();
        selection.clear();
    }
}

/// Confirmation dialog in front of the bulk delete.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DeleteConfirm {
    open: bool,
}

impl DeleteConfirm {
    /// Whether the delete button is enabled.
    pub fn can_open(selected: usize, deleting: bool) -> bool {
        selected > 0 && !deleting
    }

    pub fn button_label(selected: usize, deleting: bool) -> String {
        if deleting {
            "Deleting...".to_string()
        } else {
            format!("Delete Selected ({})", selected)
        }
    }

    pub fn prompt(selected: usize) -> String {
        format!(
            "Are you sure you want to delete {} selected blob(s)? This action cannot be undone.",
            selected
        )
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the dialog if the button is enabled. Returns whether it opened.
    pub fn request(&mut self, selected: usize, deleting: bool) -> bool {
        self.open = Self::can_open(selected, deleting);
        self.open
    }

    pub fn cancel(&mut self) {
        self.open = false;
    }

    /// Close the dialog. Returns `true` if it was open, meaning the delete
    /// should proceed.
    pub fn confirm(&mut self) -> bool {
        std::mem::replace(&mut self.open, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::types::Container;
    use serde_json::json;

    fn selection_of(names: &[&str]) -> Selection {
        names
            .iter()
            .map(|n| FileRef {
                container: Container::Bronze,
                name: n.to_string(),
                url: String::new(),
            })
            .collect()
    }

    #[test]
    fn test_partial_delete_failure_reports_counts_and_clears_selection() {
        let mut state = BrowserState::new();
        let mut selection = selection_of(&["a", "b", "c"]);

        let files = state.begin_delete(&selection).expect("delete enabled");
        assert_eq!(files.len(), 3);
        assert!(state.is_deleting());

        let outcome = DeleteOutcome {
            success: vec![json!("a"), json!("b")],
            failed: vec![json!("c")],
        };
        state.finish_delete(Ok(outcome), &mut selection);

        let msg = state.error().unwrap();
        assert!(msg.contains("Failed to delete 1 blobs"));
        assert!(msg.contains("Successfully deleted 2 blobs"));
        assert!(selection.is_empty());
        assert!(!state.is_deleting());
    }

    #[test]
    fn test_delete_error_still_clears_selection() {
        let mut state = BrowserState::new();
        let mut selection = selection_of(&["a"]);
        state.begin_delete(&selection);

        state.finish_delete(Err(ApiError::Network("offline".into())), &mut selection);
        assert_eq!(state.error(), Some("Error during deletion: offline"));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_delete_disabled_when_empty_or_in_flight() {
        let mut state = BrowserState::new();
        assert!(state.begin_delete(&Selection::new()).is_none());

        let selection = selection_of(&["a"]);
        assert!(state.begin_delete(&selection).is_some());
        assert!(state.begin_delete(&selection).is_none());
    }

    #[test]
    fn test_refresh_keeps_delete_message() {
        let mut state = BrowserState::new();
        let mut selection = selection_of(&["a"]);
        state.begin_delete(&selection);
        let outcome = DeleteOutcome {
            success: vec![],
            failed: vec![json!("a")],
        };
        state.finish_delete(Ok(outcome), &mut selection);

        assert!(state.begin_refresh());
        assert!(!state.finish_refresh(Ok(Listing::default())));
        assert!(state.error().unwrap().starts_with("Failed to delete 1 blobs"));

        // Only the refresh right after the delete keeps it.
        assert!(state.begin_refresh());
        assert_eq!(state.error(), None);
        assert!(!state.finish_refresh(Err(ApiError::from_response(500, ""))));
        assert_eq!(state.error(), Some("Error: HTTP 500"));
    }

    #[test]
    fn test_listing_failure_replaces_delete_message() {
        let mut state = BrowserState::new();
        let mut selection = selection_of(&["a"]);
        state.begin_delete(&selection);
        state.finish_delete(Err(ApiError::Network("offline".into())), &mut selection);

        assert!(state.begin_refresh());
        state.finish_refresh(Err(ApiError::from_response(503, "")));
        assert_eq!(state.error(), Some("Error: HTTP 503"));
    }

    #[test]
    fn test_refresh_requested_in_flight_runs_again() {
        let mut state = BrowserState::new();
        assert!(state.begin_refresh());

        // An upload finishes while the listing is loading.
        assert!(!state.begin_refresh());
        assert!(state.finish_refresh(Ok(Listing::default())));
        assert!(state.is_refreshing());

        let listing = Listing::from_files(vec![FileRef {
            container: Container::Bronze,
            name: "new.pdf".into(),
            url: String::new(),
        }]);
        assert!(!state.finish_refresh(Ok(listing.clone())));
        assert!(!state.is_refreshing());
        assert_eq!(state.listing(), &listing);
    }

    #[test]
    fn test_delete_disabled_while_refreshing() {
        let mut state = BrowserState::new();
        let selection = selection_of(&["a"]);
        state.begin_refresh();
        assert!(!state.can_delete(selection.len()));
        assert!(state.begin_delete(&selection).is_none());

        state.finish_refresh(Ok(Listing::default()));
        assert!(state.can_delete(selection.len()));
        assert!(state.begin_delete(&selection).is_some());
    }

    #[test]
    fn test_refresh_failure_sets_error_and_keeps_listing() {
        let mut state = BrowserState::new();
        state.begin_refresh();
        let listing = Listing::from_files(vec![FileRef {
            container: Container::Gold,
            name: "out.json".into(),
            url: String::new(),
        }]);
        state.finish_refresh(Ok(listing.clone()));

        state.begin_refresh();
        state.finish_refresh(Err(ApiError::from_response(500, "")));
        assert_eq!(state.error(), Some("Error: HTTP 500"));
        assert_eq!(state.listing(), &listing);
    }

    #[test]
    fn test_confirm_dialog_flow() {
        let mut dialog = DeleteConfirm::default();
        assert!(!dialog.request(0, false));
        assert!(!dialog.is_open());

        assert!(dialog.request(2, false));
        dialog.cancel();
        assert!(!dialog.confirm());

        assert!(dialog.request(2, false));
        assert!(dialog.confirm());
        assert!(!dialog.is_open());

        assert_eq!(DeleteConfirm::button_label(2, false), "Delete Selected (2)");
        assert_eq!(DeleteConfirm::button_label(2, true), "Deleting...");
        assert!(DeleteConfirm::prompt(2).contains("delete 2 selected blob(s)"));
    }
}
