//! Multi-select set of files and the workflow preconditions on it.

use crate::error::SelectionError;
use crate::types::{Container, FileRef};

/// Files the user has checked, unique by `(container, name)`.
///
/// Insertion order is kept so that payloads list files in the order they were
/// picked, but equality ignores it.
#[derive(Clone, Debug, Default)]
pub struct Selection {
    items: Vec<FileRef>,
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self.items.iter().all(|f| other.contains(f.container, &f.name))
    }
}

impl Eq for Selection {}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `file` if absent, remove it if present.
    ///
    /// Returns whether the file is selected afterwards.
    pub fn toggle(&mut self, file: &FileRef) -> bool {
        if let Some(pos) = self.items.iter().position(|f| f.same_blob(file)) {
            self.items.remove(pos);
            false
        } else {
            self.items.push(file.clone());
            true
        }
    }

    pub fn contains(&self, container: Container, name: &str) -> bool {
        self.items
            .iter()
            .any(|f| f.container == container && f.name == name)
    }

    pub fn is_selected(&self, file: &FileRef) -> bool {
        self.contains(file.container, &file.name)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[FileRef] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &FileRef> {
        self.items.iter()
    }

    /// Check the selection can be sent to a workflow that only accepts files
    /// from `required`.
    pub fn validate_for(&self, required: Container) -> Result<(), SelectionError> {
        if self.items.is_empty() {
            return Err(SelectionError::Empty(required));
        }
        if !self.items.iter().any(|f| f.container == required) {
            return Err(SelectionError::NoneInContainer(required));
        }
        if self.items.iter().any(|f| f.container != required) {
            return Err(SelectionError::MixedContainers(required));
        }
        Ok(())
    }
}

impl FromIterator<FileRef> for Selection {
    fn from_iter<I: IntoIterator<Item = FileRef>>(iter: I) -> Self {
        let mut selection = Selection::new();
        for file in iter {
            if !selection.is_selected(&file) {
                selection.items.push(file);
            }
        }
        selection
    }
}
