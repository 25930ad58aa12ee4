use tracing::info;

use super::CharacterView;
use crate::error::CatalogError;
use crate::models::{CharacterField, CharacterRecord, LocalCharacterRecord};
use crate::store::{KeyValueStorage, OverlayStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Viewing,
    Editing,
}

/// Editing state for one character's detail view.
///
/// `Viewing -> Editing` copies the current record into a buffer. Saving
/// commits the buffer to the overlay and makes it the current record;
/// cancelling throws the buffer away and leaves the overlay untouched.
#[derive(Debug, Clone)]
pub struct EditSession {
    current: CharacterView,
    buffer: Option<CharacterRecord>,
}

impl EditSession {
    pub fn new(current: CharacterView) -> Self {
        Self {
            current,
            buffer: None,
        }
    }

    pub fn mode(&self) -> EditMode {
        if self.buffer.is_some() {
            EditMode::Editing
        } else {
            EditMode::Viewing
        }
    }

    pub fn current(&self) -> &CharacterView {
        &self.current
    }

    /// The record being edited, if an edit is in progress.
    pub fn buffer(&self) -> Option<&CharacterRecord> {
        self.buffer.as_ref()
    }

    /// Starts editing. Has no effect if an edit is already in progress.
    pub fn begin_edit(&mut self) {
        if self.buffer.is_none() {
            self.buffer = Some(self.current.record().clone());
        }
    }

    pub fn set_field(
        &mut self,
        field: CharacterField,
        value: impl Into<String>,
    ) -> Result<(), CatalogError> {
        let buffer = self.buffer.as_mut().ok_or(CatalogError::NotEditing)?;
        field.set(buffer, value);
        Ok(())
    }

    /// Commits the buffer to `overlay` under the id derived from the record's
    /// url, even if no field changed.
    ///
    /// On failure the edit stays in progress.
    pub fn save<S: KeyValueStorage>(
        &mut self,
        overlay: &OverlayStore<S>,
    ) -> Result<&CharacterView, CatalogError> {
        let buffer = self.buffer.as_ref().ok_or(CatalogError::NotEditing)?;
        let id = buffer.id().ok_or(CatalogError::MissingIdentifier)?;

        overlay.put(&id, buffer)?;
        info!("saved local edit for character {}", id);

        if let Some(buffer) = self.buffer.take() {
            self.current = CharacterView::Edited(LocalCharacterRecord::edited(buffer));
        }
        Ok(&self.current)
    }

    /// Discards the buffer.
    pub fn cancel(&mut self) {
        self.buffer = None;
    }
}
