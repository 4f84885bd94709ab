//! Config editor session.
//!
//! ```text
//! Closed -> Loading -> Editable -> Saving    -> Closed
//!                               -> BackingUp -> Editable
//!                               -> Cancelled -> Closed
//! ```
//!
//! A session only exists once loading succeeded, so a failed load never
//! leaves a half-populated form behind.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::backup::{create_backup, BackupError};
use crate::engine_config::{write_config, ConfigFileError, EngineConfig};
use crate::form::ConfigForm;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    File(#[from] ConfigFileError),
    #[error(transparent)]
    Backup(#[from] BackupError),
    #[error("config editor is closed")]
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    Closed,
    Loading,
    Editable,
    Saving,
    BackingUp,
    Cancelled,
}

#[derive(Debug)]
pub struct ConfigEditor {
    path: PathBuf,
    form: ConfigForm,
    phase: EditorPhase,
}

impl ConfigEditor {
    /// Loads `path` into an editable form.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        let path = path.as_ref().to_path_buf();
        let mut editor = Self {
            path,
            form: ConfigForm::default(),
            phase: EditorPhase::Loading,
        };
        let config = EngineConfig::load(&editor.path)?;
        editor.form = ConfigForm::from_config(&config);
        editor.phase = EditorPhase::Editable;
        info!(path = %editor.path.display(), fields = editor.form.fields().len(), "config loaded");
        Ok(editor)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase == EditorPhase::Editable
    }

    pub fn form(&self) -> &ConfigForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ConfigForm {
        &mut self.form
    }

    /// Writes every field back in original order. Closes the session on
    /// success; on failure the session stays editable.
    pub fn save(&mut self) -> Result<(), EditorError> {
        self.ensure_open()?;
        self.form.cancel_capture();
        self.phase = EditorPhase::Saving;
        let entries = self.form.to_entries();
        match write_config(&self.path, &entries) {
            Ok(()) => {
                self.phase = EditorPhase::Closed;
                info!(path = %self.path.display(), "config saved");
                Ok(())
            }
            Err(err) => {
                self.phase = EditorPhase::Editable;
                Err(err.into())
            }
        }
    }

    /// Copies the file as it is on disk; unsaved edits are not included.
    pub fn backup(&mut self) -> Result<PathBuf, EditorError> {
        self.ensure_open()?;
        self.phase = EditorPhase::BackingUp;
        let result = create_backup(&self.path);
        self.phase = EditorPhase::Editable;
        Ok(result?)
    }

    /// Drops pending edits. The file on disk is left untouched.
    pub fn cancel(&mut self) {
        self.form.cancel_capture();
        self.phase = EditorPhase::Cancelled;
    }

    /// True after a successful save or a cancel.
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, EditorPhase::Closed | EditorPhase::Cancelled)
    }

    fn ensure_open(&self) -> Result<(), EditorError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(EditorError::Closed)
        }
    }
}
