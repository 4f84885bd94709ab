//! Launcher logic independent of the GUI toolkit: archive listing, engine
//! config parsing and editing, capture buttons and config backups.

pub mod backup;
pub mod capture;
pub mod catalog;
pub mod editor;
pub mod engine_config;
pub mod form;

pub use backup::{backup_path_for, create_backup, BackupError};
pub use capture::{CaptureButton, CaptureInput, CaptureOutcome, CaptureSpace, CaptureState};
pub use catalog::{list_archives, ArchiveEntry, CatalogError, Listing, ARCHIVE_EXTENSION};
pub use editor::{ConfigEditor, EditorError, EditorPhase};
pub use engine_config::{ConfigEntry, ConfigFileError, EngineConfig, KEY_COLUMN_WIDTH};
pub use form::{classify, ConfigForm, FieldKind, FieldValue, FormField};
