//! Persistent launcher preferences.

pub mod preferences;

pub use preferences::{
    default_preferences_path, Preferences, PreferencesError, PreferencesStore,
    PREFERENCES_FILE_NAME,
};
