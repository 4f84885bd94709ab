use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// File name of the launcher preferences inside the user's home directory.
pub const PREFERENCES_FILE_NAME: &str = ".doom_launcher_config";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Persistent launcher settings. Every field is optional; an unset field
/// means the user still has to configure it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub wad_dir: Option<PathBuf>,
    #[serde(default, rename = "doom_engine_command")]
    pub engine_command: Option<String>,
    #[serde(default, rename = "default_cfg_path")]
    pub config_file: Option<PathBuf>,
}

impl Preferences {
    pub fn sanitize(&mut self) {
        self.engine_command = self
            .engine_command
            .take()
            .map(|command| command.trim().to_string())
            .filter(|command| !command.is_empty());
        if blank_path(self.wad_dir.as_deref()) {
            self.wad_dir = None;
        }
        if blank_path(self.config_file.as_deref()) {
            self.config_file = None;
        }
    }

    pub fn needs_engine_command(&self) -> bool {
        self.engine_command.is_none()
    }

    pub fn needs_wad_dir(&self) -> bool {
        self.wad_dir.is_none()
    }
}

fn blank_path(path: Option<&Path>) -> bool {
    path.map(|p| p.as_os_str().is_empty()).unwrap_or(false)
}

/// Resolves `~/.doom_launcher_config`, falling back to the working directory
/// when the platform reports no home directory.
pub fn default_preferences_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PREFERENCES_FILE_NAME)
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// Loads preferences, degrading to an unconfigured state on any failure.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        match Self::try_load(&path) {
            Ok(store) => store,
            Err(err) => {
                warn!(error = %err, "preferences unreadable, starting unconfigured");
                Self {
                    path,
                    data: Preferences::default(),
                }
            }
        }
    }

    pub fn try_load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!(path = %path.display(), "no preferences file yet");
            return Ok(Self {
                path,
                data: Preferences::default(),
            });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    /// Applies `op` and persists the result right away.
    pub fn update<F>(&mut self, op: F) -> Result<(), PreferencesError>
    where
        F: FnOnce(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "preferences saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
