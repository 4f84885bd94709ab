use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

/// Width of the key column when the config file is written back.
pub const KEY_COLUMN_WIDTH: usize = 30;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// One `key value` line of the engine config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub value: String,
}

impl ConfigEntry {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Flat engine config (`default.cfg`), entries kept in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineConfig {
    entries: Vec<ConfigEntry>,
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigFileError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parses config text. Comment and blank lines are dropped; a line with
    /// unbalanced quotes is skipped. A repeated key keeps its first position
    /// and takes the later value.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            let Some(tokens) = shlex::split(line) else {
                warn!(line = index + 1, "skipping config line with unbalanced quotes");
                continue;
            };
            let mut tokens = tokens.into_iter();
            let Some(key) = tokens.next() else {
                continue;
            };
            let value = tokens.next().unwrap_or_default();
            config.set(key, value);
        }
        config
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Replaces the value of an existing key or appends a new entry.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => entry.value = value,
            None => self.entries.push(ConfigEntry { key, value }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ConfigEntry> for EngineConfig {
    fn from_iter<I: IntoIterator<Item = ConfigEntry>>(iter: I) -> Self {
        let mut config = Self::default();
        for entry in iter {
            config.set(entry.key, entry.value);
        }
        config
    }
}

/// Formats one line: key left-aligned in [`KEY_COLUMN_WIDTH`] columns. Keys
/// that fill the column still get one space before the value.
pub fn format_line(key: &str, value: &str) -> String {
    if key.chars().count() >= KEY_COLUMN_WIDTH {
        format!("{key} {value}\n")
    } else {
        format!("{key:<width$}{value}\n", width = KEY_COLUMN_WIDTH)
    }
}

/// Renders entries in the order given.
pub fn render<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a ConfigEntry>,
{
    entries
        .into_iter()
        .map(|entry| format_line(&entry.key, &entry.value))
        .collect()
}

/// Rewrites the whole file.
pub fn write_config<'a, I>(path: &Path, entries: I) -> Result<(), ConfigFileError>
where
    I: IntoIterator<Item = &'a ConfigEntry>,
{
    fs::write(path, render(entries)).map_err(|source| ConfigFileError::Write {
        path: path.to_path_buf(),
        source,
    })
}
