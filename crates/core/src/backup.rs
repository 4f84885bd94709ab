use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::info;

/// `strftime` pattern of the timestamp embedded in backup names.
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
pub const BACKUP_EXTENSION: &str = "bak";

/// 備份設定檔時的錯誤。 / Error raised while copying the config backup.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("failed to copy {source_path} to {backup_path}: {source}")]
    Copy {
        source_path: PathBuf,
        backup_path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 計算備份檔路徑。 / Computes the sibling backup path for `path`.
///
/// `games/default.cfg` at 2024-05-01 13:45:10 becomes
/// `games/default_2024-05-01_13-45-10.bak`.
pub fn backup_path_for(path: &Path, timestamp: NaiveDateTime) -> PathBuf {
    let mut name: OsString = path
        .file_stem()
        .map(|stem| stem.to_os_string())
        .unwrap_or_default();
    name.push(format!(
        "_{}.{}",
        timestamp.format(BACKUP_TIMESTAMP_FORMAT),
        BACKUP_EXTENSION
    ));
    path.with_file_name(name)
}

/// 以目前時間建立備份。 / Copies the on-disk file next to itself, stamped with local time.
pub fn create_backup(path: &Path) -> Result<PathBuf, BackupError> {
    create_backup_at(path, Local::now().naive_local())
}

pub fn create_backup_at(path: &Path, timestamp: NaiveDateTime) -> Result<PathBuf, BackupError> {
    let backup_path = backup_path_for(path, timestamp);
    fs::copy(path, &backup_path).map_err(|source| BackupError::Copy {
        source_path: path.to_path_buf(),
        backup_path: backup_path.clone(),
        source,
    })?;
    info!(backup = %backup_path.display(), "config backup written");
    Ok(backup_path)
}
