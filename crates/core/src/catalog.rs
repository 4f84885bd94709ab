use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Extension of the game-data archives the launcher lists.
pub const ARCHIVE_EXTENSION: &str = "wad";

/// 列出封存檔時的錯誤。 / Error raised while listing archives.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read archive directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 目錄中的一個封存檔。 / A single archive inside the configured directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Display name; bytes that are not UTF-8 are replaced.
    pub file_name: String,
    pub path: PathBuf,
}

/// 封存檔清單結果。 / Outcome of listing the archive directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    /// No directory configured, or it no longer exists.
    NotConfigured,
    /// Matching archives, sorted by file name. May be empty.
    Archives(Vec<ArchiveEntry>),
}

impl Listing {
    pub fn entries(&self) -> &[ArchiveEntry] {
        match self {
            Listing::NotConfigured => &[],
            Listing::Archives(entries) => entries,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Listing::Archives(_))
    }
}

/// 判斷檔名是否為封存檔（不分大小寫）。 / Case-insensitive archive name check.
pub fn is_archive_name(file_name: &str) -> bool {
    let suffix_len = ARCHIVE_EXTENSION.len() + 1;
    if file_name.len() < suffix_len || !file_name.is_char_boundary(file_name.len() - suffix_len) {
        return false;
    }
    let (_, suffix) = file_name.split_at(file_name.len() - suffix_len);
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(ARCHIVE_EXTENSION)
}

/// 列出目錄中的封存檔並依名稱排序。 / Lists archives in `directory`, sorted by name.
///
/// An unset or missing directory is reported as [`Listing::NotConfigured`]
/// rather than an error. Reading never modifies the directory.
pub fn list_archives(directory: Option<&Path>) -> Result<Listing, CatalogError> {
    let Some(directory) = directory else {
        return Ok(Listing::NotConfigured);
    };
    if !directory.is_dir() {
        debug!(path = %directory.display(), "archive directory missing");
        return Ok(Listing::NotConfigured);
    }

    let read_err = |source| CatalogError::ReadDir {
        path: directory.to_path_buf(),
        source,
    };
    let mut entries = Vec::new();
    for item in fs::read_dir(directory).map_err(read_err)? {
        let item = item.map_err(read_err)?;
        // Lossy decoding only touches invalid sequences; the ASCII suffix and
        // the real path used for launching are unaffected.
        let file_name = item.file_name().to_string_lossy().into_owned();
        if !is_archive_name(&file_name) {
            continue;
        }
        let path = item.path();
        if !path.is_file() {
            continue;
        }
        entries.push(ArchiveEntry { file_name, path });
    }
    entries.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!(count = entries.len(), path = %directory.display(), "archives listed");
    Ok(Listing::Archives(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"IWAD").unwrap();
    }

    #[test]
    fn lists_case_insensitively_and_sorted() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "b.wad");
        touch(dir.path(), "A.WAD");
        touch(dir.path(), "c.txt");

        let listing = list_archives(Some(dir.path())).unwrap();
        let names: Vec<_> = listing
            .entries()
            .iter()
            .map(|entry| entry.file_name.as_str())
            .collect();
        assert_eq!(names, vec!["A.WAD", "b.wad"]);
        assert_eq!(listing.entries()[0].path, dir.path().join("A.WAD"));
    }

    #[test]
    fn skips_directories_named_like_archives() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("mods.wad")).unwrap();
        touch(dir.path(), "doom.Wad");

        let listing = list_archives(Some(dir.path())).unwrap();
        assert_eq!(listing.entries().len(), 1);
        assert_eq!(listing.entries()[0].file_name, "doom.Wad");
    }

    #[test]
    fn unset_or_missing_directory_is_not_configured() {
        assert_eq!(list_archives(None).unwrap(), Listing::NotConfigured);

        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let listing = list_archives(Some(&missing)).unwrap();
        assert_eq!(listing, Listing::NotConfigured);
        assert!(listing.entries().is_empty());
        assert!(!listing.is_configured());
    }

    #[test]
    fn empty_directory_is_configured_without_entries() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "readme.txt");
        let listing = list_archives(Some(dir.path())).unwrap();
        assert!(listing.is_configured());
        assert!(listing.entries().is_empty());
    }

    #[test]
    fn listing_is_repeatable() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "doom2.wad");
        let first = list_archives(Some(dir.path())).unwrap();
        let second = list_archives(Some(dir.path())).unwrap();
        assert_eq!(first, second);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_listed() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.wad");
        fs::write(dir.path().join(raw), b"PWAD").unwrap();

        let listing = list_archives(Some(dir.path())).unwrap();
        assert_eq!(listing.entries().len(), 1);
        let entry = &listing.entries()[0];
        assert_eq!(entry.path, dir.path().join(raw));
        assert!(entry.file_name.ends_with(".wad"));
        assert!(entry.file_name.starts_with("caf"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        touch(&locked, "doom.wad");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Root reads through directory permissions.
        let bypassed = fs::read_dir(&locked).is_ok();
        let result = list_archives(Some(&locked));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
        if bypassed {
            return;
        }
        match result {
            Err(CatalogError::ReadDir { path, source }) => {
                assert_eq!(path, locked);
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected ReadDir error, got {other:?}"),
        }
    }

    #[test]
    fn archive_name_matching() {
        assert!(is_archive_name("doom.wad"));
        assert!(is_archive_name("DOOM2.WAD"));
        assert!(is_archive_name("plutonia.WaD"));
        assert!(!is_archive_name("wad"));
        assert!(!is_archive_name("doom.wad.zip"));
        assert!(!is_archive_name("doomwad"));
        assert!(!is_archive_name("ünïcödé"));
    }
}
