//! Load, backup and atomic save of documents on disk
//!
//! Save sequence: copy the current file to `<path>.bak-<YYYYMMDD-HHMMSS>`,
//! write the new text to `<path>.tmp`, delete `<path>`, rename the temp file
//! into place. A crash between the delete and the rename leaves only the
//! `.tmp` file behind.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::files::{BACKUP_INFIX, BACKUP_TIMESTAMP_FORMAT, TEMP_SUFFIX};
use crate::document::{self, Entry};

/// A backup with the same timestamp already exists; backups are never overwritten
#[derive(Debug)]
pub struct BackupExists {
    pub path: PathBuf,
}

impl std::error::Error for BackupExists {}

impl fmt::Display for BackupExists {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "backup {} already exists", self.path.display())
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// `<path>.bak-<timestamp>` for the given local time
pub fn backup_path(path: &Path, now: &DateTime<Local>) -> PathBuf {
    let stamp = now.format(BACKUP_TIMESTAMP_FORMAT).to_string();
    with_suffix(path, &format!("{BACKUP_INFIX}{stamp}"))
}

/// Sibling file the new contents are written to before the replace step
pub fn temp_path(path: &Path) -> PathBuf {
    with_suffix(path, TEMP_SUFFIX)
}

/// Read and parse an existing file
pub fn load(path: &Path) -> Result<Vec<Entry>> {
    if !path.is_file() {
        bail!("File not found: {}", path.display());
    }
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let entries = document::parse(&text);
    info!(path = %path.display(), entries = entries.len(), "Loaded document");
    Ok(entries)
}

/// Copy the file at `path` to a timestamped backup
pub fn backup(path: &Path) -> Result<PathBuf> {
    backup_at(path, &Local::now())
}

pub fn backup_at(path: &Path, now: &DateTime<Local>) -> Result<PathBuf> {
    let target = backup_path(path, now);
    let mut source =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let mut dest = match OpenOptions::new().write(true).create_new(true).open(&target) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(BackupExists { path: target }.into());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to create backup {}", target.display()));
        }
    };
    if let Err(e) = io::copy(&mut source, &mut dest) {
        drop(dest);
        // A partial backup would block a retry within the same second
        if let Err(cleanup) = fs::remove_file(&target) {
            warn!(backup = %target.display(), error = %cleanup, "Failed to remove partial backup");
        }
        return Err(e)
            .with_context(|| format!("Failed to copy {} to {}", path.display(), target.display()));
    }

    info!(path = %path.display(), backup = %target.display(), "Backup created");
    Ok(target)
}

/// Back up the current file (if any) and atomically replace it with `entries`.
/// Returns the backup path when a previous file existed.
pub fn save(path: &Path, entries: &[Entry]) -> Result<Option<PathBuf>> {
    save_at(path, entries, &Local::now())
}

pub fn save_at(path: &Path, entries: &[Entry], now: &DateTime<Local>) -> Result<Option<PathBuf>> {
    if path.as_os_str().is_empty() {
        bail!("No file path specified");
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let backup = if path.exists() {
        Some(backup_at(path, now)?)
    } else {
        None
    };

    // String is UTF-8 and nothing prepends a byte-order mark
    let temp = temp_path(path);
    fs::write(&temp, document::serialize(entries))
        .with_context(|| format!("Failed to write temporary file {}", temp.display()))?;

    if path.exists() {
        fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    fs::rename(&temp, path).with_context(|| {
        format!("Failed to move {} to {}", temp.display(), path.display())
    })?;

    info!(path = %path.display(), entries = entries.len(), "Saved document");
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ini_preset_editor_{}_{}_{}",
            name,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 2).unwrap()
    }

    #[test]
    fn test_backup_path_format() {
        let path = backup_path(Path::new("/cfg/Engine.ini"), &fixed_time());
        assert_eq!(path, PathBuf::from("/cfg/Engine.ini.bak-20240309-070502"));
        assert_eq!(temp_path(Path::new("/cfg/Engine.ini")), PathBuf::from("/cfg/Engine.ini.tmp"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = scratch_dir("load_missing");
        let err = load(&dir.join("absent.ini")).unwrap_err();
        assert!(err.to_string().contains("File not found"));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_new_file_creates_parent_without_backup() {
        let dir = scratch_dir("save_new");
        let path = dir.join("nested").join("Game.ini");
        let entries = vec![Entry::new("S", "k", "v")];

        let backup = save_at(&path, &entries, &fixed_time()).unwrap();
        assert_eq!(backup, None);
        assert_eq!(fs::read_to_string(&path).unwrap(), "[S]\nk=v\n\n");
        assert!(!temp_path(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_backs_up_previous_contents() {
        let dir = scratch_dir("save_backup");
        let path = dir.join("Game.ini");
        fs::write(&path, "; old\n[S]\nk=old\n").unwrap();

        let backup = save_at(&path, &[Entry::new("S", "k", "new")], &fixed_time())
            .unwrap()
            .expect("backup of existing file");
        assert_eq!(fs::read_to_string(&backup).unwrap(), "; old\n[S]\nk=old\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "[S]\nk=new\n\n");
        assert_eq!(load(&path).unwrap(), vec![Entry::new("S", "k", "new")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_second_save_in_same_second_fails_on_backup() {
        let dir = scratch_dir("save_collision");
        let path = dir.join("Game.ini");
        fs::write(&path, "[S]\nk=1\n").unwrap();
        let entries = vec![Entry::new("S", "k", "2")];

        save_at(&path, &entries, &fixed_time()).unwrap();
        let err = save_at(&path, &[Entry::new("S", "k", "3")], &fixed_time()).unwrap_err();
        assert!(err.downcast_ref::<BackupExists>().is_some());
        // Nothing past the backup step ran
        assert_eq!(fs::read_to_string(&path).unwrap(), "[S]\nk=2\n\n");
        assert!(!temp_path(&path).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_failed_copy_leaves_no_backup() {
        let dir = scratch_dir("backup_dir_source");
        let source = dir.join("Game.ini");
        fs::create_dir_all(&source).unwrap();

        assert!(backup_at(&source, &fixed_time()).is_err());
        assert!(!backup_path(&source, &fixed_time()).exists());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_backup_missing_source() {
        let dir = scratch_dir("backup_missing");
        assert!(backup(&dir.join("absent.ini")).is_err());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_rejects_empty_path() {
        assert!(save(Path::new(""), &[]).is_err());
    }

    #[test]
    fn test_saved_file_has_no_bom() {
        let dir = scratch_dir("no_bom");
        let path = dir.join("Game.ini");
        save_at(&path, &[Entry::new("Ü", "k", "é")], &fixed_time()).unwrap();
        let bytes = fs::read(&path).unwrap();
        assert!(!bytes.starts_with(&[0xEF, 0xBB, 0xBF]));
        assert_eq!(String::from_utf8(bytes).unwrap(), "[Ü]\nk=é\n\n");
        fs::remove_dir_all(&dir).unwrap();
    }
}
