//! Editing session: the store plus the path it was loaded from
//!
//! Front ends hold one `Session` and translate their widgets' actions into
//! calls on it. The loaded path is session state, not a global.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::document::{self, Entry};
use crate::persistence;
use crate::preset;
use crate::store::{EntryStore, Upsert};

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub path: PathBuf,
    pub entries: usize,
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct Session {
    pub store: EntryStore,
    loaded_path: Option<PathBuf>,
    /// Decode preset imports with the strict JSON reader
    pub strict_presets: bool,
}

fn non_blank(path: &str) -> Option<PathBuf> {
    let trimmed = path.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded_path(&self) -> Option<&Path> {
        self.loaded_path.as_deref()
    }

    /// Load the document at `path` into the store; returns the entry count
    pub fn open(&mut self, path: &str) -> Result<usize> {
        let Some(path) = non_blank(path) else {
            bail!("No file path specified");
        };
        let entries = persistence::load(&path)?;
        let count = entries.len();
        self.store.load(entries);
        self.loaded_path = Some(path);
        Ok(count)
    }

    /// Save to the loaded path, or to `fallback` when nothing was loaded yet
    pub fn save(&mut self, fallback: &str) -> Result<SaveReport> {
        let path = match self.loaded_path.clone().or_else(|| non_blank(fallback)) {
            Some(path) => path,
            None => bail!("No file path specified"),
        };
        self.loaded_path = Some(path.clone());

        let entries = self.store.enumerate();
        let backup = persistence::save(&path, &entries)?;
        Ok(SaveReport {
            path,
            entries: entries.len(),
            backup,
        })
    }

    /// Standalone backup of the loaded file
    pub fn backup(&self) -> Result<PathBuf> {
        match self.loaded_path.as_deref() {
            Some(path) if path.is_file() => persistence::backup(path),
            _ => bail!("Load a file first."),
        }
    }

    /// Upsert every entry; returns how many were applied
    pub fn apply_preset(&mut self, entries: &[Entry]) -> usize {
        let inserted = entries
            .iter()
            .map(|e| self.store.upsert(&e.section, &e.key, &e.value))
            .filter(|outcome| matches!(outcome, Upsert::Inserted(_)))
            .count();
        info!(applied = entries.len(), inserted, "Preset applied (not saved yet)");
        entries.len()
    }

    /// Read a preset JSON file and apply it; returns the number of entries
    /// found. Zero means the file held nothing usable.
    pub fn import_preset(&mut self, path: &Path) -> Result<usize> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read preset {}", path.display()))?;
        let entries = if self.strict_presets {
            preset::decode_strict(&json)
                .with_context(|| format!("Failed to import {}", path.display()))?
        } else {
            preset::decode(&json)
        };
        if entries.is_empty() {
            info!(path = %path.display(), "No entries found in preset");
            return Ok(0);
        }
        self.apply_preset(&entries);
        Ok(entries.len())
    }

    /// Write the current document as preset JSON; returns the entry count
    pub fn export_preset(&self, path: &Path) -> Result<usize> {
        let entries = self.store.enumerate();
        fs::write(path, preset::encode(&entries))
            .with_context(|| format!("Failed to write preset {}", path.display()))?;
        info!(path = %path.display(), entries = entries.len(), "Exported preset");
        Ok(entries.len())
    }

    /// Canonical text of the current document without touching disk
    pub fn render(&self) -> String {
        document::serialize(&self.store.enumerate())
    }
}
