//! Editable ordered collection of entries
//!
//! Front ends bind their row widgets to an `EntryStore` instead of keeping
//! their own copy of the document. Rows may hold untrimmed or half-typed
//! values; `enumerate` is the clean view handed to serialization.

use std::collections::HashSet;
use tracing::{debug, info};

use crate::document::Entry;

/// Result of an upsert, carrying the affected row index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Updated(usize),
    Inserted(usize),
}

#[derive(Debug, Default, Clone)]
pub struct EntryStore {
    rows: Vec<Entry>,
    /// In-progress "new row" that is not part of the document yet
    draft: Option<Entry>,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace contents wholesale, keeping parse order
    pub fn load(&mut self, entries: Vec<Entry>) {
        self.rows = entries;
        self.draft = None;
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Entry] {
        &self.rows
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.rows.get(index)
    }

    /// Index of the first row matching `(section, key)`, ignoring case
    pub fn find(&self, section: &str, key: &str) -> Option<usize> {
        self.rows.iter().position(|e| e.matches(section, key))
    }

    /// Replace the value of the first case-insensitive match, or append
    pub fn upsert(&mut self, section: &str, key: &str, value: &str) -> Upsert {
        match self.find(section, key) {
            Some(index) => {
                self.rows[index].value = value.to_string();
                Upsert::Updated(index)
            }
            None => {
                self.rows.push(Entry::new(section, key, value));
                Upsert::Inserted(self.rows.len() - 1)
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Append a copy of the row at `index`; returns the new row's index
    pub fn duplicate(&mut self, index: usize) -> Option<usize> {
        let copy = self.rows.get(index)?.clone();
        self.rows.push(copy);
        Some(self.rows.len() - 1)
    }

    /// Start (or continue) editing the placeholder row
    pub fn draft_mut(&mut self) -> &mut Entry {
        self.draft.get_or_insert_with(Entry::default)
    }

    /// Move the placeholder row into the collection
    pub fn commit_draft(&mut self) -> Option<usize> {
        let entry = self.draft.take()?;
        self.rows.push(entry);
        Some(self.rows.len() - 1)
    }

    /// Trim every row, then keep only the first row of each case-insensitive
    /// `(section, key)` pair. Returns how many rows were dropped.
    pub fn normalize(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen = HashSet::with_capacity(before);
        self.rows.retain_mut(|entry| {
            entry.trim_in_place();
            let keep = seen.insert(entry.signature());
            if !keep {
                debug!(section = %entry.section, key = %entry.key, "Dropping duplicate row");
            }
            keep
        });
        let removed = before - self.rows.len();
        info!(removed, "Normalized rows");
        removed
    }

    /// Indices of rows where the trimmed query is a case-insensitive substring
    /// of section, key or value. An empty query matches every row.
    pub fn filter(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                needle.is_empty()
                    || [&e.section, &e.key, &e.value]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Clean document view: section and key trimmed, rows with a blank
    /// section or key left out, draft row excluded.
    pub fn enumerate(&self) -> Vec<Entry> {
        self.rows
            .iter()
            .filter(|e| !e.is_blank())
            .map(|e| Entry::new(e.section.trim(), e.key.trim(), e.value.as_str()))
            .collect()
    }
}
