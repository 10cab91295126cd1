//! Text to entries
//!
//! Line-oriented reader for the narrow INI dialect: `[Section]` headers,
//! `key=value` lines and `;`/`#` comments. Anything else is dropped without
//! an error.

use tracing::debug;

use super::entry::Entry;
use crate::constants::ini::{COMMENT_PREFIXES, KEY_VALUE_SEPARATOR, SECTION_CLOSE, SECTION_OPEN};

/// Parse document text into entries, in file order
pub fn parse(text: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current_section = String::new();

    // \r, \n and \r\n all end a line; the empty pieces \r\n leaves are skipped below
    for line in text.split(['\r', '\n']) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with(COMMENT_PREFIXES) {
            continue;
        }

        if let Some(name) = section_name(trimmed) {
            current_section = name.trim().to_string();
            continue;
        }

        match trimmed.find(KEY_VALUE_SEPARATOR) {
            Some(eq) if eq > 0 => {
                let key = trimmed[..eq].trim();
                let value = trimmed[eq + 1..].trim();
                entries.push(Entry::new(current_section.as_str(), key, value));
            }
            _ => debug!(content = %trimmed, "Discarding line without key"),
        }
    }

    entries
}

/// Inner text of a `[name]` header line; the name must be at least one character
fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix(SECTION_OPEN)
        .and_then(|rest| rest.strip_suffix(SECTION_CLOSE))
        .filter(|inner| !inner.is_empty())
}
