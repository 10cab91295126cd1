//! Entries to text
//!
//! Canonical output: one block per section in first-seen order, every block
//! followed by a blank line. Comments and original spacing are not kept.

use super::entry::{Entry, eq_ignore_case};
use crate::constants::ini::{KEY_VALUE_SEPARATOR, LINE_BREAK, SECTION_CLOSE, SECTION_OPEN};

/// Serialize entries grouped by case-insensitive section name
pub fn serialize<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a Entry>,
{
    // (section spelling as first seen, members in relative order)
    let mut groups: Vec<(&str, Vec<&Entry>)> = Vec::new();
    for entry in entries {
        match groups
            .iter()
            .position(|(name, _)| eq_ignore_case(name, &entry.section))
        {
            Some(i) => groups[i].1.push(entry),
            None => groups.push((entry.section.as_str(), vec![entry])),
        }
    }

    let mut out = String::new();
    for (section, members) in groups {
        if !section.is_empty() {
            out.push(SECTION_OPEN);
            out.push_str(section);
            out.push(SECTION_CLOSE);
            out.push_str(LINE_BREAK);
        }
        for entry in members {
            out.push_str(&entry.key);
            out.push(KEY_VALUE_SEPARATOR);
            out.push_str(&entry.value);
            out.push_str(LINE_BREAK);
        }
        out.push_str(LINE_BREAK);
    }
    out
}
