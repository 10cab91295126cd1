//! Preset JSON encode/decode
//!
//! Wire format: `[{"section":"S","key":"K","value":"V"},...]` on one line.
//!
//! The default reader is a lenient scanner, not a JSON parser. It keeps the
//! quirks existing preset files rely on: braces are not balanced, a `}` inside
//! a value ends the block, and only `\"` and `\\` are unescaped. A strict
//! serde-backed reader is available for callers that opt in.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use tracing::debug;

use crate::document::Entry;

static BLOCK: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{([^}]+)\}").ok());

static FIELD: LazyLock<Option<Regex>> = LazyLock::new(|| {
    RegexBuilder::new(r#""(section|key|value)"\s*:\s*"(.*?)""#)
        .case_insensitive(true)
        .build()
        .ok()
});

/// Lenient decode. Never fails; unusable blocks are skipped.
pub fn decode(json: &str) -> Vec<Entry> {
    let mut entries = Vec::new();
    let (Some(block), Some(field)) = (BLOCK.as_ref(), FIELD.as_ref()) else {
        return entries;
    };

    for item in block.find_iter(json) {
        let mut entry = Entry::default();
        for pair in field.captures_iter(item.as_str()) {
            let value = unescape(&pair[2]);
            match pair[1].to_ascii_lowercase().as_str() {
                "section" => entry.section = value,
                "key" => entry.key = value,
                _ => entry.value = value,
            }
        }

        if entry.key.trim().is_empty() {
            debug!(block = %item.as_str(), "Skipping preset block without key");
            continue;
        }
        entries.push(entry);
    }

    entries
}

/// Strict decode through serde_json. Any syntax or shape error is reported.
pub fn decode_strict(json: &str) -> Result<Vec<Entry>> {
    let entries: Vec<Entry> =
        serde_json::from_str(json).context("Preset is not a JSON array of section/key/value objects")?;
    Ok(entries
        .into_iter()
        .filter(|e| !e.key.trim().is_empty())
        .collect())
}

/// Single-line JSON array, fields always in section, key, value order
pub fn encode<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a Entry>,
{
    let mut out = String::from("[");
    for (i, entry) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str("{\"section\":\"");
        out.push_str(&escape(&entry.section));
        out.push_str("\",\"key\":\"");
        out.push_str(&escape(&entry.key));
        out.push_str("\",\"value\":\"");
        out.push_str(&escape(&entry.value));
        out.push_str("\"}");
    }
    out.push(']');
    out
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape(s: &str) -> String {
    s.replace("\\\"", "\"").replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let entries = vec![Entry::new("S", "k", "v"), Entry::new("", "k2", "")];
        assert_eq!(
            encode(&entries),
            r#"[{"section":"S","key":"k","value":"v"},{"section":"","key":"k2","value":""}]"#
        );
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&Vec::<Entry>::new()), "[]");
    }

    #[test]
    fn test_encode_escapes_only_backslash_and_quote() {
        let entries = vec![Entry::new("S", "path", "C:\\x \"q\"\tend")];
        assert_eq!(
            encode(&entries),
            "[{\"section\":\"S\",\"key\":\"path\",\"value\":\"C:\\\\x \\\"q\\\"\tend\"}]"
        );
    }

    #[test]
    fn test_decode_encoded_output() {
        let entries = vec![
            Entry::new("/Script/Game.Settings", "ResolutionSizeX", "1920"),
            Entry::new("Other", "Path", "C:\\Games"),
        ];
        assert_eq!(decode(&encode(&entries)), entries);
    }

    #[test]
    fn test_decode_tolerates_whitespace_and_case() {
        let json = r#"[
            { "Section" : "S", "KEY": "k", "value":"v" },
            {"key": "only"}
        ]"#;
        assert_eq!(
            decode(json),
            vec![Entry::new("S", "k", "v"), Entry::new("", "only", "")]
        );
    }

    #[test]
    fn test_decode_skips_blocks_without_key() {
        let json = r#"[{"section":"S","value":"v"},{"section":"S","key":"  ","value":"v"}]"#;
        assert!(decode(json).is_empty());
    }

    #[test]
    fn test_decode_truncated_input() {
        let good = r#"[{"section":"S","key":"a","value":"1"},{"section":"S","key":"b","value":"2"}]"#;
        let truncated = &good[..good.len() - 10];
        let partial = decode(truncated);
        assert_eq!(partial, vec![Entry::new("S", "a", "1")]);
        assert!(partial.len() < decode(good).len());
        assert!(decode("not json at all {").is_empty());
    }

    #[test]
    fn test_decode_brace_in_value_truncates_block() {
        let json = r#"[{"section":"S","value":"a}b","key":"k"}]"#;
        // The block ends at the first '}', so the key is never seen
        assert!(decode(json).is_empty());
    }

    #[test]
    fn test_decode_escaped_quote_ends_value_early() {
        let json = r#"[{"section":"S","key":"k","value":"say \"hi\""}]"#;
        assert_eq!(decode(json), vec![Entry::new("S", "k", "say \\")]);
    }

    #[test]
    fn test_decode_strict_accepts_valid() {
        let json = r#"[{"section":"S","key":"k","value":"a}b"},{"key":"g"}]"#;
        let entries = decode_strict(json).expect("valid preset JSON");
        assert_eq!(
            entries,
            vec![Entry::new("S", "k", "a}b"), Entry::new("", "g", "")]
        );
    }

    #[test]
    fn test_decode_strict_rejects_malformed() {
        assert!(decode_strict(r#"[{"section":"S","key":"k""#).is_err());
        assert!(decode_strict(r#"[{"section":"S","key":1}]"#).is_err());
    }
}
