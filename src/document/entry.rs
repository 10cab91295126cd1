use serde::{Deserialize, Serialize};

/// One section/key/value triple from a configuration document.
///
/// An empty `section` is the global grouping for entries that appear before
/// any header line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default)]
    pub section: String,
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Entry {
    pub fn new(
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            key: key.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive `(section, key)` comparison
    pub fn matches(&self, section: &str, key: &str) -> bool {
        eq_ignore_case(&self.section, section) && eq_ignore_case(&self.key, key)
    }

    /// Case-folded `(section, key)` pair used for duplicate detection
    pub fn signature(&self) -> (String, String) {
        (self.section.to_lowercase(), self.key.to_lowercase())
    }

    /// Trim all three fields in place
    pub fn trim_in_place(&mut self) {
        trim_owned(&mut self.section);
        trim_owned(&mut self.key);
        trim_owned(&mut self.value);
    }

    /// Whether section or key is empty once trimmed
    pub fn is_blank(&self) -> bool {
        self.section.trim().is_empty() || self.key.trim().is_empty()
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

fn trim_owned(field: &mut String) {
    let trimmed = field.trim();
    if trimmed.len() != field.len() {
        *field = trimmed.to_string();
    }
}
