//! Header row parsing and column key sanitizing.

use std::collections::BTreeSet;

/// Column keys derived from a header row, with the original labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvHeader {
    /// Sanitized, unique column keys.
    pub keys: Vec<String>,
    /// Header text as written in the file (trimmed).
    pub labels: Vec<String>,
}

impl CsvHeader {
    /// Build keys for the given header labels.
    pub fn from_labels(labels: Vec<String>) -> Self {
        let mut seen = BTreeSet::new();
        let mut keys = Vec::with_capacity(labels.len());
        for (index, label) in labels.iter().enumerate() {
            let mut key = sanitize_key(label);
            if key.is_empty() {
                key = format!("column_{}", index + 1);
            }
            let key = unique_key(key, &seen);
            seen.insert(key.clone());
            keys.push(key);
        }
        Self { keys, labels }
    }

    /// Returns the number of columns.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the label for a column key.
    pub fn label_for(&self, key: &str) -> Option<&str> {
        let idx = self.keys.iter().position(|k| k == key)?;
        self.labels.get(idx).map(String::as_str)
    }
}

/// Lower-case the label and collapse every run of non-alphanumeric
/// characters into a single `_`, stripping leading/trailing underscores.
pub fn sanitize_key(label: &str) -> String {
    let mut key = String::with_capacity(label.len());
    let mut pending_separator = false;
    for ch in label.trim().trim_matches('\u{feff}').chars() {
        if ch.is_alphanumeric() {
            if pending_separator && !key.is_empty() {
                key.push('_');
            }
            pending_separator = false;
            key.extend(ch.to_lowercase());
        } else {
            pending_separator = true;
        }
    }
    key
}

fn unique_key(key: String, seen: &BTreeSet<String>) -> String {
    if !seen.contains(&key) {
        return key;
    }
    (2..)
        .map(|suffix| format!("{key}_{suffix}"))
        .find(|candidate| !seen.contains(candidate))
        .unwrap_or(key)
}
