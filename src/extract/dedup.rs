use std::collections::HashSet;

use crate::types::ReviewRecord;

pub const DEFAULT_PREFIX_CHARS: usize = 80;

/// Seen-key accumulator for one run. Key = author, date, and the first
/// `prefix_chars` characters of the text.
#[derive(Debug, Clone)]
pub struct Deduplicator {
    seen: HashSet<String>,
    prefix_chars: usize,
}

impl Deduplicator {
    pub fn new(prefix_chars: usize) -> Self {
        Self {
            seen: HashSet::new(),
            prefix_chars,
        }
    }

    pub fn key(&self, author: &str, date: &str, text: &str) -> String {
        let prefix: String = text.chars().take(self.prefix_chars).collect();
        format!("{author}\u{1f}{date}\u{1f}{prefix}")
    }

    /// True the first time a key is seen.
    pub fn admit(&mut self, author: &str, date: &str, text: &str) -> bool {
        let key = self.key(author, date, text);
        self.seen.insert(key)
    }

    pub fn admit_record(&mut self, record: &ReviewRecord) -> bool {
        self.admit(&record.author, &record.date, &record.text)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

impl Default for Deduplicator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX_CHARS)
    }
}
