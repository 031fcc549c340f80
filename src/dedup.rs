// src/dedup.rs
use std::collections::HashSet;

/// Accession numbers already alerted in this process. Append-only; lives and
/// dies with the session.
#[derive(Debug, Clone, Default)]
pub struct DedupStore {
    seen: HashSet<String>,
}

impl DedupStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, accession_number: &str) -> bool {
        self.seen.contains(accession_number)
    }

    /// Returns `false` if the key was already present.
    pub fn insert(&mut self, accession_number: impl Into<String>) -> bool {
        self.seen.insert(accession_number.into())
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
