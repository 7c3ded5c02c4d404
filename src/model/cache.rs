//! Per-path cache of published outlines

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::outline::CodeDocument;

/// Last published outline per file path.
///
/// Entries are written on every changed publish and never evicted.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<PathBuf, CodeDocument>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&CodeDocument> {
        self.entries.get(path)
    }

    pub fn insert(&mut self, path: PathBuf, document: CodeDocument) {
        self.entries.insert(path, document);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
