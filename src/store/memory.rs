use std::{
    cell::RefCell,
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeDelta};
use serde::{Serialize, de::DeserializeOwned};

use crate::store::{DocumentStore, pattern::FilePattern};

#[derive(Clone, Debug)]
pub struct Entry {
    pub contents: serde_json::Value,
    pub modified_at: DateTime<Local>,
}

/// In-memory stand-in for the filesystem, keeps JSON values so tests can poke at the raw documents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub entries: RefCell<BTreeMap<PathBuf, Entry>>,

    /// Number of saves that asked for a backup while a previous version existed.
    pub n_backups: RefCell<usize>,

    /// Makes every save fail.
    pub is_read_only: bool,
}

impl MemoryStore {
    pub fn insert(&self, path: impl Into<PathBuf>, contents: serde_json::Value, age: TimeDelta) {
        self.entries
            .borrow_mut()
            .insert(path.into(), Entry { contents, modified_at: Local::now() - age });
    }

    pub fn get(&self, path: &Path) -> Option<serde_json::Value> {
        self.entries.borrow().get(path).map(|entry| entry.contents.clone())
    }
}

impl DocumentStore for MemoryStore {
    fn load<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        serde_json::from_value(self.get(path)?).ok()
    }

    fn save<T: Serialize>(&self, path: &Path, document: &T, backup: bool) -> bool {
        if self.is_read_only {
            return false;
        }
        let Ok(contents) = serde_json::to_value(document) else {
            return false;
        };
        let previous = self
            .entries
            .borrow_mut()
            .insert(path.to_path_buf(), Entry { contents, modified_at: Local::now() });
        if backup && previous.is_some() {
            *self.n_backups.borrow_mut() += 1;
        }
        true
    }

    fn cleanup(&self, directory: &Path, pattern: &str, retention_days: u32) -> usize {
        let pattern = FilePattern::new(pattern);
        let expires_before = Local::now() - TimeDelta::days(i64::from(retention_days));
        let mut entries = self.entries.borrow_mut();
        let n_entries = entries.len();
        entries.retain(|path, entry| {
            let is_matching = path.parent() == Some(directory)
                && path
                    .file_name()
                    .and_then(|file_name| file_name.to_str())
                    .is_some_and(|file_name| pattern.matches(file_name));
            !is_matching || entry.modified_at >= expires_before
        });
        n_entries - entries.len()
    }
}
