pub mod json_file;
#[cfg(test)]
pub mod memory;
pub mod pattern;

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

/// Whole-document persistence keyed by path.
///
/// Failures never cross this boundary as errors: implementations log them
/// and report `None`, `false`, or whatever they managed to remove.
pub trait DocumentStore {
    /// Load the document, or `None` if it is absent or unreadable.
    fn load<T: DeserializeOwned>(&self, path: &Path) -> Option<T>;

    /// Replace the document, preserving the previous version first if `backup` is set.
    #[must_use]
    fn save<T: Serialize>(&self, path: &Path, document: &T, backup: bool) -> bool;

    /// Remove documents in `directory` matching `pattern` that are older than `retention_days`.
    ///
    /// Returns the number of documents removed.
    fn cleanup(&self, directory: &Path, pattern: &str, retention_days: u32) -> usize;
}
