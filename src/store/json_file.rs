use std::{
    ffi::OsStr,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local, TimeDelta};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    prelude::*,
    store::{DocumentStore, pattern::FilePattern},
};

/// Pretty-printed JSON documents on the local filesystem.
///
/// Writes go through a temporary sibling file which is synced and then replaces the target,
/// so a failed write never leaves a truncated document behind.
#[must_use]
#[derive(Copy, Clone, Debug, Default)]
pub struct JsonFileStore;

impl DocumentStore for JsonFileStore {
    fn load<T: DeserializeOwned>(&self, path: &Path) -> Option<T> {
        Self::load_fallibly(path).unwrap_or_else(|error| {
            error!("failed to load `{}`: {error:#}", path.display());
            None
        })
    }

    fn save<T: Serialize>(&self, path: &Path, document: &T, backup: bool) -> bool {
        match Self::save_fallibly(path, document, backup) {
            Ok(()) => true,
            Err(error) => {
                error!("failed to save `{}`: {error:#}", path.display());
                false
            }
        }
    }

    fn cleanup(&self, directory: &Path, pattern: &str, retention_days: u32) -> usize {
        Self::cleanup_fallibly(directory, &FilePattern::new(pattern), retention_days)
            .unwrap_or_else(|error| {
                error!("failed to clean up `{}`: {error:#}", directory.display());
                0
            })
    }
}

impl JsonFileStore {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn load_fallibly<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.is_file() {
            debug!("no document yet");
            return Ok(None);
        }
        let contents = fs::read(path).context("failed to read the document")?;
        let document = serde_json::from_slice(&contents).context("failed to parse the document")?;
        Ok(Some(document))
    }

    #[instrument(skip_all, fields(path = %path.display(), backup = backup))]
    fn save_fallibly<T: Serialize>(path: &Path, document: &T, backup: bool) -> Result {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create `{}`", parent.display()))?;
        }
        if backup && path.is_file() {
            fs::copy(path, backup_path(path)).context("failed to back up the previous version")?;
        }
        let contents = serde_json::to_vec_pretty(document)?;
        let temporary_path = with_extra_extension(path, "tmp");
        write_synced(&temporary_path, &contents).context("failed to write the temporary file")?;
        if let Err(error) = fs::rename(&temporary_path, path) {
            if let Err(remove_error) = fs::remove_file(&temporary_path) {
                warn!("failed to remove `{}`: {remove_error:#}", temporary_path.display());
            }
            return Err(error).context("failed to replace the document");
        }
        debug!("saved");
        Ok(())
    }

    #[instrument(skip_all, fields(directory = %directory.display(), retention_days = retention_days))]
    fn cleanup_fallibly(
        directory: &Path,
        pattern: &FilePattern,
        retention_days: u32,
    ) -> Result<usize> {
        if !directory.is_dir() {
            return Ok(0);
        }
        let Some(expires_before) =
            Local::now().checked_sub_signed(TimeDelta::days(i64::from(retention_days)))
        else {
            return Ok(0);
        };
        let mut n_removed = 0;
        for entry in fs::read_dir(directory)? {
            let path = entry?.path();
            let file_name = path.file_name().and_then(OsStr::to_str);
            if !file_name.is_some_and(|file_name| pattern.matches(file_name)) {
                continue;
            }
            match remove_if_expired(&path, expires_before) {
                Ok(true) => {
                    n_removed += 1;
                }
                Ok(false) => {}
                Err(error) => {
                    warn!("failed to remove `{}`: {error:#}", path.display());
                }
            }
        }
        Ok(n_removed)
    }
}

/// Write the contents and flush them to the disk.
fn write_synced(path: &Path, contents: &[u8]) -> Result {
    let mut file = File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()?;
    Ok(())
}

/// Remove the document together with its backup if it was last modified before the cutoff.
fn remove_if_expired(path: &Path, expires_before: DateTime<Local>) -> Result<bool> {
    let metadata = fs::metadata(path)?;
    if !metadata.is_file() {
        return Ok(false);
    }
    let modified_at = DateTime::<Local>::from(metadata.modified()?);
    if modified_at >= expires_before {
        return Ok(false);
    }
    fs::remove_file(path)?;
    debug!(path = %path.display(), %modified_at, "removed");
    let backup_path = backup_path(path);
    if backup_path.is_file()
        && let Err(error) = fs::remove_file(&backup_path)
    {
        warn!("failed to remove `{}`: {error:#}", backup_path.display());
    }
    Ok(true)
}

/// Where [`JsonFileStore`] keeps the previous version of the document.
#[must_use]
pub fn backup_path(path: &Path) -> PathBuf {
    with_extra_extension(path, "bak")
}

fn with_extra_extension(path: &Path, extension: &str) -> PathBuf {
    let mut path = path.as_os_str().to_owned();
    path.push(".");
    path.push(extension);
    PathBuf::from(path)
}
