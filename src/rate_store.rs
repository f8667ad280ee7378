use std::path::PathBuf;

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::serde_as;

use crate::{
    core::{
        merge::merge,
        rates::{Minute, RateTable, Rates, keys},
    },
    prelude::*,
    store::{DocumentStore, json_file::JsonFileStore},
};

const FILE_PATTERN: &str = "rates_*.json";

#[must_use]
#[derive(Clone, Debug, bon::Builder)]
pub struct RateStoreConfig {
    /// Directory holding one document per day.
    #[builder(into, default = PathBuf::from("rates"))]
    pub save_dir: PathBuf,

    /// Documents last written longer ago than this are removed when the store opens.
    #[builder(default = 7)]
    pub retention_days: u32,
}

impl Default for RateStoreConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Stored rates of a single day.
///
/// The metadata is informational, a value of the wrong shape reads as absent
/// so that the stored rates stay usable.
#[serde_as]
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateDocument {
    #[serde(default, with = "keys")]
    pub rates_import: RateTable,

    #[serde(default, with = "keys")]
    pub rates_export: RateTable,

    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_updated: Option<DateTime<Local>>,

    /// Freeze boundary of the most recent write.
    #[serde(default)]
    #[serde_as(as = "serde_with::DefaultOnError")]
    pub frozen_before_minute: Option<Minute>,
}

impl From<RateDocument> for Rates {
    fn from(document: RateDocument) -> Self {
        Self::new(document.rates_import, document.rates_export)
    }
}

/// Accepts both offset-aware and naive ISO-8601 timestamps, the latter being local time.
///
/// Anything else is dropped rather than making the whole document unreadable.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Local>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::String(text) => text,
        value => {
            warn!("ignoring non-string `last_updated`: `{value}`");
            return Ok(None);
        }
    };
    if let Ok(timestamp) = text.parse::<DateTime<FixedOffset>>() {
        return Ok(Some(timestamp.with_timezone(&Local)));
    }
    if let Ok(timestamp) = text.parse::<NaiveDateTime>() {
        return Ok(timestamp.and_local_timezone(Local).earliest());
    }
    warn!("ignoring malformed `last_updated`: `{text}`");
    Ok(None)
}

/// Per-day import and export rates where the past, once written, stays put.
///
/// Every call goes straight to the underlying [`DocumentStore`], nothing is cached.
pub struct RateStore<S = JsonFileStore> {
    store: S,
    save_dir: PathBuf,
}

impl<S: DocumentStore> RateStore<S> {
    /// Open the store and drop documents which are past the configured retention.
    pub fn new(store: S, config: &RateStoreConfig) -> Self {
        let this = Self { store, save_dir: config.save_dir.clone() };
        let n_removed = this.cleanup_old_files(config.retention_days);
        if n_removed != 0 {
            info!(n_removed, "cleaned up old rate files");
        }
        this
    }

    /// Document path of the date, the time of day is irrelevant.
    #[must_use]
    pub fn path_for(&self, date: &impl Datelike) -> PathBuf {
        self.save_dir.join(format!(
            "rates_{:04}_{:02}_{:02}.json",
            date.year(),
            date.month(),
            date.day(),
        ))
    }

    /// Merge the rates into the day's document.
    ///
    /// Slots before `freeze_before_minute` that are already stored keep their values,
    /// everything from `freeze_before_minute` onwards is replaced by `rates`.
    ///
    /// Returns `false` when the document could not be written.
    #[must_use]
    #[instrument(skip_all, fields(freeze_before_minute = freeze_before_minute))]
    pub fn save_rates(
        &self,
        date: &impl Datelike,
        rates: &Rates,
        freeze_before_minute: Minute,
    ) -> bool {
        let path = self.path_for(date);
        let existing = self.store.load::<RateDocument>(&path).map(Rates::from).unwrap_or_default();
        let merged = merge(&existing, rates, freeze_before_minute);
        debug!(
            path = %path.display(),
            n_import = merged.import.len(),
            n_export = merged.export.len(),
            "merged"
        );
        let document = RateDocument {
            rates_import: merged.import,
            rates_export: merged.export,
            last_updated: Some(Local::now()),
            frozen_before_minute: Some(freeze_before_minute),
        };
        self.store.save(&path, &document, true)
    }

    /// Load the day's rates, `None` if nothing has been stored for the date.
    pub fn load_rates(&self, date: &impl Datelike) -> Option<Rates> {
        self.load_document(date).map(Rates::from)
    }

    /// Load the day's document including the write metadata.
    pub fn load_document(&self, date: &impl Datelike) -> Option<RateDocument> {
        self.store.load(&self.path_for(date))
    }

    /// Remove documents older than `retention_days`, returns the number of removed documents.
    pub fn cleanup_old_files(&self, retention_days: u32) -> usize {
        self.store.cleanup(&self.save_dir, FILE_PATTERN, retention_days)
    }
}
