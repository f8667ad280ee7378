#![allow(clippy::doc_markdown)]

pub mod core;
pub mod prelude;
pub mod quantity;
pub mod rate_store;
pub mod store;

pub use crate::{
    core::{
        merge::merge,
        rates::{Minute, RateTable, Rates},
    },
    quantity::rate::KilowattHourRate,
    rate_store::{RateDocument, RateStore, RateStoreConfig},
    store::{DocumentStore, json_file::JsonFileStore},
};
