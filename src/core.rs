pub mod merge;
pub mod rates;
