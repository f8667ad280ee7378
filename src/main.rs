#![allow(clippy::doc_markdown)]

mod cli;
mod tables;

use clap::Parser;
use rate_ledger::{JsonFileStore, RateStore, prelude::*};

use crate::{
    cli::{Args, Command},
    tables::build_rates_table,
};

fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();

    let args = Args::parse();
    let store = RateStore::new(JsonFileStore, &args.store.config());

    match args.command {
        Command::Save(save_args) => {
            let date = save_args.date.date();
            let rates = save_args.rates();
            if rates.is_empty() {
                warn!("no rates given, only the frozen slots will be kept");
            }
            ensure!(
                store.save_rates(&date, &rates, save_args.freeze_before_minute),
                "failed to save the rates for {date}"
            );
            info!(
                %date,
                n_import = rates.import.len(),
                n_export = rates.export.len(),
                freeze_before_minute = save_args.freeze_before_minute,
                "saved"
            );
        }
        Command::Show(date_args) => {
            let date = date_args.date();
            let Some(document) = store.load_document(&date) else {
                warn!(%date, "no rates stored");
                return Ok(());
            };
            info!(
                %date,
                last_updated = ?document.last_updated,
                frozen_before_minute = ?document.frozen_before_minute,
                "loaded"
            );
            println!("{}", build_rates_table(&document));
        }
        Command::Cleanup(cleanup_args) => {
            let retention_days = cleanup_args.retention_days.unwrap_or(args.store.retention_days);
            let n_removed = store.cleanup_old_files(retention_days);
            info!(retention_days, n_removed, "cleaned up");
        }
    }

    Ok(())
}
