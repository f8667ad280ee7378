use std::{path::PathBuf, str::FromStr};

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rate_ledger::{KilowattHourRate, Minute, RateStoreConfig, RateTable, Rates, prelude::*};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    #[clap(flatten)]
    pub store: StoreArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge the rates into the day's document, keeping the stored past slots.
    #[clap(name = "save")]
    Save(SaveArgs),

    /// Print the day's stored rates.
    #[clap(name = "show")]
    Show(DateArgs),

    /// Remove documents past the retention period.
    #[clap(name = "cleanup")]
    Cleanup(CleanupArgs),
}

#[derive(Parser)]
pub struct StoreArgs {
    /// Directory with the daily rate documents.
    #[clap(long = "save-dir", env = "RATE_STORE_DIR", default_value = "rates")]
    pub save_dir: PathBuf,

    /// Documents last written longer ago are removed on every run.
    #[clap(long = "rate-retention-days", env = "RATE_RETENTION_DAYS", default_value = "7")]
    pub retention_days: u32,
}

impl StoreArgs {
    pub fn config(&self) -> RateStoreConfig {
        RateStoreConfig::builder()
            .save_dir(self.save_dir.clone())
            .retention_days(self.retention_days)
            .build()
    }
}

#[derive(Parser)]
pub struct DateArgs {
    /// Day of the rates, for example `2026-10-15`. Defaults to today.
    #[clap(long)]
    pub date: Option<NaiveDate>,
}

impl DateArgs {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Parser)]
pub struct SaveArgs {
    #[clap(flatten)]
    pub date: DateArgs,

    /// Already stored slots before this minute keep their values.
    #[clap(long, env = "FREEZE_BEFORE_MINUTE")]
    pub freeze_before_minute: Minute,

    /// Import rates as `minute=rate` pairs.
    #[clap(long = "import", value_delimiter = ',')]
    pub import: Vec<RateSlot>,

    /// Export rates as `minute=rate` pairs.
    #[clap(long = "export", value_delimiter = ',')]
    pub export: Vec<RateSlot>,
}

impl SaveArgs {
    pub fn rates(&self) -> Rates {
        Rates::new(collect_table(&self.import), collect_table(&self.export))
    }
}

fn collect_table(slots: &[RateSlot]) -> RateTable {
    slots.iter().map(|slot| (slot.minute, slot.rate)).collect()
}

#[derive(Parser)]
pub struct CleanupArgs {
    /// Overrides `--rate-retention-days` for this run.
    #[clap(long = "retention-days")]
    pub retention_days: Option<u32>,
}

/// Single `minute=rate` pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RateSlot {
    pub minute: Minute,
    pub rate: KilowattHourRate,
}

impl FromStr for RateSlot {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        let (minute, rate) = text.split_once('=').context("expected `minute=rate`")?;
        let minute = minute.trim().parse().with_context(|| format!("invalid minute `{minute}`"))?;
        let rate = rate.trim().parse().with_context(|| format!("invalid rate `{rate}`"))?;
        Ok(Self { minute, rate })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rate_slot() -> Result {
        assert_eq!(
            "30=15.5".parse::<RateSlot>()?,
            RateSlot { minute: 30, rate: KilowattHourRate::from(15.5) },
        );
        assert_eq!(" 0 = 7 ".parse::<RateSlot>()?.minute, 0);
        Ok(())
    }

    #[test]
    fn test_parse_rate_slot_errors() {
        assert!("30".parse::<RateSlot>().is_err());
        assert!("-30=1.0".parse::<RateSlot>().is_err());
        assert!("30=cheap".parse::<RateSlot>().is_err());
    }

    #[test]
    fn test_parse_save_args() -> Result {
        let args = Args::try_parse_from([
            "rate-ledger",
            "--save-dir",
            "/tmp/rates",
            "save",
            "--date",
            "2026-10-15",
            "--freeze-before-minute",
            "60",
            "--import",
            "0=10,30=15",
            "--export",
            "0=5",
        ])?;
        assert_eq!(args.store.save_dir, PathBuf::from("/tmp/rates"));
        let Command::Save(save_args) = args.command else {
            bail!("expected the save command");
        };
        assert_eq!(save_args.date.date(), NaiveDate::from_ymd_opt(2026, 10, 15).context("date")?);
        assert_eq!(save_args.freeze_before_minute, 60);
        let rates = save_args.rates();
        assert_eq!(rates.import.len(), 2);
        assert_eq!(rates.export[&0], KilowattHourRate::from(5.0));
        Ok(())
    }
}
