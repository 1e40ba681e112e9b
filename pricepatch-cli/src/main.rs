//! Pricepatch CLI — update and status commands for the BTC history object.
//!
//! Commands:
//! - `update` — run one gap-patching pass: read, scan, fetch, merge, write
//! - `status` — report dataset coverage without fetching or writing
//!
//! The object lives in a filesystem store rooted at `--root`; bucket and key
//! come from the defaults, a TOML config file, or per-field flags.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use pricepatch_core::data::{CoinGeckoProvider, FsStore};
use pricepatch_core::gap::SHORT_WINDOW_DAYS;
use pricepatch_core::update::{self, UpdateOutcome};
use pricepatch_core::UpdaterConfig;

#[derive(Parser)]
#[command(
    name = "pricepatch",
    about = "Keeps the daily BTC market history CSV complete"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one update pass: scan for gaps, fetch, merge, write back.
    Update {
        #[command(flatten)]
        target: Target,

        /// Print the outcome as JSON instead of a human summary.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Report dataset coverage without fetching or writing.
    Status {
        #[command(flatten)]
        target: Target,
    },
}

#[derive(Args)]
struct Target {
    /// Root directory the filesystem store maps buckets into.
    #[arg(long, default_value = "data")]
    root: PathBuf,

    /// TOML config file naming the bucket and key.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Bucket holding the dataset object (overrides the config file).
    #[arg(long)]
    bucket: Option<String>,

    /// Object key of the dataset CSV (overrides the config file).
    #[arg(long)]
    key: Option<String>,
}

impl Target {
    fn resolve(&self) -> Result<(FsStore, UpdaterConfig)> {
        let mut config = match &self.config {
            Some(path) => UpdaterConfig::from_file(path)?,
            None => UpdaterConfig::default(),
        };
        if let Some(bucket) = &self.bucket {
            config.bucket = bucket.clone();
        }
        if let Some(key) = &self.key {
            config.key = key.clone();
        }
        Ok((FsStore::new(&self.root), config))
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Update { target, json } => run_update_cmd(&target, json),
        Commands::Status { target } => run_status_cmd(&target),
    }
}

fn run_update_cmd(target: &Target, json: bool) -> Result<()> {
    let (store, config) = target.resolve()?;
    let provider = CoinGeckoProvider::new();

    let outcome = update::run_update(&store, &provider, &config, Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    match outcome {
        UpdateOutcome::NoUpdateNeeded { latest, rows } => {
            println!("No update needed: last {SHORT_WINDOW_DAYS} days are complete.");
            match latest {
                Some(d) => println!("Latest date: {d} ({rows} rows)"),
                None => println!("Dataset is empty."),
            }
        }
        UpdateOutcome::NoNewData {
            still_missing,
            rows,
        } => {
            println!("Provider had no data for the missing dates; nothing written.");
            println!("Still missing ({rows} rows stored):");
            for d in &still_missing {
                println!("  {d}");
            }
        }
        UpdateOutcome::Updated {
            added,
            window_days,
            rows,
        } => {
            println!(
                "Updated: {} date(s) added via a {window_days}-day window ({rows} rows).",
                added.len()
            );
            for d in &added {
                println!("  {d}");
            }
        }
    }

    Ok(())
}

fn run_status_cmd(target: &Target) -> Result<()> {
    let (store, config) = target.resolve()?;

    let status = update::inspect(&store, &config, Utc::now())?;

    println!("Object:      {}/{}", config.bucket, config.key);
    println!("Rows:        {}", status.rows);
    match status.latest {
        Some(d) => println!("Latest date: {d}"),
        None => println!("Latest date: (empty)"),
    }
    if status.skipped_rows > 0 {
        println!("Skipped:     {} malformed row(s)", status.skipped_rows);
    }
    if status.missing_recent.is_empty() {
        println!("Last {SHORT_WINDOW_DAYS} days: complete");
    } else {
        println!("Missing in the last {SHORT_WINDOW_DAYS} days:");
        for d in &status.missing_recent {
            println!("  {d}");
        }
    }

    Ok(())
}
