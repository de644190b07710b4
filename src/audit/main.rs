//! Coverage audit of trustee records against township boundaries.
//!
//! Lists townships with no trustee office on file, writes placeholder
//! records for them, and lists records that still need an address or
//! coordinates.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use township_locator::pip::{load_boundaries, TownshipIndex};
use township_locator::records::{CoverageReport, RecordStore};
use township_locator::Config;

#[derive(Parser, Debug)]
#[command(name = "audit")]
#[command(about = "Report townships without trustee records")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory for the report files
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();
    let config = Config::load_from_file(&args.config)?;

    let boundaries = load_boundaries(&config.data.boundaries, &config.resolver.boundary_fields)
        .context("Failed to load township boundaries")?;
    let index = TownshipIndex::build(boundaries);
    let store = RecordStore::load(&config.data.trustees).context("Failed to load trustee records")?;

    let report = CoverageReport::build(&index, &store);
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    write_json(&args.out_dir.join("missing_offices.json"), &report.placeholders())?;
    write_json(&args.out_dir.join("incomplete_records.json"), &report.incomplete)?;

    let listing = missing_listing(&report);
    let listing_path = args.out_dir.join("missing_offices.txt");
    fs::write(&listing_path, &listing)
        .with_context(|| format!("Failed to write {}", listing_path.display()))?;

    info!(
        "{} townships, {} trustee records",
        index.len(),
        store.len()
    );
    if report.missing.is_empty() {
        info!("Every township has a trustee record");
    } else {
        warn!(
            "{} townships in {} counties have no trustee record",
            report.missing.len(),
            report.by_county().len()
        );
        for line in listing.lines() {
            info!("{}", line);
        }
    }
    info!("{} records need an address or coordinates", report.incomplete.len());
    info!("Reports written to {}", args.out_dir.display());

    Ok(())
}

/// "Monroe County: Perry, Clear Creek" per line
fn missing_listing(report: &CoverageReport) -> String {
    let mut out = String::new();
    for (county, townships) in report.by_county() {
        out.push_str(&format!("{} County: {}\n", county, townships.join(", ")));
    }
    out
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
