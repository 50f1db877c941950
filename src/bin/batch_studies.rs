//! Run every study bundle in a directory and write one summary row per property
//!
//! Usage: cargo run --bin batch_studies -- --dir studies/ --output batch_summary.csv

use anyhow::{Context, Result};
use clap::Parser;
use reserve_study::{ledger::LoadedStudy, StudyConfig, StudyRunner};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(name = "batch_studies", about = "Run reserve studies for a directory of study bundles")]
struct Args {
    /// Directory containing study bundle JSON files
    #[arg(long)]
    dir: PathBuf,

    /// Summary CSV to write
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,

    /// Override every study's horizon
    #[arg(long)]
    horizon: Option<u32>,

    /// Override every study's start year
    #[arg(long)]
    start_year: Option<i32>,
}

/// One summary row per study
#[derive(Debug, Serialize)]
struct SummaryRow {
    file: String,
    property: String,
    components: usize,
    start_year: i32,
    horizon_years: u32,
    starting_balance: f64,
    fully_funded_balance: f64,
    percent_funded: f64,
    total_replacement_cost: f64,
    total_expenditures: f64,
    baseline_contribution: f64,
    threshold_contribution: f64,
    fully_funded_contribution: f64,
    minimum_baseline_balance: f64,
    minimum_baseline_year: i32,
}

/// Load a bundle and apply the command-line period overrides
fn load_config(path: &Path, args: &Args) -> reserve_study::error::Result<StudyConfig> {
    let config = StudyConfig::from_loaded(LoadedStudy::load_from(path)?)?;
    let horizon = args.horizon.unwrap_or(config.horizon_years);
    let start_year = args.start_year.unwrap_or(config.start_year);
    config.with_period(horizon, start_year)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let start = Instant::now();

    let mut paths: Vec<PathBuf> = fs::read_dir(&args.dir)
        .with_context(|| format!("Failed to read {}", args.dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    let mut files = Vec::new();
    let mut configs = Vec::new();
    for path in &paths {
        match load_config(path, &args) {
            Ok(config) => {
                files.push(path.display().to_string());
                configs.push(config);
            }
            Err(err) => log::warn!("Skipping {}: {}", path.display(), err),
        }
    }

    println!("Loaded {} of {} studies in {:?}", configs.len(), paths.len(), start.elapsed());

    let runner = StudyRunner::new();
    let runs = runner.run_batch(&configs);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    for ((file, config), run) in files.into_iter().zip(&configs).zip(runs) {
        let run = match run {
            Ok(run) => run,
            Err(err) => {
                log::warn!("Skipping {}: {}", file, err);
                continue;
            }
        };
        let summary = run.scenarios.summary();
        writer.serialize(SummaryRow {
            file,
            property: config.property.display_name().to_string(),
            components: config.ledger.len(),
            start_year: summary.start_year,
            horizon_years: summary.horizon_years,
            starting_balance: config.financial.starting_reserve_balance,
            fully_funded_balance: summary.fully_funded_balance,
            percent_funded: summary.percent_funded,
            total_replacement_cost: summary.total_replacement_cost,
            total_expenditures: summary.total_expenditures,
            baseline_contribution: summary.baseline_contribution,
            threshold_contribution: summary.threshold_contribution,
            fully_funded_contribution: summary.fully_funded_contribution,
            minimum_baseline_balance: summary.minimum_baseline_balance,
            minimum_baseline_year: summary.minimum_baseline_year,
        })?;
    }
    writer.flush()?;

    println!("Summary written to {}", args.output.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
