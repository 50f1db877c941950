//! Reserve Study CLI
//!
//! Loads a property's component inventory and reserve position, runs the
//! funding scenarios and writes the report tables.

use anyhow::{Context, Result};
use clap::Parser;
use reserve_study::{
    funding::{SearchParams, TierMultipliers, DEFAULT_SEARCH_CEILING, DEFAULT_SEARCH_STEP},
    ledger::{self, LoadedStudy},
    report::{self, DEFAULT_OUTPUT_DIR},
    ScenarioKind, StudyConfig, StudyRunner,
};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "reserve_study", version, about = "Reserve fund funding scenarios for a managed property")]
struct Args {
    /// Study bundle JSON (property, components, financial, horizon, start year)
    #[arg(long, conflicts_with_all = ["components", "financial", "property"])]
    study: Option<PathBuf>,

    /// Component inventory (.json array or .csv table)
    #[arg(long, requires = "financial")]
    components: Option<PathBuf>,

    /// Financial data JSON (starting_reserve_balance, annual_contribution)
    #[arg(long, requires = "components")]
    financial: Option<PathBuf>,

    /// Property profile JSON
    #[arg(long)]
    property: Option<PathBuf>,

    /// Forecast horizon in years
    #[arg(long)]
    horizon: Option<u32>,

    /// First forecast year (defaults to the current year)
    #[arg(long)]
    start_year: Option<i32>,

    /// Directory for the generated tables
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Exclusive upper bound for candidate contributions
    #[arg(long, default_value_t = DEFAULT_SEARCH_CEILING)]
    search_ceiling: f64,

    /// Increment between candidate contributions
    #[arg(long, default_value_t = DEFAULT_SEARCH_STEP)]
    search_step: f64,
}

fn load_study(args: &Args) -> Result<LoadedStudy> {
    if let Some(path) = &args.study {
        return LoadedStudy::load_from(path)
            .with_context(|| format!("Failed to load study bundle {}", path.display()));
    }

    match (&args.components, &args.financial) {
        (Some(components), Some(financial)) => Ok(LoadedStudy {
            property: match &args.property {
                Some(path) => ledger::load_property(path)
                    .with_context(|| format!("Failed to load property {}", path.display()))?,
                None => Default::default(),
            },
            ledger: load_inventory(components)?,
            financial: ledger::load_financial(financial)
                .with_context(|| format!("Failed to load financial data {}", financial.display()))?,
            horizon_years: None,
            start_year: None,
        }),
        _ => {
            println!("No inputs given, using sample study in {}", ledger::loader::DEFAULT_SAMPLE_PATH);
            LoadedStudy::load_sample().context("Failed to load sample study")
        }
    }
}

fn load_inventory(path: &Path) -> Result<reserve_study::Ledger> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    let loaded = if is_csv {
        ledger::load_components_csv(path)
    } else {
        ledger::load_components(path)
    };

    loaded.with_context(|| format!("Failed to load components {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Reserve Study v{}", env!("CARGO_PKG_VERSION"));
    println!("==================\n");

    let config = StudyConfig::from_loaded(load_study(&args)?)?;
    let horizon = args.horizon.unwrap_or(config.horizon_years);
    let start_year = args.start_year.unwrap_or(config.start_year);
    let config = config
        .with_period(horizon, start_year)
        .context("Invalid study period")?;

    let search = SearchParams {
        ceiling: args.search_ceiling,
        step: args.search_step,
    };
    let runner = StudyRunner::with_params(search, TierMultipliers::default())?;

    println!("Property: {}", config.property.display_name());
    if let Some(reference) = &config.property.reference_id {
        println!("  Reference: {}", reference);
    }
    if let Some(date) = config.property.inspection_date {
        println!("  Inspection Date: {}", date.format("%m/%d/%Y"));
    }
    println!("  Components: {}", config.ledger.len());
    println!("  Starting Reserve Balance: ${:.2}", config.financial.starting_reserve_balance);
    println!("  Budgeted Contribution: ${:.2}", config.financial.annual_contribution);
    println!("  Horizon: {} years from {}", config.horizon_years, config.start_year);
    println!();

    let run = runner.run(&config)?;
    let summary = run.scenarios.summary();

    println!("Funding Position:");
    println!("  Fully Funded Balance: ${:.2}", summary.fully_funded_balance);
    println!("  Percent Funded: {:.1}%", summary.percent_funded);
    println!("  Total Replacement Cost: ${:.2}", summary.total_replacement_cost);
    println!("  Total Expenditures: ${:.2}", summary.total_expenditures);
    if let Some(year) = summary.peak_expenditure_year {
        println!("  Peak Expenditure: ${:.2} in {}", summary.peak_expenditure, year);
    }
    println!();

    println!("{:<20} {:>16} {:>16}", "Scenario", "Contribution", "Ending Balance");
    println!("{}", "-".repeat(54));
    for kind in ScenarioKind::ALL {
        let scenario = run.scenarios.scenario(kind);
        println!(
            "{:<20} {:>16.2} {:>16.2}",
            kind.label(),
            scenario.annual_contribution,
            scenario.ending_balance()
        );
    }
    println!(
        "\nLowest baseline balance: ${:.2} in {}",
        summary.minimum_baseline_balance, summary.minimum_baseline_year
    );

    let written = report::write_study_outputs(&args.output_dir, &config.ledger, &run)
        .with_context(|| format!("Failed to write outputs to {}", args.output_dir.display()))?;

    println!("\nOutputs written:");
    for path in written {
        println!("  {}", path.display());
    }

    Ok(())
}
