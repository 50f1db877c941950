//! CSV and JSON tables handed to document and chart assembly

use crate::error::Result;
use crate::funding::{ExpenditureSchedule, ScenarioBundle};
use crate::ledger::Ledger;
use crate::study::StudyRun;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Default directory for study outputs
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Component inventory table row (Table A of a study report)
#[derive(Debug, Serialize)]
struct InventoryRow<'a> {
    #[serde(rename = "Component")]
    name: &'a str,
    #[serde(rename = "Category")]
    category: &'a str,
    #[serde(rename = "Qty")]
    quantity: f64,
    #[serde(rename = "Unit")]
    unit: &'a str,
    #[serde(rename = "UL")]
    useful_life: u32,
    #[serde(rename = "RUL")]
    remaining_life: u32,
    #[serde(rename = "ReplacementCost")]
    replacement_cost: f64,
}

/// Write the component inventory table
pub fn write_component_inventory<W: Write>(writer: W, ledger: &Ledger) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for component in ledger {
        csv_writer.serialize(InventoryRow {
            name: &component.name,
            category: component.category.as_deref().unwrap_or(""),
            quantity: component.quantity,
            unit: &component.unit,
            useful_life: component.useful_life,
            remaining_life: component.remaining_life,
            replacement_cost: component.replacement_cost,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the per-component expenditure table, one column per forecast year.
///
/// The last row holds the annual totals.
pub fn write_expenditure_table<W: Write>(writer: W, schedule: &ExpenditureSchedule) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let years: Vec<i32> = schedule.years().collect();

    let mut header = vec!["Component".to_string()];
    header.extend(years.iter().map(|y| y.to_string()));
    header.push("Total".to_string());
    csv_writer.write_record(&header)?;

    for component in &schedule.components {
        let mut record = vec![component.name.clone()];
        record.extend(years.iter().map(|&y| format!("{:.2}", component.amount(y))));
        record.push(format!("{:.2}", component.total()));
        csv_writer.write_record(&record)?;
    }

    let mut totals = vec!["Total".to_string()];
    totals.extend(years.iter().map(|&y| format!("{:.2}", schedule.total_for_year(y))));
    totals.push(format!("{:.2}", schedule.total()));
    csv_writer.write_record(&totals)?;

    csv_writer.flush()?;
    Ok(())
}

/// Write the year-by-year funding plan (expenditures and tier balances)
pub fn write_funding_plan<W: Write>(writer: W, bundle: &ScenarioBundle) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "Year",
        "Expenditure",
        "BaselineBalance",
        "ThresholdBalance",
        "FullyFundedBalance",
    ])?;

    for row in bundle.funding_plan() {
        csv_writer.write_record(&[
            row.year.to_string(),
            format!("{:.2}", row.expenditure),
            format!("{:.2}", row.baseline_balance),
            format!("{:.2}", row.threshold_balance),
            format!("{:.2}", row.fully_funded_balance),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write the full study run as pretty JSON
pub fn write_study_json<W: Write>(writer: W, run: &StudyRun) -> Result<()> {
    serde_json::to_writer_pretty(writer, run)?;
    Ok(())
}

/// Write every study table into a directory, returning the paths written
pub fn write_study_outputs(dir: &Path, ledger: &Ledger, run: &StudyRun) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let inventory = dir.join("component_inventory.csv");
    write_component_inventory(BufWriter::new(File::create(&inventory)?), ledger)?;

    let expenditures = dir.join("annual_expenditures.csv");
    write_expenditure_table(BufWriter::new(File::create(&expenditures)?), &run.schedule)?;

    let plan = dir.join("funding_plan.csv");
    write_funding_plan(BufWriter::new(File::create(&plan)?), &run.scenarios)?;

    let json = dir.join("funding_scenarios.json");
    let mut json_writer = BufWriter::new(File::create(&json)?);
    write_study_json(&mut json_writer, run)?;
    json_writer.flush()?;

    log::info!("Wrote study outputs to {}", dir.display());

    Ok(vec![inventory, expenditures, plan, json])
}
