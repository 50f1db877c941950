//! Load component inventories, financial data and property profiles
//!
//! Absent numeric fields default to 0 and an absent name to the empty string.
//! Values that are present but unusable (negative or fractional lives, negative
//! costs) are rejected.

use super::{Component, FinancialState, Ledger, PropertyProfile};
use crate::error::{Result, StudyError};
use crate::funding::{validate_horizon, MAX_HORIZON_YEARS};
use crate::study::DEFAULT_HORIZON_YEARS;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Default location of the bundled sample study
pub const DEFAULT_SAMPLE_PATH: &str = "data/sample";

/// Raw component record as found in JSON or CSV inventories
#[derive(Debug, Default, Deserialize)]
struct ComponentRecord {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    useful_life: Option<f64>,
    #[serde(default)]
    remaining_life: Option<f64>,
    #[serde(default)]
    replacement_cost: Option<f64>,
    #[serde(default)]
    quantity: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ComponentRecord {
    fn to_component(self) -> Result<Component> {
        let name = self.name.unwrap_or_default();
        let useful_life = whole_years(self.useful_life.unwrap_or(0.0), "useful_life", &name)?;
        let remaining_life = whole_years(self.remaining_life.unwrap_or(0.0), "remaining_life", &name)?;

        Ok(Component {
            useful_life,
            remaining_life,
            replacement_cost: self.replacement_cost.unwrap_or(0.0),
            quantity: self.quantity.unwrap_or(0.0),
            unit: self.unit.unwrap_or_default(),
            category: self.category.filter(|c| !c.is_empty()),
            description: self.description.filter(|d| !d.is_empty()),
            name,
        })
    }
}

/// Raw reserve fund position, where absent and null amounts both mean 0
#[derive(Debug, Default, Deserialize)]
struct FinancialRecord {
    #[serde(default)]
    starting_reserve_balance: Option<f64>,
    #[serde(default)]
    annual_contribution: Option<f64>,
}

impl FinancialRecord {
    fn to_financial(self) -> FinancialState {
        FinancialState::new(
            self.starting_reserve_balance.unwrap_or(0.0),
            self.annual_contribution.unwrap_or(0.0),
        )
    }
}

/// Convert a raw life value to whole years
fn whole_years(value: f64, field: &str, name: &str) -> Result<u32> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(StudyError::InvalidComponent {
            name: name.to_string(),
            reason: format!("{} must be a non-negative whole number of years, got {}", field, value),
        });
    }
    Ok(value as u32)
}

fn build_ledger(records: Vec<ComponentRecord>) -> Result<Ledger> {
    let components = records
        .into_iter()
        .map(ComponentRecord::to_component)
        .collect::<Result<Vec<_>>>()?;
    Ledger::new(components)
}

/// Load a component ledger from a JSON array
pub fn load_components<P: AsRef<Path>>(path: P) -> Result<Ledger> {
    load_components_from_reader(BufReader::new(File::open(path)?))
}

/// Load a component ledger from any reader producing a JSON array
pub fn load_components_from_reader<R: Read>(reader: R) -> Result<Ledger> {
    let records: Vec<ComponentRecord> = serde_json::from_reader(reader)?;
    build_ledger(records)
}

/// Load a component ledger from a CSV inventory
///
/// Expected headers: name, useful_life, remaining_life, replacement_cost,
/// and optionally quantity, unit, category, description.
pub fn load_components_csv<P: AsRef<Path>>(path: P) -> Result<Ledger> {
    load_components_csv_from_reader(File::open(path)?)
}

/// Load a CSV component inventory from any reader
pub fn load_components_csv_from_reader<R: Read>(reader: R) -> Result<Ledger> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        let record: ComponentRecord = result?;
        records.push(record);
    }

    build_ledger(records)
}

/// Load the reserve fund position from JSON
pub fn load_financial<P: AsRef<Path>>(path: P) -> Result<FinancialState> {
    load_financial_from_reader(BufReader::new(File::open(path)?))
}

pub fn load_financial_from_reader<R: Read>(reader: R) -> Result<FinancialState> {
    let record: FinancialRecord = serde_json::from_reader(reader)?;
    Ok(record.to_financial())
}

/// Load the property profile from JSON
pub fn load_property<P: AsRef<Path>>(path: P) -> Result<PropertyProfile> {
    Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
}

/// Single-file study bundle
#[derive(Debug, Default, Deserialize)]
struct StudyFile {
    #[serde(default)]
    property: PropertyProfile,
    #[serde(default)]
    components: Vec<ComponentRecord>,
    #[serde(default)]
    financial: Option<FinancialRecord>,
    #[serde(default)]
    horizon_years: Option<i64>,
    #[serde(default)]
    start_year: Option<i32>,
}

/// Validated contents of a study bundle file
#[derive(Debug, Clone)]
pub struct LoadedStudy {
    pub property: PropertyProfile,
    pub ledger: Ledger,
    pub financial: FinancialState,
    pub horizon_years: Option<u32>,
    pub start_year: Option<i32>,
}

impl LoadedStudy {
    /// Load a study bundle from a JSON file
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    /// Load a study bundle from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let file: StudyFile = serde_json::from_reader(reader)?;

        let horizon_years = match file.horizon_years {
            Some(h) if h < 0 || h > MAX_HORIZON_YEARS as i64 => return Err(StudyError::InvalidHorizon(h)),
            Some(h) => Some(h as u32),
            None => None,
        };

        // Without a start year the run begins in the current year
        if let Some(start_year) = file.start_year {
            validate_horizon(start_year, horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS))?;
        }

        Ok(Self {
            property: file.property,
            ledger: build_ledger(file.components)?,
            financial: file.financial.map(FinancialRecord::to_financial).unwrap_or_default(),
            horizon_years,
            start_year: file.start_year,
        })
    }

    /// Load the three separate sample files shipped under data/sample
    pub fn load_sample() -> Result<Self> {
        let dir = Path::new(DEFAULT_SAMPLE_PATH);
        Ok(Self {
            property: load_property(dir.join("property.json"))?,
            ledger: load_components(dir.join("components.json"))?,
            financial: load_financial(dir.join("financial.json"))?,
            horizon_years: None,
            start_year: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_fields_default_to_zero() {
        let json = r#"[{"useful_life": 20}, {"name": "Paint", "remaining_life": 3}]"#;
        let ledger = load_components_from_reader(json.as_bytes()).unwrap();

        let first = &ledger.components()[0];
        assert_eq!(first.name, "");
        assert_eq!(first.useful_life, 20);
        assert_eq!(first.remaining_life, 0);
        assert_relative_eq!(first.replacement_cost, 0.0);

        let paint = ledger.get("Paint").unwrap();
        assert_eq!(paint.useful_life, 0);
        assert_eq!(paint.remaining_life, 3);
    }

    #[test]
    fn test_full_record() {
        let json = r#"[{
            "name": "Roof Membrane",
            "useful_life": 20,
            "remaining_life": 5,
            "replacement_cost": 100000.0,
            "quantity": 12500,
            "unit": "SF",
            "description": "Modified bitumen, minor blistering"
        }]"#;
        let ledger = load_components_from_reader(json.as_bytes()).unwrap();
        let roof = ledger.get("Roof Membrane").unwrap();

        assert_eq!(roof.useful_life, 20);
        assert_eq!(roof.remaining_life, 5);
        assert_relative_eq!(roof.replacement_cost, 100_000.0);
        assert_relative_eq!(roof.quantity, 12_500.0);
        assert_eq!(roof.unit, "SF");
        assert!(roof.description.as_deref().unwrap().contains("blistering"));
    }

    #[test]
    fn test_negative_life_rejected() {
        let json = r#"[{"name": "Roof", "useful_life": -5, "remaining_life": 2}]"#;
        let result = load_components_from_reader(json.as_bytes());
        assert!(matches!(result, Err(StudyError::InvalidComponent { .. })));
    }

    #[test]
    fn test_fractional_life_rejected() {
        let json = r#"[{"name": "Roof", "useful_life": 20.5}]"#;
        let result = load_components_from_reader(json.as_bytes());
        assert!(matches!(result, Err(StudyError::InvalidComponent { .. })));
    }

    #[test]
    fn test_duplicate_names_rejected_on_load() {
        let json = r#"[{"name": "Roof"}, {"name": "Roof"}]"#;
        let result = load_components_from_reader(json.as_bytes());
        assert!(matches!(result, Err(StudyError::DuplicateComponent(_))));
    }

    #[test]
    fn test_csv_inventory() {
        let csv = "name,useful_life,remaining_life,replacement_cost,quantity,unit\n\
                   Roof,20,5,100000,12500,SF\n\
                   Paint,8,,40000,,\n";
        let ledger = load_components_csv_from_reader(csv.as_bytes()).unwrap();

        assert_eq!(ledger.len(), 2);
        let paint = ledger.get("Paint").unwrap();
        assert_eq!(paint.remaining_life, 0);
        assert_relative_eq!(paint.quantity, 0.0);
        assert_eq!(paint.unit, "");
    }

    #[test]
    fn test_financial_defaults() {
        let financial = load_financial_from_reader(r#"{}"#.as_bytes()).unwrap();
        assert_relative_eq!(financial.starting_reserve_balance, 0.0);
        assert_relative_eq!(financial.annual_contribution, 0.0);

        let financial = load_financial_from_reader(
            r#"{"starting_reserve_balance": 50000, "annual_contribution": 12000}"#.as_bytes(),
        )
        .unwrap();
        assert_relative_eq!(financial.starting_reserve_balance, 50_000.0);
    }

    #[test]
    fn test_null_financial_amounts_default_to_zero() {
        let financial = load_financial_from_reader(
            r#"{"starting_reserve_balance": null, "annual_contribution": 12000}"#.as_bytes(),
        )
        .unwrap();
        assert_relative_eq!(financial.starting_reserve_balance, 0.0);
        assert_relative_eq!(financial.annual_contribution, 12_000.0);

        let json = r#"{
            "components": [{"name": "Roof", "useful_life": 20, "remaining_life": 5, "replacement_cost": 100000}],
            "financial": {"starting_reserve_balance": 50000, "annual_contribution": null}
        }"#;
        let study = LoadedStudy::from_reader(json.as_bytes()).unwrap();
        assert_relative_eq!(study.financial.starting_reserve_balance, 50_000.0);
        assert_relative_eq!(study.financial.annual_contribution, 0.0);

        let study = LoadedStudy::from_reader(r#"{"financial": null}"#.as_bytes()).unwrap();
        assert_eq!(study.financial, FinancialState::default());
    }

    #[test]
    fn test_study_bundle() {
        let json = r#"{
            "property": {"name": "Harbor Point", "inspection_date": "2026-03-14"},
            "components": [{"name": "Roof", "useful_life": 20, "remaining_life": 5, "replacement_cost": 100000}],
            "financial": {"starting_reserve_balance": 50000},
            "horizon_years": 10,
            "start_year": 2026
        }"#;
        let study = LoadedStudy::from_reader(json.as_bytes()).unwrap();

        assert_eq!(study.property.name, "Harbor Point");
        assert_eq!(
            study.property.inspection_date,
            chrono::NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert_eq!(study.ledger.len(), 1);
        assert_eq!(study.horizon_years, Some(10));
        assert_eq!(study.start_year, Some(2026));
    }

    #[test]
    fn test_negative_horizon_rejected() {
        let json = r#"{"horizon_years": -1}"#;
        let result = LoadedStudy::from_reader(json.as_bytes());
        assert!(matches!(result, Err(StudyError::InvalidHorizon(-1))));
    }

    #[test]
    fn test_oversized_horizon_rejected() {
        let json = r#"{"horizon_years": 4294967295}"#;
        let result = LoadedStudy::from_reader(json.as_bytes());
        assert!(matches!(result, Err(StudyError::InvalidHorizon(4_294_967_295))));
    }

    #[test]
    fn test_start_year_near_limit_rejected() {
        let json = r#"{"start_year": 2147483640, "horizon_years": 30}"#;
        let result = LoadedStudy::from_reader(json.as_bytes());
        assert!(matches!(
            result,
            Err(StudyError::InvalidStartYear { start_year: 2_147_483_640, horizon_years: 30 })
        ));

        // The default horizon applies when the bundle names none
        let result = LoadedStudy::from_reader(r#"{"start_year": 2147483640}"#.as_bytes());
        assert!(matches!(result, Err(StudyError::InvalidStartYear { .. })));

        let study = LoadedStudy::from_reader(r#"{"start_year": 2147483640, "horizon_years": 5}"#.as_bytes()).unwrap();
        assert_eq!(study.horizon_years, Some(5));
    }

    #[test]
    fn test_load_sample() {
        let study = LoadedStudy::load_sample().expect("Failed to load sample study");
        assert!(!study.ledger.is_empty());
        assert!(study.financial.starting_reserve_balance > 0.0);
        assert!(!study.property.name.is_empty());
    }
}
