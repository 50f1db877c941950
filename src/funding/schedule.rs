//! Expenditure forecast: which components are replaced in which year

use crate::error::{Result, StudyError};
use crate::ledger::{Component, Ledger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Longest forecast horizon accepted, in years
pub const MAX_HORIZON_YEARS: u32 = 1_000;

/// Check that every year of the horizon is a representable calendar year
pub fn validate_horizon(start_year: i32, horizon_years: u32) -> Result<()> {
    if horizon_years > MAX_HORIZON_YEARS {
        return Err(StudyError::InvalidHorizon(horizon_years as i64));
    }
    if start_year.checked_add(horizon_years as i32).is_none() {
        return Err(StudyError::InvalidStartYear {
            start_year: start_year as i64,
            horizon_years,
        });
    }
    Ok(())
}

/// Calendar year at an offset from the start year, None past `i32::MAX`
pub(crate) fn year_at(start_year: i32, offset: u64) -> Option<i32> {
    i32::try_from(offset).ok().and_then(|offset| start_year.checked_add(offset))
}

/// Scheduled replacements for one component, keyed by calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentExpenditures {
    pub name: String,
    pub by_year: BTreeMap<i32, f64>,
}

impl ComponentExpenditures {
    /// Expenditure in a given year (0 when nothing is scheduled)
    pub fn amount(&self, year: i32) -> f64 {
        self.by_year.get(&year).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.by_year.values().sum()
    }
}

/// Replacement schedule for every component over the study horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenditureSchedule {
    /// First calendar year of the horizon
    pub start_year: i32,

    /// Number of forecast years
    pub horizon_years: u32,

    /// One entry per component, in ledger order
    pub components: Vec<ComponentExpenditures>,
}

impl ExpenditureSchedule {
    /// Forecast replacements for every component in the ledger
    pub fn forecast(ledger: &Ledger, horizon_years: u32, start_year: i32) -> Result<Self> {
        validate_horizon(start_year, horizon_years)?;

        let components = ledger
            .components()
            .iter()
            .map(|component| ComponentExpenditures {
                name: component.name.clone(),
                by_year: schedule_component(component, horizon_years, start_year),
            })
            .collect();

        Ok(Self { start_year, horizon_years, components })
    }

    /// Calendar years covered by the forecast
    pub fn years(&self) -> impl Iterator<Item = i32> {
        let start = self.start_year;
        (0..self.horizon_years as u64).map_while(move |offset| year_at(start, offset))
    }

    /// Total expenditure in a year across all components
    pub fn total_for_year(&self, year: i32) -> f64 {
        self.components.iter().map(|c| c.amount(year)).sum()
    }

    /// Total expenditure per year, including years with nothing scheduled
    pub fn annual_totals(&self) -> BTreeMap<i32, f64> {
        self.years().map(|year| (year, self.total_for_year(year))).collect()
    }

    /// Total expenditure per year as a dense series indexed by year offset
    pub fn annual_series(&self) -> Vec<f64> {
        self.years().map(|year| self.total_for_year(year)).collect()
    }

    /// Look up a component's schedule by name
    pub fn component(&self, name: &str) -> Option<&ComponentExpenditures> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Sum of all scheduled expenditures over the horizon
    pub fn total(&self) -> f64 {
        self.components.iter().map(|c| c.total()).sum()
    }
}

/// Schedule one component's replacements.
///
/// The first replacement falls `remaining_life` years after the start year.
/// Further replacements recur every `useful_life` years while the next one
/// still lands inside the horizon. A zero useful life is scheduled at most once.
fn schedule_component(component: &Component, horizon_years: u32, start_year: i32) -> BTreeMap<i32, f64> {
    let mut by_year = BTreeMap::new();
    let horizon = horizon_years as u64;
    let useful_life = component.useful_life as u64;
    let mut offset = component.remaining_life as u64;

    if offset < horizon {
        if let Some(year) = year_at(start_year, offset) {
            by_year.insert(year, component.replacement_cost);
        }
    }

    if useful_life == 0 {
        log::debug!("Component '{}' has no useful life, scheduled once at most", component.name);
        return by_year;
    }

    while offset + useful_life < horizon {
        offset += useful_life;
        if let Some(year) = year_at(start_year, offset) {
            by_year.insert(year, component.replacement_cost);
        }
    }

    log::debug!(
        "Component '{}': {} replacement(s) within {} years",
        component.name,
        by_year.len(),
        horizon_years
    );

    by_year
}
