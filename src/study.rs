//! Study configuration and runner
//!
//! A `StudyConfig` gathers everything a run needs in one immutable value.
//! The `StudyRunner` holds the search grid and tier multipliers shared by
//! every property it evaluates, so batches of studies run with one policy.

use crate::error::Result;
use crate::funding::{validate_horizon, ExpenditureSchedule, ScenarioBundle, SearchParams, TierMultipliers};
use crate::ledger::{FinancialState, Ledger, LoadedStudy, PropertyProfile};
use chrono::Datelike;
use rayon::prelude::*;
use serde::Serialize;

/// Default forecast horizon in years
pub const DEFAULT_HORIZON_YEARS: u32 = 30;

/// Current calendar year from the local clock
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Inputs for a single reserve study
#[derive(Debug, Clone)]
pub struct StudyConfig {
    pub property: PropertyProfile,
    pub ledger: Ledger,
    pub financial: FinancialState,
    pub horizon_years: u32,
    pub start_year: i32,
}

impl StudyConfig {
    /// Study over the default horizon starting this calendar year
    pub fn new(ledger: Ledger, financial: FinancialState) -> Self {
        Self {
            property: PropertyProfile::default(),
            ledger,
            financial,
            horizon_years: DEFAULT_HORIZON_YEARS,
            start_year: current_year(),
        }
    }

    /// Build from a loaded study bundle, filling unset horizon and start year
    pub fn from_loaded(loaded: LoadedStudy) -> Result<Self> {
        let horizon_years = loaded.horizon_years.unwrap_or(DEFAULT_HORIZON_YEARS);
        let start_year = loaded.start_year.unwrap_or_else(current_year);
        validate_horizon(start_year, horizon_years)?;

        Ok(Self {
            property: loaded.property,
            ledger: loaded.ledger,
            financial: loaded.financial,
            horizon_years,
            start_year,
        })
    }

    pub fn with_property(mut self, property: PropertyProfile) -> Self {
        self.property = property;
        self
    }

    /// Replace horizon and start year together, rejecting a horizon that
    /// runs past the last representable year
    pub fn with_period(mut self, horizon_years: u32, start_year: i32) -> Result<Self> {
        validate_horizon(start_year, horizon_years)?;
        self.horizon_years = horizon_years;
        self.start_year = start_year;
        Ok(self)
    }

    pub fn with_horizon(self, horizon_years: u32) -> Result<Self> {
        let start_year = self.start_year;
        self.with_period(horizon_years, start_year)
    }

    pub fn with_start_year(self, start_year: i32) -> Result<Self> {
        let horizon_years = self.horizon_years;
        self.with_period(horizon_years, start_year)
    }
}

/// Output of a single study run
#[derive(Debug, Clone, Serialize)]
pub struct StudyRun {
    pub property: PropertyProfile,
    pub schedule: ExpenditureSchedule,
    pub scenarios: ScenarioBundle,
}

/// Runs studies with a fixed search grid and tier multipliers
#[derive(Debug, Clone, Default)]
pub struct StudyRunner {
    search: SearchParams,
    multipliers: TierMultipliers,
}

impl StudyRunner {
    /// Runner with the default grid (0 to 200,000 in steps of 1,000)
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with a custom search grid and multipliers
    pub fn with_params(search: SearchParams, multipliers: TierMultipliers) -> Result<Self> {
        search.validate()?;
        Ok(Self { search, multipliers })
    }

    pub fn search(&self) -> &SearchParams {
        &self.search
    }

    pub fn multipliers(&self) -> &TierMultipliers {
        &self.multipliers
    }

    /// Run a single study
    pub fn run(&self, config: &StudyConfig) -> Result<StudyRun> {
        log::info!(
            "Running study for {} ({} components, {} years from {})",
            config.property.display_name(),
            config.ledger.len(),
            config.horizon_years,
            config.start_year
        );

        let schedule = ExpenditureSchedule::forecast(&config.ledger, config.horizon_years, config.start_year)?;
        let scenarios = ScenarioBundle::from_schedule(
            &config.ledger,
            &config.financial,
            &schedule,
            &self.search,
            &self.multipliers,
        );

        Ok(StudyRun {
            property: config.property.clone(),
            schedule,
            scenarios,
        })
    }

    /// Run many independent studies in parallel, one result per config
    pub fn run_batch(&self, configs: &[StudyConfig]) -> Vec<Result<StudyRun>> {
        configs.par_iter().map(|config| self.run(config)).collect()
    }
}

/// Scenario bundle for a study with the default runner
pub fn build_scenarios(config: &StudyConfig) -> Result<ScenarioBundle> {
    Ok(StudyRunner::new().run(config)?.scenarios)
}
