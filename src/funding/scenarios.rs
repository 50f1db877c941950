//! Baseline, threshold and fully funded contribution plans

use super::balance::{fully_funded_balance, percent_of};
use super::schedule::{year_at, ExpenditureSchedule};
use super::search::{search_minimum_contribution, simulate_balances, SearchParams};
use crate::error::Result;
use crate::ledger::{FinancialState, Ledger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Threshold contribution as a multiple of baseline
pub const THRESHOLD_MULTIPLIER: f64 = 1.25;

/// Fully funded contribution as a multiple of baseline
pub const FULLY_FUNDED_MULTIPLIER: f64 = 1.35;

/// Funding policy tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// Minimum contribution keeping the balance non-negative
    Baseline,
    /// Baseline scaled by the threshold multiplier
    Threshold,
    /// Baseline scaled by the fully funded multiplier
    FullyFunded,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [ScenarioKind::Baseline, ScenarioKind::Threshold, ScenarioKind::FullyFunded];

    pub fn label(&self) -> &'static str {
        match self {
            ScenarioKind::Baseline => "Baseline Funding",
            ScenarioKind::Threshold => "Threshold Funding",
            ScenarioKind::FullyFunded => "Fully Funded",
        }
    }
}

/// Multipliers deriving the upper tiers from the baseline contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierMultipliers {
    pub threshold: f64,
    pub fully_funded: f64,
}

impl Default for TierMultipliers {
    fn default() -> Self {
        Self {
            threshold: THRESHOLD_MULTIPLIER,
            fully_funded: FULLY_FUNDED_MULTIPLIER,
        }
    }
}

/// One contribution plan and its projected balances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingScenario {
    pub kind: ScenarioKind,

    /// Flat contribution applied every year
    pub annual_contribution: f64,

    /// Balance at the start year followed by one balance per forecast year
    pub balances: Vec<f64>,
}

impl FundingScenario {
    /// Lowest projected balance and the offset at which it occurs
    pub fn minimum_balance(&self) -> Option<(usize, f64)> {
        self.balances
            .iter()
            .copied()
            .enumerate()
            .fold(None, |lowest, (i, b)| match lowest {
                Some((_, low)) if low <= b => lowest,
                _ => Some((i, b)),
            })
    }

    pub fn ending_balance(&self) -> f64 {
        self.balances.last().copied().unwrap_or(0.0)
    }
}

/// Everything the reporting layer needs from a study run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBundle {
    pub start_year: i32,
    pub horizon_years: u32,
    pub baseline: FundingScenario,
    pub threshold: FundingScenario,
    pub fully_funded: FundingScenario,

    /// Total expenditure per forecast year
    pub expenditures: BTreeMap<i32, f64>,

    /// Present-dollar cost of replacing every component once
    pub total_replacement_cost: f64,

    pub fully_funded_balance: f64,
    pub percent_funded: f64,
}

impl ScenarioBundle {
    /// Forecast expenditures, search the baseline and derive the upper tiers
    pub fn build(
        ledger: &Ledger,
        financial: &FinancialState,
        horizon_years: u32,
        start_year: i32,
        search: &SearchParams,
        multipliers: &TierMultipliers,
    ) -> Result<Self> {
        let schedule = ExpenditureSchedule::forecast(ledger, horizon_years, start_year)?;
        Ok(Self::from_schedule(ledger, financial, &schedule, search, multipliers))
    }

    /// Build scenarios from an already computed schedule
    pub fn from_schedule(
        ledger: &Ledger,
        financial: &FinancialState,
        schedule: &ExpenditureSchedule,
        search: &SearchParams,
        multipliers: &TierMultipliers,
    ) -> Self {
        let start_year = schedule.start_year;
        let horizon_years = schedule.horizon_years;
        let expenditures = schedule.annual_totals();
        let starting_balance = financial.starting_reserve_balance;

        let baseline_contribution =
            search_minimum_contribution(starting_balance, &expenditures, horizon_years, start_year, search);

        let scenario = |kind: ScenarioKind, annual_contribution: f64| FundingScenario {
            kind,
            annual_contribution,
            balances: simulate_balances(starting_balance, annual_contribution, &expenditures, horizon_years, start_year),
        };

        let baseline = scenario(ScenarioKind::Baseline, baseline_contribution);
        let threshold = scenario(ScenarioKind::Threshold, baseline_contribution * multipliers.threshold);
        let fully_funded = scenario(ScenarioKind::FullyFunded, baseline_contribution * multipliers.fully_funded);

        let ffb = fully_funded_balance(ledger);
        let percent_funded = percent_of(starting_balance, ffb);

        log::info!(
            "Baseline contribution {:.2} over {} years from {}; percent funded {:.1}%",
            baseline_contribution,
            horizon_years,
            start_year,
            percent_funded
        );

        Self {
            start_year,
            horizon_years,
            baseline,
            threshold,
            fully_funded,
            expenditures,
            total_replacement_cost: ledger.total_replacement_cost(),
            fully_funded_balance: ffb,
            percent_funded,
        }
    }

    pub fn scenario(&self, kind: ScenarioKind) -> &FundingScenario {
        match kind {
            ScenarioKind::Baseline => &self.baseline,
            ScenarioKind::Threshold => &self.threshold,
            ScenarioKind::FullyFunded => &self.fully_funded,
        }
    }

    /// Year-by-year funding plan: expenditures alongside each tier's balance
    pub fn funding_plan(&self) -> Vec<FundingPlanRow> {
        (0..=self.horizon_years as usize)
            .map_while(|i| {
                let year = year_at(self.start_year, i as u64)?;
                Some(FundingPlanRow {
                    year,
                    expenditure: self.expenditures.get(&year).copied().unwrap_or(0.0),
                    baseline_balance: self.baseline.balances[i],
                    threshold_balance: self.threshold.balances[i],
                    fully_funded_balance: self.fully_funded.balances[i],
                })
            })
            .collect()
    }

    /// Headline figures for the study
    pub fn summary(&self) -> StudySummary {
        let total_expenditures: f64 = self.expenditures.values().sum();

        let peak = self
            .expenditures
            .iter()
            .filter(|&(_, &amount)| amount > 0.0)
            .fold(None, |peak: Option<(i32, f64)>, (&year, &amount)| match peak {
                Some((_, best)) if best >= amount => peak,
                _ => Some((year, amount)),
            });

        let (min_offset, min_balance) = self
            .baseline
            .minimum_balance()
            .unwrap_or((0, 0.0));

        StudySummary {
            start_year: self.start_year,
            horizon_years: self.horizon_years,
            total_expenditures,
            total_replacement_cost: self.total_replacement_cost,
            peak_expenditure_year: peak.map(|(year, _)| year),
            peak_expenditure: peak.map(|(_, amount)| amount).unwrap_or(0.0),
            minimum_baseline_balance: min_balance,
            minimum_baseline_year: year_at(self.start_year, min_offset as u64).unwrap_or(i32::MAX),
            fully_funded_balance: self.fully_funded_balance,
            percent_funded: self.percent_funded,
            baseline_contribution: self.baseline.annual_contribution,
            threshold_contribution: self.threshold.annual_contribution,
            fully_funded_contribution: self.fully_funded.annual_contribution,
        }
    }
}

/// One year of the funding plan table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingPlanRow {
    pub year: i32,
    pub expenditure: f64,
    pub baseline_balance: f64,
    pub threshold_balance: f64,
    pub fully_funded_balance: f64,
}

/// Summary statistics for a study run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySummary {
    pub start_year: i32,
    pub horizon_years: u32,
    pub total_expenditures: f64,
    pub total_replacement_cost: f64,
    pub peak_expenditure_year: Option<i32>,
    pub peak_expenditure: f64,
    pub minimum_baseline_balance: f64,
    pub minimum_baseline_year: i32,
    pub fully_funded_balance: f64,
    pub percent_funded: f64,
    pub baseline_contribution: f64,
    pub threshold_contribution: f64,
    pub fully_funded_contribution: f64,
}
