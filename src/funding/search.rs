//! Minimum flat contribution search
//!
//! Candidates are scanned upward from zero in fixed steps below a ceiling.
//! The first candidate whose simulated balance never drops below zero wins.

use super::schedule::{year_at, MAX_HORIZON_YEARS};
use crate::error::{Result, StudyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default upper bound (exclusive) for candidate contributions
pub const DEFAULT_SEARCH_CEILING: f64 = 200_000.0;

/// Default spacing between candidate contributions
pub const DEFAULT_SEARCH_STEP: f64 = 1_000.0;

/// Candidate grid for the contribution search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Candidates must be strictly below this amount
    pub ceiling: f64,

    /// Increment between candidates
    pub step: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            ceiling: DEFAULT_SEARCH_CEILING,
            step: DEFAULT_SEARCH_STEP,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<()> {
        if !self.step.is_finite() || self.step <= 0.0 {
            return Err(StudyError::InvalidSearch {
                reason: format!("step must be positive, got {}", self.step),
            });
        }
        if !self.ceiling.is_finite() || self.ceiling < 0.0 {
            return Err(StudyError::InvalidSearch {
                reason: format!("ceiling must be non-negative, got {}", self.ceiling),
            });
        }
        Ok(())
    }

    /// Candidate contributions in ascending order
    pub fn candidates(&self) -> impl Iterator<Item = f64> + '_ {
        (0u64..)
            .map(move |k| k as f64 * self.step)
            .take_while(move |&c| c < self.ceiling)
    }
}

/// Expenditure for a year offset, 0 when nothing is scheduled
fn expenditure_at(expenditures: &BTreeMap<i32, f64>, start_year: i32, offset: u32) -> f64 {
    year_at(start_year, offset as u64)
        .and_then(|year| expenditures.get(&year))
        .copied()
        .unwrap_or(0.0)
}

/// Whether a flat contribution keeps the balance non-negative in every year
pub fn stays_solvent(
    starting_balance: f64,
    contribution: f64,
    expenditures: &BTreeMap<i32, f64>,
    horizon_years: u32,
    start_year: i32,
) -> bool {
    let mut balance = starting_balance;
    for offset in 0..horizon_years {
        balance = balance + contribution - expenditure_at(expenditures, start_year, offset);
        if balance < 0.0 {
            return false;
        }
    }
    true
}

/// Smallest candidate contribution that keeps the balance non-negative.
///
/// Returns 0 when no candidate below the ceiling succeeds.
pub fn search_minimum_contribution(
    starting_balance: f64,
    expenditures: &BTreeMap<i32, f64>,
    horizon_years: u32,
    start_year: i32,
    params: &SearchParams,
) -> f64 {
    let found = params.candidates().find(|&contribution| {
        stays_solvent(starting_balance, contribution, expenditures, horizon_years, start_year)
    });

    match found {
        Some(contribution) => {
            log::debug!("Minimum contribution found: {:.2}", contribution);
            contribution
        }
        None => {
            log::warn!(
                "No contribution below {:.0} keeps the reserve solvent over {} years, defaulting to 0",
                params.ceiling,
                horizon_years
            );
            0.0
        }
    }
}

/// Year-by-year balances for a flat contribution.
///
/// The first entry is the starting balance; the result has horizon + 1 entries.
pub fn simulate_balances(
    starting_balance: f64,
    contribution: f64,
    expenditures: &BTreeMap<i32, f64>,
    horizon_years: u32,
    start_year: i32,
) -> Vec<f64> {
    let mut balances = Vec::with_capacity(horizon_years.min(MAX_HORIZON_YEARS) as usize + 1);
    let mut balance = starting_balance;
    balances.push(balance);

    for offset in 0..horizon_years {
        balance = balance + contribution - expenditure_at(expenditures, start_year, offset);
        balances.push(balance);
    }

    balances
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const Y: i32 = 2026;

    fn one_expense(year: i32, amount: f64) -> BTreeMap<i32, f64> {
        let mut map = BTreeMap::new();
        map.insert(year, amount);
        map
    }

    #[test]
    fn test_minimum_contribution_single_expense() {
        let expenditures = one_expense(Y + 5, 100_000.0);
        let params = SearchParams::default();
        let contribution = search_minimum_contribution(50_000.0, &expenditures, 10, Y, &params);

        // 50k + 6c >= 100k requires c >= 8,333.33
        assert_relative_eq!(contribution, 9_000.0);

        let balances = simulate_balances(50_000.0, contribution, &expenditures, 10, Y);
        assert!(balances.iter().all(|&b| b >= 0.0));

        let short = simulate_balances(50_000.0, contribution - 1_000.0, &expenditures, 10, Y);
        assert!(short.iter().any(|&b| b < 0.0));
    }

    #[test]
    fn test_no_expenditures_needs_nothing() {
        let contribution = search_minimum_contribution(0.0, &BTreeMap::new(), 30, Y, &SearchParams::default());
        assert_relative_eq!(contribution, 0.0);
    }

    #[test]
    fn test_unreachable_defaults_to_zero() {
        // A single 10M expense in the first year cannot be covered
        let expenditures = one_expense(Y, 10_000_000.0);
        let contribution = search_minimum_contribution(0.0, &expenditures, 30, Y, &SearchParams::default());
        assert_relative_eq!(contribution, 0.0);
    }

    #[test]
    fn test_ceiling_is_exclusive() {
        // Needs exactly 200k in year one, which is not a candidate
        let expenditures = one_expense(Y, 200_000.0);
        let contribution = search_minimum_contribution(0.0, &expenditures, 1, Y, &SearchParams::default());
        assert_relative_eq!(contribution, 0.0);

        let expenditures = one_expense(Y, 199_000.0);
        let contribution = search_minimum_contribution(0.0, &expenditures, 1, Y, &SearchParams::default());
        assert_relative_eq!(contribution, 199_000.0);
    }

    #[test]
    fn test_custom_grid() {
        let expenditures = one_expense(Y + 1, 1_000.0);
        let params = SearchParams { ceiling: 10_000.0, step: 250.0 };
        let contribution = search_minimum_contribution(0.0, &expenditures, 2, Y, &params);
        assert_relative_eq!(contribution, 500.0);
    }

    #[test]
    fn test_expense_outside_horizon_ignored() {
        let expenditures = one_expense(Y + 10, 100_000.0);
        let contribution = search_minimum_contribution(0.0, &expenditures, 10, Y, &SearchParams::default());
        assert_relative_eq!(contribution, 0.0);
    }

    #[test]
    fn test_simulated_trace_shape() {
        let balances = simulate_balances(1_000.0, 500.0, &BTreeMap::new(), 4, Y);
        assert_eq!(balances, vec![1_000.0, 1_500.0, 2_000.0, 2_500.0, 3_000.0]);

        let balances = simulate_balances(1_000.0, 500.0, &BTreeMap::new(), 0, Y);
        assert_eq!(balances, vec![1_000.0]);
    }

    #[test]
    fn test_years_past_i32_max_have_no_expenditure() {
        let expenditures = one_expense(i32::MAX, 5_000.0);

        let balances = simulate_balances(10_000.0, 0.0, &expenditures, 3, i32::MAX - 1);
        assert_eq!(balances, vec![10_000.0, 10_000.0, 5_000.0, 5_000.0]);

        assert!(stays_solvent(0.0, 5_000.0, &expenditures, 3, i32::MAX - 1));
        let contribution = search_minimum_contribution(0.0, &expenditures, 3, i32::MAX - 1, &SearchParams::default());
        assert_relative_eq!(contribution, 3_000.0);
    }

    #[test]
    fn test_invalid_params() {
        assert!(SearchParams { ceiling: 1_000.0, step: 0.0 }.validate().is_err());
        assert!(SearchParams { ceiling: -1.0, step: 100.0 }.validate().is_err());
        assert!(SearchParams::default().validate().is_ok());
        assert_eq!(SearchParams::default().candidates().count(), 200);
    }
}
