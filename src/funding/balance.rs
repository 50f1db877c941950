//! Fully funded balance and percent funded

use crate::ledger::{Component, FinancialState, Ledger};

/// Fully funded share of a single component: (effective age / UL) * cost.
/// Components with zero useful life contribute nothing.
pub fn component_fully_funded(component: &Component) -> f64 {
    match component.life_consumed() {
        Some(fraction) => fraction * component.replacement_cost,
        None => 0.0,
    }
}

/// Balance the reserve would hold if every component had been funded in
/// proportion to the life it has consumed
pub fn fully_funded_balance(ledger: &Ledger) -> f64 {
    ledger.components().iter().map(component_fully_funded).sum()
}

/// Starting balance as a percentage of the fully funded balance.
///
/// Returns 0 when the fully funded balance is not strictly positive.
pub fn percent_funded(ledger: &Ledger, financial: &FinancialState) -> f64 {
    percent_of(financial.starting_reserve_balance, fully_funded_balance(ledger))
}

/// Percent funded against a precomputed fully funded balance
pub fn percent_of(balance: f64, fully_funded: f64) -> f64 {
    if fully_funded > 0.0 {
        balance / fully_funded * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ledger(components: Vec<Component>) -> Ledger {
        Ledger::new(components).unwrap()
    }

    #[test]
    fn test_single_component() {
        let ledger = ledger(vec![Component::new("Roof", 20, 5, 100_000.0)]);
        assert_relative_eq!(fully_funded_balance(&ledger), 75_000.0);
    }

    #[test]
    fn test_empty_ledger() {
        let ledger = Ledger::empty();
        assert_relative_eq!(fully_funded_balance(&ledger), 0.0);
        assert_relative_eq!(percent_funded(&ledger, &FinancialState::new(50_000.0, 0.0)), 0.0);
    }

    #[test]
    fn test_zero_useful_life_contributes_nothing() {
        let ledger = ledger(vec![
            Component::new("Sealant", 0, 0, 5_000.0),
            Component::new("Paint", 10, 5, 20_000.0),
        ]);
        assert_relative_eq!(fully_funded_balance(&ledger), 10_000.0);
    }

    #[test]
    fn test_monotonic_in_effective_age() {
        let mut previous = f64::MIN;
        for remaining in (0..=20).rev() {
            let ledger = ledger(vec![Component::new("Roof", 20, remaining, 100_000.0)]);
            let ffb = fully_funded_balance(&ledger);
            assert!(ffb >= previous, "FFB decreased at remaining life {}", remaining);
            previous = ffb;
        }
        assert_relative_eq!(previous, 100_000.0);
    }

    #[test]
    fn test_linear_in_cost() {
        let base = fully_funded_balance(&ledger(vec![Component::new("Roof", 25, 10, 40_000.0)]));
        let tripled = fully_funded_balance(&ledger(vec![Component::new("Roof", 25, 10, 120_000.0)]));
        assert_relative_eq!(tripled, base * 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_percent_funded() {
        let ledger = ledger(vec![Component::new("Roof", 20, 5, 100_000.0)]);
        let financial = FinancialState::new(50_000.0, 10_000.0);
        assert_relative_eq!(percent_funded(&ledger, &financial), 200.0 / 3.0, max_relative = 1e-12);
    }

    #[test]
    fn test_percent_funded_zero_ffb() {
        // Brand-new component: nothing consumed yet
        let ledger = ledger(vec![Component::new("Roof", 20, 20, 100_000.0)]);
        assert_relative_eq!(percent_funded(&ledger, &FinancialState::new(10_000.0, 0.0)), 0.0);
    }
}
