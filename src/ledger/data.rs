//! Component ledger, financial state and property profile

use crate::error::{Result, StudyError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single replaceable asset in the reserve study.
///
/// Only built through `Component::new` or the loaders, and only admitted
/// into a `Ledger` after validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Component {
    /// Component name (unique within a ledger)
    pub name: String,

    /// Total expected service life when new, in years
    pub useful_life: u32,

    /// Years until the next replacement is due, as of the study date
    pub remaining_life: u32,

    /// Present-dollar replacement cost
    pub replacement_cost: f64,

    /// Inventory quantity (descriptive only)
    pub quantity: f64,

    /// Inventory unit, e.g. "SF" or "LS" (descriptive only)
    pub unit: String,

    /// Optional grouping such as "Roof" or "Plumbing"
    pub category: Option<String>,

    /// Free-text condition notes
    pub description: Option<String>,
}

impl Component {
    /// Create a component with life-cycle and cost attributes only
    pub fn new(name: impl Into<String>, useful_life: u32, remaining_life: u32, replacement_cost: f64) -> Self {
        Self {
            name: name.into(),
            useful_life,
            remaining_life,
            replacement_cost,
            quantity: 0.0,
            unit: String::new(),
            category: None,
            description: None,
        }
    }

    /// Attach inventory quantity and unit
    pub fn with_inventory(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }

    /// Effective age = UL - RUL.
    ///
    /// Negative when the remaining life exceeds the useful life.
    pub fn effective_age(&self) -> i64 {
        self.useful_life as i64 - self.remaining_life as i64
    }

    /// Fraction of useful life consumed, or None when useful life is zero
    pub fn life_consumed(&self) -> Option<f64> {
        if self.useful_life == 0 {
            None
        } else {
            Some(self.effective_age() as f64 / self.useful_life as f64)
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.replacement_cost.is_finite() || self.replacement_cost < 0.0 {
            return Err(StudyError::InvalidComponent {
                name: self.name.clone(),
                reason: format!("replacement cost must be a non-negative amount, got {}", self.replacement_cost),
            });
        }
        if self.remaining_life > self.useful_life {
            log::warn!(
                "Component '{}' has remaining life {} beyond useful life {}",
                self.name, self.remaining_life, self.useful_life
            );
        }
        Ok(())
    }
}

/// Immutable, validated list of reserve components
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ledger {
    components: Vec<Component>,
}

impl Ledger {
    /// Build a ledger, rejecting duplicate names and invalid costs
    pub fn new(components: Vec<Component>) -> Result<Self> {
        {
            let mut seen = HashSet::with_capacity(components.len());
            for component in &components {
                component.validate()?;
                if !seen.insert(component.name.as_str()) {
                    return Err(StudyError::DuplicateComponent(component.name.clone()));
                }
            }
        }

        Ok(Self { components })
    }

    /// Ledger with no components
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a component by name
    pub fn get(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Sum of present-dollar replacement costs
    pub fn total_replacement_cost(&self) -> f64 {
        self.components.iter().map(|c| c.replacement_cost).sum()
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Reserve fund position at the study date
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FinancialState {
    /// Reserve balance on hand at the start of the horizon
    pub starting_reserve_balance: f64,

    /// Contribution currently budgeted (informational)
    pub annual_contribution: f64,
}

impl FinancialState {
    pub fn new(starting_reserve_balance: f64, annual_contribution: f64) -> Self {
        Self { starting_reserve_balance, annual_contribution }
    }
}

/// Descriptive property data carried into report outputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyProfile {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub address: Option<String>,

    /// Report reference number
    #[serde(default)]
    pub reference_id: Option<String>,

    /// Date of the site inspection (ISO 8601)
    #[serde(default)]
    pub inspection_date: Option<NaiveDate>,

    #[serde(default)]
    pub construction_year: Option<i32>,

    #[serde(default)]
    pub building_count: Option<u32>,
}

impl PropertyProfile {
    /// Display name, falling back to a generic label
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "the property"
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_effective_age() {
        let roof = Component::new("Roof", 20, 5, 100_000.0);
        assert_eq!(roof.effective_age(), 15);
        assert_relative_eq!(roof.life_consumed().unwrap(), 0.75);

        let odd = Component::new("Odd", 10, 12, 1_000.0);
        assert_eq!(odd.effective_age(), -2);

        let no_life = Component::new("Sealant", 0, 0, 5_000.0);
        assert!(no_life.life_consumed().is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = Ledger::new(vec![
            Component::new("Roof", 20, 5, 100_000.0),
            Component::new("Roof", 25, 10, 80_000.0),
        ]);

        match result {
            Err(StudyError::DuplicateComponent(name)) => assert_eq!(name, "Roof"),
            other => panic!("Expected duplicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_cost_rejected() {
        let result = Ledger::new(vec![Component::new("Paint", 8, 2, -10.0)]);
        assert!(matches!(result, Err(StudyError::InvalidComponent { .. })));
    }

    #[test]
    fn test_remaining_beyond_useful_tolerated() {
        let ledger = Ledger::new(vec![Component::new("Elevator", 10, 15, 50_000.0)]).unwrap();
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_ledger_lookup_and_totals() {
        let ledger = Ledger::new(vec![
            Component::new("Roof", 20, 5, 100_000.0).with_inventory(12_000.0, "SF"),
            Component::new("Paint", 8, 2, 40_000.0),
        ])
        .unwrap();

        assert_eq!(ledger.get("Roof").unwrap().unit, "SF");
        assert!(ledger.get("Paint").unwrap().description.is_none());
        assert!(ledger.get("Pool").is_none());
        assert_relative_eq!(ledger.total_replacement_cost(), 140_000.0);
        assert_eq!(ledger.into_iter().count(), 2);
    }

    #[test]
    fn test_property_display_name() {
        let mut profile = PropertyProfile::default();
        assert_eq!(profile.display_name(), "the property");
        profile.name = "Bayview Towers".to_string();
        assert_eq!(profile.display_name(), "Bayview Towers");
    }
}
