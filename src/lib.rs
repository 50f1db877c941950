//! Reserve Study - capital reserve funding engine for managed properties
//!
//! This library provides:
//! - Component ledgers with life-cycle and replacement cost data
//! - Fully funded balance and percent funded accounting
//! - Multi-decade expenditure forecasting from component life cycles
//! - Minimum contribution search with baseline, threshold and fully funded tiers
//! - CSV/JSON report tables for downstream document and chart assembly

pub mod error;
pub mod ledger;
pub mod funding;
pub mod report;
pub mod study;

// Re-export commonly used types
pub use error::StudyError;
pub use ledger::{Component, Ledger, FinancialState, PropertyProfile};
pub use funding::{ExpenditureSchedule, FundingScenario, ScenarioBundle, ScenarioKind, SearchParams, TierMultipliers};
pub use study::{StudyConfig, StudyRun, StudyRunner, build_scenarios};
