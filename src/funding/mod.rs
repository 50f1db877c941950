//! Reserve funding calculations
//!
//! - **Fully funded accounting**: the balance the reserve should hold today
//! - **Expenditure scheduling**: component replacements over the horizon
//! - **Scenario search**: minimum flat contribution and the tiers derived from it
//!
//! Data flows one way: ledger -> schedule -> search -> scenario bundle.

mod balance;
mod schedule;
mod search;
mod scenarios;

pub use balance::{component_fully_funded, fully_funded_balance, percent_funded, percent_of};
pub use schedule::{validate_horizon, ComponentExpenditures, ExpenditureSchedule, MAX_HORIZON_YEARS};
pub use search::{
    search_minimum_contribution, simulate_balances, stays_solvent, SearchParams,
    DEFAULT_SEARCH_CEILING, DEFAULT_SEARCH_STEP,
};
pub use scenarios::{
    FundingPlanRow, FundingScenario, ScenarioBundle, ScenarioKind, StudySummary, TierMultipliers,
    FULLY_FUNDED_MULTIPLIER, THRESHOLD_MULTIPLIER,
};
