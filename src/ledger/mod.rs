//! Component ledger, financial state and data loading

mod data;
pub mod loader;

pub use data::{Component, Ledger, FinancialState, PropertyProfile};
pub use loader::{load_components, load_components_csv, load_financial, load_property, LoadedStudy};
