pub mod core;
pub mod edgar;
pub mod extract;
pub mod fetch;
pub mod policy;
pub mod utils;

// Re-exports
pub use crate::core::{DilutionAnalyzer, ExtractError, ExtractResult, FactSource, FinancialFact};
pub use policy::{evaluate_dilution_policy, DilutionVerdict};
