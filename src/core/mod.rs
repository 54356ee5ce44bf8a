pub mod config;
pub mod error;
pub mod service;
pub mod types;

pub use config::EdgarConfig;
pub use error::{ExtractError, ExtractResult};
pub use service::DilutionAnalyzer;
pub use types::{DilutionReport, FactSource, FinancialFact};
