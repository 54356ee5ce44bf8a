use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::edgar::report::ReportType;
use crate::policy::DilutionVerdict;

/// Where a fact's value came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "form")]
pub enum FactSource {
    /// Read directly out of the text of a filing of the given form type
    FilingText(ReportType),
    /// Latest entry of a structured (XBRL/dei) concept series
    Xbrl,
    /// Derived arithmetically from other disclosed numbers (shares x price)
    Computed,
}

impl fmt::Display for FactSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactSource::FilingText(form) => write!(f, "{} text", form),
            FactSource::Xbrl => write!(f, "XBRL"),
            FactSource::Computed => write!(f, "computed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialFact {
    pub value: f64,
    pub as_of: NaiveDate,
    pub source: FactSource,
    /// Only populated for shelf-registration facts
    pub expiration: Option<NaiveDate>,
    /// Dollar ceiling of a shelf registration, when the filing states one
    pub shelf_capacity: Option<u64>,
}

impl FinancialFact {
    /// Returns `None` for negative or non-finite values so a fact is never
    /// constructed outside its valid range.
    pub fn new(value: f64, as_of: NaiveDate, source: FactSource) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        Some(Self {
            value,
            as_of,
            source,
            expiration: None,
            shelf_capacity: None,
        })
    }

    pub fn with_expiration(mut self, expiration: NaiveDate) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_shelf_capacity(mut self, capacity: Option<u64>) -> Self {
        self.shelf_capacity = capacity;
        self
    }
}

/// Everything the analyzer learned about one entity in a single request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DilutionReport {
    pub cik: u64,
    pub name: String,
    pub shares_outstanding: Option<FinancialFact>,
    pub public_float: Option<FinancialFact>,
    pub shelf: Option<FinancialFact>,
    /// Shelf ceiling found in the registration statement even when no float
    /// could be read from it
    pub shelf_capacity: Option<u64>,
    pub verdict: Option<DilutionVerdict>,
}
