pub mod filing;
pub mod parsing;
pub mod report;
pub mod tickers;
pub mod xbrl;

pub use filing::{AccessionNumber, CompanyFilings, FilingRecord, SubmissionIndex};
pub use report::{FilingCategory, ReportType};
pub use tickers::{Cik, Ticker, TickerMap};
pub use xbrl::{CompanyFacts, ConceptSeries};
