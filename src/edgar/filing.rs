use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::report::{FilingCategory, ReportType};
use super::tickers::Cik;
use crate::core::error::{ExtractError, ExtractResult};

pub const EDGAR_DATA_URL: &str = "https://data.sec.gov";
pub const EDGAR_ARCHIVES_URL: &str = "https://www.sec.gov/Archives/edgar/data";

// Raw shape of data.sec.gov/submissions/CIK##########.json. The "recent"
// block is columnar: one array per field, indexed by filing.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingEntry {
    #[serde(rename = "accessionNumber")]
    pub accession_number: Vec<String>,
    #[serde(rename = "filingDate")]
    pub filing_date: Vec<NaiveDate>,
    #[serde(rename = "form")]
    pub report_type: Vec<String>,
    #[serde(rename = "primaryDocument")]
    pub primary_document: Vec<String>,
    #[serde(rename = "isInlineXBRL", default)]
    pub is_inline_xbrl: Vec<i32>,
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(rename = "primaryDocDescription", default)]
    pub primary_doc_description: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingFile {
    pub name: String,
    #[serde(rename = "filingCount")]
    pub filing_count: i64,
    #[serde(rename = "filingFrom")]
    pub filing_from: String,
    #[serde(rename = "filingTo")]
    pub filing_to: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilingsData {
    pub recent: FilingEntry,
    #[serde(default)]
    pub files: Vec<FilingFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyFilings {
    pub cik: String,
    #[serde(rename = "entityType", default)]
    pub entity_type: String,
    #[serde(default)]
    pub sic: String,
    #[serde(rename = "sicDescription", default)]
    pub sic_description: String,
    pub name: String,
    #[serde(default)]
    pub tickers: Vec<String>,
    #[serde(default)]
    pub exchanges: Vec<String>,
    pub filings: FilingsData,
}

impl CompanyFilings {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| anyhow!("Failed to parse submissions JSON: {}", e))
    }
}

/// Canonical dashed accession number, e.g. `0001193125-24-012345`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccessionNumber(String);

impl AccessionNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Dash-free form used as a directory in archive URLs.
    pub fn as_path_segment(&self) -> String {
        self.0.replace('-', "")
    }
}

impl FromStr for AccessionNumber {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let digits = s.chars().filter(|c| c.is_ascii_digit()).count();
        if digits != 18 || !s.chars().all(|c| c.is_ascii_digit() || c == '-') {
            return Err(anyhow!("Malformed accession number: {:?}", s));
        }
        Ok(AccessionNumber(s.to_string()))
    }
}

impl TryFrom<String> for AccessionNumber {
    type Error = anyhow::Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<AccessionNumber> for String {
    fn from(a: AccessionNumber) -> Self {
        a.0
    }
}

impl fmt::Display for AccessionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    pub report_type: ReportType,
    pub accession_number: AccessionNumber,
    pub filing_date: NaiveDate,
    pub primary_document: String,
    pub primary_doc_description: String,
    pub is_inline_xbrl: bool,
    /// 8-K item codes, e.g. "2.02,9.01"
    pub items: String,
}

impl FilingRecord {
    pub fn document_url(&self, cik: Cik) -> String {
        format!(
            "{}/{}/{}/{}",
            EDGAR_ARCHIVES_URL,
            cik,
            self.accession_number.as_path_segment(),
            self.primary_document
        )
    }

    fn matches_report_type(&self, report_types: &[ReportType]) -> bool {
        report_types.iter().any(|rt| &self.report_type == rt)
    }
}

/// One entity's filing history, most recent first. The order is the order
/// EDGAR supplied and is never re-sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionIndex {
    pub cik: Cik,
    pub name: String,
    pub filings: Vec<FilingRecord>,
}

impl TryFrom<CompanyFilings> for SubmissionIndex {
    type Error = anyhow::Error;

    fn try_from(company: CompanyFilings) -> Result<Self> {
        let cik: Cik = company.cik.parse()?;
        let entry = company.filings.recent;
        let len = entry.accession_number.len();

        let required = [
            ("filingDate", entry.filing_date.len()),
            ("form", entry.report_type.len()),
            ("primaryDocument", entry.primary_document.len()),
        ];
        let optional = [
            ("isInlineXBRL", entry.is_inline_xbrl.len()),
            ("items", entry.items.len()),
            ("primaryDocDescription", entry.primary_doc_description.len()),
        ];
        for (column, column_len) in required {
            if column_len != len {
                return Err(anyhow!(
                    "Submissions column {} has {} rows, expected {}",
                    column,
                    column_len,
                    len
                ));
            }
        }
        for (column, column_len) in optional {
            if column_len != 0 && column_len != len {
                return Err(anyhow!(
                    "Submissions column {} has {} rows, expected {}",
                    column,
                    column_len,
                    len
                ));
            }
        }

        let mut filings = Vec::with_capacity(len);
        for i in 0..len {
            let report_type = ReportType::from_str(&entry.report_type[i]).map_err(|e| anyhow!(e))?;
            filings.push(FilingRecord {
                report_type,
                accession_number: entry.accession_number[i].parse()?,
                filing_date: entry.filing_date[i],
                primary_document: entry.primary_document[i].clone(),
                primary_doc_description: entry
                    .primary_doc_description
                    .get(i)
                    .cloned()
                    .unwrap_or_default(),
                is_inline_xbrl: entry.is_inline_xbrl.get(i).is_some_and(|flag| *flag == 1),
                items: entry.items.get(i).cloned().unwrap_or_default(),
            });
        }

        let index = SubmissionIndex {
            cik,
            name: company.name,
            filings,
        };
        log_filing_summary(&index);
        Ok(index)
    }
}

fn log_filing_summary(index: &SubmissionIndex) {
    let unique_report_types: std::collections::HashSet<_> =
        index.filings.iter().map(|f| f.report_type.to_string()).collect();
    log::info!(
        "Loaded submissions for CIK {}: {} filings, {} unique report types ({}), date range: {} to {}",
        index.cik.padded(),
        index.filings.len(),
        unique_report_types.len(),
        unique_report_types.iter().sorted().join(", "),
        index.filings.iter().map(|f| f.filing_date).min().map_or("N/A".to_string(), |d| d.to_string()),
        index.filings.iter().map(|f| f.filing_date).max().map_or("N/A".to_string(), |d| d.to_string())
    );
}

impl SubmissionIndex {
    /// First record, in index order, whose form type is one of `accepted`.
    ///
    /// The position in the index decides, not the filing date: EDGAR lists
    /// filings newest first, so the first hit is the most recent one.
    pub fn latest_filing(&self, accepted: &[ReportType]) -> ExtractResult<&FilingRecord> {
        self.filings
            .iter()
            .find(|filing| filing.matches_report_type(accepted))
            .ok_or_else(|| {
                ExtractError::not_found(format!(
                    "no {} filing for CIK {}",
                    accepted.iter().join("/"),
                    self.cik
                ))
            })
    }

    /// Groups the first `limit` filings by display category, in display order,
    /// skipping empty categories.
    pub fn group_by_category(&self, limit: usize) -> Vec<(FilingCategory, Vec<&FilingRecord>)> {
        FilingCategory::display_order()
            .map(|category| {
                let filings = self
                    .filings
                    .iter()
                    .take(limit)
                    .filter(|f| f.report_type.category() == category)
                    .collect::<Vec<_>>();
                (category, filings)
            })
            .filter(|(_, filings)| !filings.is_empty())
            .collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn record(form: &str, date: &str, seq: u32) -> FilingRecord {
        FilingRecord {
            report_type: form.parse().unwrap(),
            accession_number: format!("0000950170-23-{:06}", seq).parse().unwrap(),
            filing_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            primary_document: format!("doc{}.htm", seq),
            primary_doc_description: String::new(),
            is_inline_xbrl: true,
            items: String::new(),
        }
    }

    const SUBMISSIONS: &str = r#"{
        "cik": "1603652",
        "entityType": "operating",
        "sic": "7389",
        "sicDescription": "Services-Business Services, NEC",
        "name": "Urgent.ly Inc.",
        "tickers": ["ULY"],
        "exchanges": ["Nasdaq"],
        "filings": {
            "recent": {
                "accessionNumber": ["0001193125-25-160001", "0001603652-25-000042", "0001603652-25-000017"],
                "filingDate": ["2025-07-03", "2025-05-14", "2025-03-20"],
                "form": ["S-3", "10-Q", "10-K"],
                "primaryDocument": ["d12345ds3.htm", "uly-20250331.htm", "uly-20241231.htm"],
                "isInlineXBRL": [0, 1, 1],
                "items": ["", "", ""],
                "primaryDocDescription": ["S-3", "10-Q", "10-K"]
            },
            "files": []
        }
    }"#;

    #[test]
    fn test_parse_submissions_into_index() {
        let company = CompanyFilings::from_json(SUBMISSIONS).unwrap();
        let index = SubmissionIndex::try_from(company).unwrap();
        assert_eq!(index.cik, Cik(1603652));
        assert_eq!(index.name, "Urgent.ly Inc.");
        assert_eq!(index.filings.len(), 3);
        assert_eq!(index.filings[0].report_type, ReportType::FormS3);
        assert!(!index.filings[0].is_inline_xbrl);
        assert!(index.filings[1].is_inline_xbrl);
        assert_eq!(
            index.filings[0].document_url(index.cik),
            "https://www.sec.gov/Archives/edgar/data/1603652/000119312525160001/d12345ds3.htm"
        );
    }

    #[test]
    fn test_column_mismatch_is_rejected() {
        let mut company = CompanyFilings::from_json(SUBMISSIONS).unwrap();
        company.filings.recent.report_type.pop();
        assert!(SubmissionIndex::try_from(company).is_err());
    }

    #[test]
    fn test_accession_number_validation() {
        let a: AccessionNumber = "0001193125-24-012345".parse().unwrap();
        assert_eq!(a.as_path_segment(), "000119312524012345");
        assert!("0001193125-24-01234".parse::<AccessionNumber>().is_err());
        assert!("0001193125/24/012345".parse::<AccessionNumber>().is_err());
    }

    #[test]
    fn test_latest_filing_follows_index_order_not_dates() {
        let index = SubmissionIndex {
            cik: Cik(1),
            name: "Test".into(),
            filings: vec![
                record("10-K", "2022-01-01", 1),
                record("8-K", "2023-06-01", 2),
                record("10-Q", "2023-09-01", 3),
            ],
        };
        let found = index
            .latest_filing(&[ReportType::Form10Q, ReportType::Form10K])
            .unwrap();
        assert_eq!(found.report_type, ReportType::Form10K);
        assert_eq!(found.filing_date.to_string(), "2022-01-01");
    }

    #[test]
    fn test_latest_filing_not_found() {
        let empty = SubmissionIndex {
            cik: Cik(1),
            name: "Empty".into(),
            filings: vec![],
        };
        assert!(empty
            .latest_filing(&[ReportType::Form10Q])
            .unwrap_err()
            .is_not_found());

        let only_8k = SubmissionIndex {
            filings: vec![record("8-K", "2023-06-01", 1)],
            ..empty
        };
        assert!(only_8k
            .latest_filing(&[ReportType::FormS3])
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn test_group_by_category_respects_limit_and_order() {
        let index = SubmissionIndex {
            cik: Cik(1),
            name: "Test".into(),
            filings: vec![
                record("4", "2024-03-01", 1),
                record("S-3", "2024-02-01", 2),
                record("10-Q", "2024-01-01", 3),
                record("DEF 14A", "2023-12-01", 4),
            ],
        };
        let groups = index.group_by_category(3);
        let categories: Vec<_> = groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            categories,
            vec![
                FilingCategory::AnnualQuarterly,
                FilingCategory::Registration,
                FilingCategory::InsiderTrading
            ]
        );
    }
}
