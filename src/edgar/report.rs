use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use strum::{EnumIter, IntoEnumIterator};

/// EDGAR form type code. Unknown codes are preserved verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(try_from = "String", into = "String")]
pub enum ReportType {
    Form10K,
    Form10Q,
    Form8K,
    Form6K,
    Form20F,
    Form3,
    Form4,
    Form5,
    FormS1,
    FormS3,
    FormS8,
    FormDEF14A,
    FormDEFA14A,
    Form13FHR,
    FormSC13G,
    FormSC13D,
    FormSD,
    FormUpload,
    FormCorresp,
    FormCTOrder,
    Other(String),
}

impl TryFrom<String> for ReportType {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ReportType::from_str(&s)
    }
}

impl From<ReportType> for String {
    fn from(rt: ReportType) -> Self {
        rt.to_string()
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Form10K => write!(f, "10-K"),
            ReportType::Form10Q => write!(f, "10-Q"),
            ReportType::Form8K => write!(f, "8-K"),
            ReportType::Form6K => write!(f, "6-K"),
            ReportType::Form20F => write!(f, "20-F"),
            ReportType::Form3 => write!(f, "3"),
            ReportType::Form4 => write!(f, "4"),
            ReportType::Form5 => write!(f, "5"),
            ReportType::FormS1 => write!(f, "S-1"),
            ReportType::FormS3 => write!(f, "S-3"),
            ReportType::FormS8 => write!(f, "S-8"),
            ReportType::FormDEF14A => write!(f, "DEF 14A"),
            ReportType::FormDEFA14A => write!(f, "DEFA14A"),
            ReportType::Form13FHR => write!(f, "13F-HR"),
            ReportType::FormSC13G => write!(f, "SC 13G"),
            ReportType::FormSC13D => write!(f, "SC 13D"),
            ReportType::FormSD => write!(f, "SD"),
            ReportType::FormUpload => write!(f, "UPLOAD"),
            ReportType::FormCorresp => write!(f, "CORRESP"),
            ReportType::FormCTOrder => write!(f, "CT ORDER"),
            ReportType::Other(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for ReportType {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<ReportType, std::string::String> {
        // Codes are matched exactly; amendments such as "10-K/A" stay distinct.
        match s {
            "10-K" => Ok(ReportType::Form10K),
            "10-Q" => Ok(ReportType::Form10Q),
            "8-K" => Ok(ReportType::Form8K),
            "6-K" => Ok(ReportType::Form6K),
            "20-F" => Ok(ReportType::Form20F),
            "3" => Ok(ReportType::Form3),
            "4" => Ok(ReportType::Form4),
            "5" => Ok(ReportType::Form5),
            "S-1" => Ok(ReportType::FormS1),
            "S-3" => Ok(ReportType::FormS3),
            "S-8" => Ok(ReportType::FormS8),
            "DEF 14A" => Ok(ReportType::FormDEF14A),
            "DEFA14A" => Ok(ReportType::FormDEFA14A),
            "13F-HR" => Ok(ReportType::Form13FHR),
            "SC 13G" => Ok(ReportType::FormSC13G),
            "SC 13D" => Ok(ReportType::FormSC13D),
            "SD" => Ok(ReportType::FormSD),
            "UPLOAD" => Ok(ReportType::FormUpload),
            "CORRESP" => Ok(ReportType::FormCorresp),
            "CT ORDER" => Ok(ReportType::FormCTOrder),
            _ => Ok(ReportType::Other(s.to_string())),
        }
    }
}

pub static REPORT_TYPES: Lazy<String> = Lazy::new(|| {
    ReportType::iter()
        .filter(|t| !matches!(t, ReportType::Other(_)))
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
});

impl ReportType {
    pub fn list_types() -> &'static str {
        &REPORT_TYPES
    }

    pub fn description(&self) -> Option<&'static str> {
        let description = match self {
            ReportType::Form10K => "Annual report",
            ReportType::Form10Q => "Quarterly report",
            ReportType::Form8K => "Current report (major events)",
            ReportType::Form4 => "Insider trading (Statement of Changes in Beneficial Ownership)",
            ReportType::Form3 => "Insider trading (Initial Statement of Beneficial Ownership)",
            ReportType::Form5 => {
                "Insider trading (Annual Statement of Changes in Beneficial Ownership)"
            }
            ReportType::FormS1 => "IPO / General Registration Statement",
            ReportType::FormS3 => "Simplified Registration Statement",
            ReportType::FormS8 => "Securities offered to employees",
            ReportType::FormDEF14A => "Definitive Proxy Statement",
            ReportType::FormDEFA14A => "Additional Proxy Soliciting Materials",
            ReportType::Form13FHR => "Quarterly Institutional Holdings",
            ReportType::FormSC13G => "Beneficial ownership (>5%)",
            ReportType::FormSC13D => "Beneficial ownership (>5% active)",
            ReportType::FormSD => "Special Disclosure (Conflict Minerals, etc.)",
            ReportType::FormUpload => "SEC Staff Letter / Correspondence",
            ReportType::FormCorresp => "Correspondence with SEC",
            ReportType::FormCTOrder => "Confidential Treatment Order",
            ReportType::Form6K | ReportType::Form20F | ReportType::Other(_) => return None,
        };
        Some(description)
    }

    pub fn category(&self) -> FilingCategory {
        FilingCategory::of(&self.to_string())
    }
}

/// Display grouping for filings, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum FilingCategory {
    AnnualQuarterly,
    Registration,
    Proxy,
    BeneficialOwnership,
    InsiderTrading,
    Other,
}

// Checked in this order; the first table with a matching prefix wins.
const CATEGORY_PREFIXES: &[(FilingCategory, &[&str])] = &[
    (
        FilingCategory::AnnualQuarterly,
        &["10-K", "10-Q", "8-K", "10-K/A", "10-Q/A", "20-F", "6-K"],
    ),
    // Ahead of insider forms so "424B5" is not taken for a Form 4.
    (
        FilingCategory::Registration,
        &[
            "S-1", "S-3", "S-8", "424B", "424B2", "424B3", "424B4", "424B5", "POS Is", "FWP",
        ],
    ),
    (FilingCategory::InsiderTrading, &["3", "4", "5"]),
    (
        FilingCategory::BeneficialOwnership,
        &["SC 13G", "SC 13D", "13F-HR", "SC 13G/A", "SC 13D/A"],
    ),
    (FilingCategory::Proxy, &["DEF 14A", "DEFA14A", "PRE 14A"]),
];

impl FilingCategory {
    /// Prefix match so amendments ("S-3/A") land with their base form.
    pub fn of(form: &str) -> FilingCategory {
        CATEGORY_PREFIXES
            .iter()
            .find(|(_, prefixes)| prefixes.iter().any(|p| form.starts_with(p)))
            .map(|(category, _)| *category)
            .unwrap_or(FilingCategory::Other)
    }

    pub fn display_order() -> impl Iterator<Item = FilingCategory> {
        FilingCategory::iter()
    }
}

impl fmt::Display for FilingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilingCategory::AnnualQuarterly => "Annual & Quarterly Reports",
            FilingCategory::Registration => "Registration Statements",
            FilingCategory::Proxy => "Proxy Materials",
            FilingCategory::BeneficialOwnership => "Beneficial Ownership",
            FilingCategory::InsiderTrading => "Insider Trading",
            FilingCategory::Other => "Other",
        };
        write!(f, "{}", name)
    }
}
