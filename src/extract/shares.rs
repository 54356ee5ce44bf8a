use once_cell::sync::Lazy;
use regex::Regex;

use super::cascade::{Cascade, CascadeOutcome, Matcher};
use super::parse_positive;
use crate::core::error::{ExtractError, ExtractResult};
use crate::core::types::{FactSource, FinancialFact};
use crate::edgar::filing::FilingRecord;
use crate::edgar::parsing::NormalizedText;
use crate::edgar::report::ReportType;
use crate::edgar::xbrl::{CompanyFacts, SHARES_OUTSTANDING};

/// Periodic reports whose cover page states the share count, in priority order.
pub const SHARE_COUNT_FORMS: &[ReportType] = &[ReportType::Form10Q, ReportType::Form10K];

// Cover-page boilerplate of filers with more than one class of stock.
static MULTI_CLASS_TRIGGER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)outstanding\s+of\s+each\s+of\s+the\s+issuer(?:'|’|&#8217;|&#x2019;|&rsquo;)?s\s+classes")
        .expect("valid multi-class trigger regex")
});

// Same numeral form as the as-of matcher, so a tag-split group still parses.
static SHARES_OUTSTANDING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,3}(?:,\s?\d{3})+|\d+)\s+shares\s+outstanding")
        .expect("valid shares outstanding regex")
});

static TWO_CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)number\s+of\s+.{0,300}?shares\s+outstanding\s+as\s+of\s+.{0,100}?\s+was\s+(\d[\d,]*)\s+and\s+(\d[\d,]*)",
    )
    .expect("valid two-class regex")
});

static REGISTRANT_HAD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)registrant\s+had\s+(\d[\d,]*)\s+shares").expect("valid registrant-had regex")
});

// The numeral must start with a digit and may carry one stray space after a
// thousands separator ("14,000, 000"), left behind when a tag split the number.
static AS_OF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,3}(?:,\s?\d{3})+|\d+)\s+shares\s+of\s+.{0,300}?outstanding\s+as\s+of")
        .expect("valid as-of regex")
});

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)outstanding.{0,150}?:.{0,150}?\b(\d{1,3}(?:,\d{3})+|\d+)\s+shares")
        .expect("valid header regex")
});

fn is_multi_class(text: &str) -> bool {
    MULTI_CLASS_TRIGGER.is_match(text)
}

/// Sums every "N shares outstanding" in the document. This does not check
/// that the occurrences come from the cover-page table, so unrelated
/// mentions elsewhere in the text are added too.
fn multi_class_total(text: &str) -> Option<f64> {
    let values: Vec<f64> = SHARES_OUTSTANDING_RE
        .captures_iter(text)
        .filter_map(|caps| parse_positive(&caps[1]))
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum())
}

fn two_class_as_of(text: &str) -> Option<f64> {
    let caps = TWO_CLASS_RE.captures(text)?;
    Some(parse_positive(&caps[1])? + parse_positive(&caps[2])?)
}

fn registrant_had(text: &str) -> Option<f64> {
    let caps = REGISTRANT_HAD_RE.captures(text)?;
    parse_positive(&caps[1])
}

fn single_as_of(text: &str) -> Option<f64> {
    let caps = AS_OF_RE.captures(text)?;
    parse_positive(&caps[1])
}

fn header_table(text: &str) -> Option<f64> {
    let caps = HEADER_RE.captures(text)?;
    parse_positive(&caps[1])
}

pub const SHARE_COUNT_CASCADE: Cascade<f64> = Cascade {
    name: "share count",
    matchers: &[
        Matcher {
            name: "multi-class aggregate",
            applies: Some(is_multi_class),
            extract: multi_class_total,
        },
        Matcher {
            name: "two-class as-of",
            applies: None,
            extract: two_class_as_of,
        },
        Matcher {
            name: "registrant had",
            applies: None,
            extract: registrant_had,
        },
        Matcher {
            name: "as-of single count",
            applies: None,
            extract: single_as_of,
        },
        Matcher {
            name: "header/table",
            applies: None,
            extract: header_table,
        },
    ],
};

/// Runs the text cascade alone; useful for inspecting which matcher fired.
pub fn share_count_from_text(text: &NormalizedText) -> CascadeOutcome<f64> {
    SHARE_COUNT_CASCADE.run(text)
}

/// Share count from the cover page of a periodic report. The filing date
/// becomes the as-of date.
pub fn share_count_from_filing(filing: &FilingRecord, text: &NormalizedText) -> Option<FinancialFact> {
    let fact = share_count_from_text(text).value().and_then(|value| {
        FinancialFact::new(
            value,
            filing.filing_date,
            FactSource::FilingText(filing.report_type.clone()),
        )
    });
    if fact.is_none() {
        log::debug!(
            "No share count in {} {}",
            filing.report_type,
            filing.accession_number
        );
    }
    fact
}

/// Latest structured share count, taken across every alias concept.
pub fn share_count_from_facts(facts: &CompanyFacts) -> ExtractResult<FinancialFact> {
    facts
        .latest_of(SHARES_OUTSTANDING)
        .and_then(|entry| FinancialFact::new(entry.value, entry.period_end, FactSource::Xbrl))
        .ok_or_else(|| ExtractError::not_found("shares outstanding"))
}

/// Shares outstanding for one entity.
///
/// The cover page of the latest periodic report is tried first. Without a
/// report, or when no pattern matches, the latest structured entry is used.
pub fn extract_share_count(
    report: Option<(&FilingRecord, &NormalizedText)>,
    facts: Option<&CompanyFacts>,
) -> ExtractResult<FinancialFact> {
    if let Some(fact) = report.and_then(|(filing, text)| share_count_from_filing(filing, text)) {
        return Ok(fact);
    }
    let facts = facts.ok_or_else(|| ExtractError::not_found("shares outstanding"))?;
    share_count_from_facts(facts)
}
