use chrono::{Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use super::cascade::{Cascade, CascadeOutcome, Matcher};
use super::parse_positive;
use super::units::{apply_magnitude, Magnitude};
use crate::core::error::{ExtractError, ExtractResult};
use crate::core::types::{FactSource, FinancialFact};
use crate::edgar::filing::FilingRecord;
use crate::edgar::parsing::NormalizedText;
use crate::edgar::report::ReportType;

/// Registration form read for shelf float and capacity.
pub const SHELF_FORM: ReportType = ReportType::FormS3;

/// Assumed effectiveness window of a shelf. This is a display estimate, not
/// the registration's actual legal expiry.
pub const SHELF_LIFETIME_MONTHS: u32 = 36;

static SHELF_SIZE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)aggregate\s+offering\s+price.{0,300}?not\s+exceed\s+\$\s?(\d[\d,]*)")
        .expect("valid shelf size regex")
});

static COMPUTED_FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)based\s+(?:up)?on\s+(\d[\d,]*)\s+shares.{0,300}?price\s+of\s+\$\s?(\d[\d,]*(?:\.\d+)?)",
    )
    .expect("valid computed float regex")
});

static STATED_FLOAT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)aggregate\s+market\s+value\s+of.{0,400}?public\s+float.{0,400}?\$\s?(\d[\d,]*(?:\.\d+)?)\s*(million|billion)?",
    )
    .expect("valid stated float regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatBasis {
    /// Non-affiliate shares times the quoted price
    Computed,
    /// Aggregate value as written in the filing
    Stated,
}

fn computed_float(text: &str) -> Option<(f64, FloatBasis)> {
    let caps = COMPUTED_FLOAT_RE.captures(text)?;
    let shares = parse_positive(&caps[1])?;
    let price = parse_positive(&caps[2])?;
    let value = shares * price;
    value.is_finite().then_some((value, FloatBasis::Computed))
}

fn stated_float(text: &str) -> Option<(f64, FloatBasis)> {
    let caps = STATED_FLOAT_RE.captures(text)?;
    let magnitude = caps.get(2).and_then(|m| m.as_str().parse::<Magnitude>().ok());
    apply_magnitude(&caps[1], magnitude).map(|value| (value, FloatBasis::Stated))
}

/// The computed figure comes first: it is derived from the two inputs the
/// filer quotes and is unaffected by typos in the stated total.
pub const SHELF_FLOAT_CASCADE: Cascade<(f64, FloatBasis)> = Cascade {
    name: "shelf float",
    matchers: &[
        Matcher {
            name: "computed (shares x price)",
            applies: None,
            extract: computed_float,
        },
        Matcher {
            name: "stated aggregate market value",
            applies: None,
            extract: stated_float,
        },
    ],
};

pub fn shelf_float_from_text(text: &NormalizedText) -> CascadeOutcome<(f64, FloatBasis)> {
    SHELF_FLOAT_CASCADE.run(text)
}

/// Dollar ceiling of the offering ("aggregate offering price ... will not
/// exceed $X"), when the prospectus states one.
pub fn shelf_capacity(text: &NormalizedText) -> Option<u64> {
    let caps = SHELF_SIZE_RE.captures(text)?;
    let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse::<u64>().ok().filter(|v| *v > 0)
}

pub fn shelf_expiration(filing_date: NaiveDate) -> Option<NaiveDate> {
    filing_date.checked_add_months(Months::new(SHELF_LIFETIME_MONTHS))
}

/// Public float as disclosed in a shelf registration statement.
///
/// The fact is dated with the filing date and carries the estimated
/// expiration and, when found, the shelf's dollar capacity. Capacity alone is
/// not enough: without a float figure the result is `NotFound`.
pub fn extract_shelf_float(
    filing: &FilingRecord,
    text: &NormalizedText,
) -> ExtractResult<FinancialFact> {
    let (value, basis) = shelf_float_from_text(text).value().ok_or_else(|| {
        ExtractError::not_found(format!(
            "public float in {} {}",
            filing.report_type, filing.accession_number
        ))
    })?;

    let source = match basis {
        FloatBasis::Computed => FactSource::Computed,
        FloatBasis::Stated => FactSource::FilingText(filing.report_type.clone()),
    };

    let mut fact = FinancialFact::new(value, filing.filing_date, source)
        .ok_or_else(|| ExtractError::not_found("public float"))?
        .with_shelf_capacity(shelf_capacity(text));
    if let Some(expiration) = shelf_expiration(filing.filing_date) {
        fact = fact.with_expiration(expiration);
    }
    Ok(fact)
}
