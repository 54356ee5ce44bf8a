//! Fact extraction: ordered pattern cascades over normalized filing text,
//! with structured-fact fallbacks.

pub mod cascade;
pub mod float;
pub mod shares;
pub mod shelf;
pub mod units;

pub use cascade::{Attempt, Cascade, CascadeOutcome, Matcher};
pub use float::{extract_public_float, merge_float};
pub use shares::{extract_share_count, share_count_from_facts, share_count_from_filing};
pub use shelf::{extract_shelf_float, shelf_capacity, shelf_expiration};

/// Parses a captured numeral such as `"14,000, 000"` or `"2.48"`.
///
/// Thousands separators and stray whitespace are dropped. Anything that is
/// not a finite, strictly positive number is a non-match.
pub(crate) fn parse_positive(numeral: &str) -> Option<f64> {
    let cleaned: String = numeral
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let value = cleaned.parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}
