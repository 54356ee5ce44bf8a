use crate::core::error::{ExtractError, ExtractResult};
use crate::core::types::{FactSource, FinancialFact};
use crate::edgar::xbrl::{CompanyFacts, PUBLIC_FLOAT};

/// Latest `dei:EntityPublicFloat` in USD. There is no text fallback for
/// this fact.
pub fn extract_public_float(facts: Option<&CompanyFacts>) -> ExtractResult<FinancialFact> {
    facts
        .and_then(|facts| facts.series(PUBLIC_FLOAT))
        .and_then(|series| series.latest())
        .and_then(|entry| FinancialFact::new(entry.value, entry.period_end, FactSource::Xbrl))
        .ok_or_else(|| ExtractError::not_found("public float"))
}

/// Picks the float used for the dilution check.
///
/// A figure from the latest shelf registration wins over the structured
/// one. When neither is available the result is `UpstreamUnavailable` if
/// either side failed for that reason, since a retry might succeed.
pub fn merge_float(
    shelf: ExtractResult<FinancialFact>,
    public: ExtractResult<FinancialFact>,
) -> ExtractResult<FinancialFact> {
    match (shelf, public) {
        (Ok(fact), _) => Ok(fact),
        (Err(_), Ok(fact)) => Ok(fact),
        (Err(e @ ExtractError::UpstreamUnavailable(_)), Err(_))
        | (Err(_), Err(e @ ExtractError::UpstreamUnavailable(_))) => Err(e),
        (Err(_), Err(e)) => Err(e),
    }
}
