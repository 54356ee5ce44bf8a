//! Structured company facts, as served by
//! `data.sec.gov/api/xbrl/companyfacts/CIK##########.json`.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A concept addressed by taxonomy prefix and name, e.g. `dei:EntityPublicFloat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Concept {
    pub taxonomy: &'static str,
    pub name: &'static str,
    pub unit: &'static str,
}

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} [{}]", self.taxonomy, self.name, self.unit)
    }
}

/// Cover-page share count and its balance-sheet alias; on equal period ends
/// the earlier one wins.
pub const SHARES_OUTSTANDING: &[Concept] = &[
    Concept {
        taxonomy: "dei",
        name: "EntityCommonStockSharesOutstanding",
        unit: "shares",
    },
    Concept {
        taxonomy: "us-gaap",
        name: "CommonStockSharesOutstanding",
        unit: "shares",
    },
];

pub const PUBLIC_FLOAT: Concept = Concept {
    taxonomy: "dei",
    name: "EntityPublicFloat",
    unit: "USD",
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFactEntry {
    pub end: NaiveDate,
    pub val: f64,
    #[serde(default)]
    pub accn: Option<String>,
    #[serde(default)]
    pub fy: Option<i32>,
    #[serde(default)]
    pub fp: Option<String>,
    #[serde(default)]
    pub form: Option<String>,
    #[serde(default)]
    pub filed: Option<NaiveDate>,
    #[serde(default)]
    pub frame: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptFacts {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub units: HashMap<String, Vec<RawFactEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyFacts {
    #[serde(default)]
    pub cik: u64,
    #[serde(rename = "entityName", default)]
    pub entity_name: String,
    /// taxonomy -> concept name -> facts
    #[serde(default)]
    pub facts: HashMap<String, HashMap<String, ConceptFacts>>,
}

impl CompanyFacts {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| anyhow!("Failed to parse company facts JSON: {}", e))
    }

    /// The validated series for one concept/unit pair, if the filer reports it.
    pub fn series(&self, concept: Concept) -> Option<ConceptSeries> {
        let raw = self
            .facts
            .get(concept.taxonomy)?
            .get(concept.name)?
            .units
            .get(concept.unit)?;
        Some(ConceptSeries::from_raw(concept, raw))
    }

    /// Latest entry across several alias concepts, treated as one series.
    /// Ties on period end go to the earlier concept in `aliases`.
    pub fn latest_of(&self, aliases: &[Concept]) -> Option<SeriesEntry> {
        aliases
            .iter()
            .filter_map(|concept| self.series(*concept))
            .flat_map(|series| series.entries)
            .reduce(|best, entry| {
                if entry.period_end > best.period_end {
                    entry
                } else {
                    best
                }
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesEntry {
    pub value: f64,
    pub period_end: NaiveDate,
}

/// All reported values of one concept in one unit, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptSeries {
    pub concept: Concept,
    entries: Vec<SeriesEntry>,
}

impl ConceptSeries {
    pub fn from_raw(concept: Concept, raw: &[RawFactEntry]) -> Self {
        let entries = raw
            .iter()
            .filter(|e| {
                let valid = e.val.is_finite() && e.val >= 0.0;
                if !valid {
                    log::warn!("Dropping invalid {} value {} ({})", concept, e.val, e.end);
                }
                valid
            })
            .map(|e| SeriesEntry {
                value: e.val,
                period_end: e.end,
            })
            .collect();
        Self { concept, entries }
    }

    pub fn entries(&self) -> &[SeriesEntry] {
        &self.entries
    }

    /// Entry with the greatest period end; the first one seen wins a tie.
    pub fn latest(&self) -> Option<SeriesEntry> {
        self.entries.iter().copied().reduce(|best, entry| {
            if entry.period_end > best.period_end {
                entry
            } else {
                best
            }
        })
    }
}
