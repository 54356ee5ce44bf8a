use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub const TICKER_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// SEC Central Index Key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cik(pub u64);

impl Cik {
    /// Ten digits with leading zeros, as data.sec.gov expects.
    pub fn padded(&self) -> String {
        format!("{:0>10}", self.0)
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cik {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches("CIK");
        trimmed
            .parse::<u64>()
            .map(Cik)
            .map_err(|_| anyhow!("Invalid CIK: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(ticker: String) -> Result<Self> {
        let uppercase_ticker = ticker.trim().to_uppercase();
        if uppercase_ticker.is_empty() {
            return Err(anyhow!("Ticker cannot be empty"));
        }
        if !uppercase_ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(anyhow!(
                "Ticker must contain only alphanumeric characters, dots or hyphens: {}",
                ticker
            ));
        }
        Ok(Ticker(uppercase_ticker))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Deserialize)]
struct TickerEntry {
    cik_str: u64,
    ticker: String,
    title: String,
}

/// Ticker -> (CIK, company name), built from `company_tickers.json`.
#[derive(Debug, Clone, Default)]
pub struct TickerMap {
    ticker_to_cik: HashMap<String, (Cik, String)>,
}

impl TickerMap {
    /// The payload is an object keyed by row number:
    /// `{"0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."}, ...}`
    pub fn from_json(content: &str) -> Result<Self> {
        let rows: HashMap<String, TickerEntry> = serde_json::from_str(content)
            .map_err(|e| anyhow!("Failed to parse tickers JSON: {}", e))?;

        let mut ticker_to_cik = HashMap::with_capacity(rows.len());
        for entry in rows.into_values() {
            match Ticker::new(entry.ticker) {
                Ok(ticker) => {
                    ticker_to_cik.insert(ticker.0, (Cik(entry.cik_str), entry.title));
                }
                Err(e) => log::debug!("Skipping ticker row: {}", e),
            }
        }

        log::debug!("Loaded {} tickers", ticker_to_cik.len());
        Ok(Self { ticker_to_cik })
    }

    pub fn cik(&self, ticker: &Ticker) -> Option<Cik> {
        self.ticker_to_cik.get(ticker.as_str()).map(|(cik, _)| *cik)
    }

    pub fn name(&self, ticker: &Ticker) -> Option<&str> {
        self.ticker_to_cik
            .get(ticker.as_str())
            .map(|(_, name)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.ticker_to_cik.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticker_to_cik.is_empty()
    }
}
