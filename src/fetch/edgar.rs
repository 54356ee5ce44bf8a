use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mime::{APPLICATION_JSON, TEXT_HTML};
use reqwest::Client;
use url::Url;

use super::FilingSource;
use crate::core::config::EdgarConfig;
use crate::edgar::filing::{AccessionNumber, CompanyFilings, SubmissionIndex, EDGAR_ARCHIVES_URL, EDGAR_DATA_URL};
use crate::edgar::tickers::{Cik, Ticker, TickerMap, TICKER_URL};
use crate::edgar::xbrl::CompanyFacts;
use crate::utils::dirs::ensure_edgar_dirs;
use crate::utils::http::{fetch_and_save, fetch_or_cached};
use crate::utils::rate_limit::RateLimiter;

/// `FilingSource` backed by the public SEC endpoints, with JSON payloads
/// mirrored under the configured data directory.
pub struct EdgarClient {
    client: Client,
    config: EdgarConfig,
    rate_limiter: RateLimiter,
}

impl EdgarClient {
    pub fn new(config: EdgarConfig) -> Result<Self> {
        ensure_edgar_dirs(&config)?;
        let client = Client::builder().gzip(true).build()?;
        let rate_limiter = RateLimiter::new(config.max_concurrent);
        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    pub fn config(&self) -> &EdgarConfig {
        &self.config
    }

    pub async fn tickers(&self) -> Result<TickerMap> {
        let url = Url::parse(TICKER_URL)?;
        let path = self.config.data_dir.join("edgar").join("tickers.json");
        let content = fetch_or_cached(
            &self.client,
            &url,
            &path,
            &self.config.user_agent,
            APPLICATION_JSON,
            &self.rate_limiter,
        )
        .await?;
        TickerMap::from_json(&content)
    }

    /// Accepts either a numeric CIK or a ticker symbol.
    pub async fn resolve_cik(&self, query: &str) -> Result<Cik> {
        if let Ok(cik) = query.parse::<Cik>() {
            return Ok(cik);
        }
        let ticker = Ticker::new(query.to_string())?;
        let tickers = self.tickers().await?;
        tickers
            .cik(&ticker)
            .ok_or_else(|| anyhow!("Ticker not found: {}", ticker))
    }
}

#[async_trait]
impl FilingSource for EdgarClient {
    async fn submissions(&self, cik: Cik) -> Result<SubmissionIndex> {
        let url = Url::parse(&format!(
            "{}/submissions/CIK{}.json",
            EDGAR_DATA_URL,
            cik.padded()
        ))?;
        let path = self
            .config
            .filings_dir()
            .join(format!("CIK{}.json", cik.padded()));

        log::info!("Fetching company filings for CIK {}", cik);
        let content = fetch_or_cached(
            &self.client,
            &url,
            &path,
            &self.config.user_agent,
            APPLICATION_JSON,
            &self.rate_limiter,
        )
        .await?;

        SubmissionIndex::try_from(CompanyFilings::from_json(&content)?)
    }

    async fn document(
        &self,
        cik: Cik,
        accession: &AccessionNumber,
        filename: &str,
    ) -> Result<String> {
        let url = Url::parse(&format!(
            "{}/{}/{}/{}",
            EDGAR_ARCHIVES_URL,
            cik,
            accession.as_path_segment(),
            filename
        ))?;
        let path = self
            .config
            .documents_dir()
            .join(cik.to_string())
            .join(accession.as_path_segment())
            .join(filename);

        // Filed documents never change, so a local copy is authoritative.
        if path.exists() {
            log::debug!("Using cached document {:?}", path);
            return Ok(std::fs::read_to_string(&path)?);
        }

        log::info!("Fetching filing document {}", url);
        fetch_and_save(
            &self.client,
            &url,
            &path,
            &self.config.user_agent,
            TEXT_HTML,
            &self.rate_limiter,
        )
        .await
    }

    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        let url = Url::parse(&format!(
            "{}/api/xbrl/companyfacts/CIK{}.json",
            EDGAR_DATA_URL,
            cik.padded()
        ))?;
        let path = self
            .config
            .facts_dir()
            .join(format!("CIK{}.json", cik.padded()));

        log::info!("Fetching company facts for CIK {}", cik);
        let content = fetch_or_cached(
            &self.client,
            &url,
            &path,
            &self.config.user_agent,
            APPLICATION_JSON,
            &self.rate_limiter,
        )
        .await?;

        CompanyFacts::from_json(&content)
    }
}
