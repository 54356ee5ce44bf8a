//! Collaborator contract for the data the extractors need, plus a
//! per-request document cache.

pub mod edgar;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

use crate::edgar::filing::{AccessionNumber, FilingRecord, SubmissionIndex};
use crate::edgar::parsing::NormalizedText;
use crate::edgar::tickers::Cik;
use crate::edgar::xbrl::CompanyFacts;

pub use edgar::EdgarClient;

/// Supplies submissions, documents and structured facts for an entity.
/// Timeouts and retries are the implementation's business.
#[async_trait]
pub trait FilingSource: Send + Sync {
    async fn submissions(&self, cik: Cik) -> Result<SubmissionIndex>;

    async fn document(
        &self,
        cik: Cik,
        accession: &AccessionNumber,
        filename: &str,
    ) -> Result<String>;

    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts>;
}

type DocumentKey = (AccessionNumber, String);

/// Normalized documents fetched during one extraction request, keyed by
/// accession number and file name. Concurrent requests for the same
/// document share a single fetch.
#[derive(Default)]
pub struct DocumentCache {
    entries: Mutex<HashMap<DocumentKey, Arc<OnceCell<Arc<NormalizedText>>>>>,
}

impl DocumentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_or_fetch<S: FilingSource + ?Sized>(
        &self,
        source: &S,
        cik: Cik,
        filing: &FilingRecord,
    ) -> Result<Arc<NormalizedText>> {
        let key = (
            filing.accession_number.clone(),
            filing.primary_document.clone(),
        );
        let cell = {
            let mut entries = self
                .entries
                .lock()
                .map_err(|_| anyhow!("Document cache lock poisoned"))?;
            entries.entry(key).or_default().clone()
        };

        let text = cell
            .get_or_try_init(|| async {
                let raw = source
                    .document(cik, &filing.accession_number, &filing.primary_document)
                    .await?;
                Ok::<_, anyhow::Error>(Arc::new(NormalizedText::new(&raw)))
            })
            .await?;
        Ok(Arc::clone(text))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
