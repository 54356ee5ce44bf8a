use std::sync::Arc;
use tokio::sync::OnceCell;

use super::error::{ExtractError, ExtractResult};
use super::types::{DilutionReport, FinancialFact};
use crate::edgar::filing::{FilingRecord, SubmissionIndex};
use crate::edgar::parsing::NormalizedText;
use crate::edgar::tickers::Cik;
use crate::edgar::xbrl::CompanyFacts;
use crate::extract::shares::SHARE_COUNT_FORMS;
use crate::extract::shelf::{shelf_capacity, SHELF_FORM};
use crate::extract::{
    extract_public_float, extract_shelf_float, merge_float, share_count_from_facts,
    share_count_from_filing,
};
use crate::fetch::{DocumentCache, FilingSource};
use crate::policy::evaluate_dilution_policy;

/// Runs the extractors for an entity against a `FilingSource`.
///
/// Each public call is one extraction request: the submissions index,
/// company facts and documents are fetched at most once per request and
/// dropped afterwards.
pub struct DilutionAnalyzer<S> {
    source: S,
}

impl<S: FilingSource> DilutionAnalyzer<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn request(&self, cik: Cik) -> Request<'_, S> {
        Request::new(&self.source, cik)
    }

    pub async fn share_count(&self, cik: Cik) -> ExtractResult<FinancialFact> {
        self.request(cik).share_count().await
    }

    pub async fn public_float(&self, cik: Cik) -> ExtractResult<FinancialFact> {
        self.request(cik).public_float().await
    }

    pub async fn shelf_float(&self, cik: Cik) -> ExtractResult<FinancialFact> {
        self.request(cik).shelf().await.float
    }

    /// Shelf float when the latest registration states one, otherwise the
    /// structured public float.
    pub async fn effective_float(&self, cik: Cik) -> ExtractResult<FinancialFact> {
        let request = self.request(cik);
        let (shelf, public) = tokio::join!(request.shelf(), request.public_float());
        merge_float(shelf.float, public)
    }

    /// Everything at once. Fails only when the submissions index itself is
    /// unavailable; individual facts that cannot be found are left empty.
    pub async fn report(&self, cik: Cik) -> ExtractResult<DilutionReport> {
        Self::build_report(&self.request(cik)).await
    }

    /// Like [`report`](Self::report), also handing back the submissions index
    /// the report was built from.
    pub async fn report_with_index(
        &self,
        cik: Cik,
    ) -> ExtractResult<(DilutionReport, SubmissionIndex)> {
        let request = self.request(cik);
        let report = Self::build_report(&request).await?;
        let index = request
            .index
            .into_inner()
            .ok_or_else(|| ExtractError::upstream(format!("submissions for CIK {}", cik)))??;
        Ok((report, index))
    }

    async fn build_report(request: &Request<'_, S>) -> ExtractResult<DilutionReport> {
        let index = request.index().await?;

        let (shares, public, shelf) = tokio::join!(
            request.share_count(),
            request.public_float(),
            request.shelf()
        );

        log::debug!(
            "CIK {}: fetched {} document(s) for report",
            request.cik,
            request.documents.len()
        );

        let float = merge_float(shelf.float.clone(), public);
        let verdict = float.as_ref().ok().map(|f| evaluate_dilution_policy(f.value));

        Ok(DilutionReport {
            cik: request.cik.0,
            name: index.name.clone(),
            shares_outstanding: shares.ok(),
            public_float: float.ok(),
            shelf: shelf.float.ok(),
            shelf_capacity: shelf.capacity,
            verdict,
        })
    }
}

struct ShelfOutcome {
    float: ExtractResult<FinancialFact>,
    capacity: Option<u64>,
}

struct Request<'a, S: ?Sized> {
    source: &'a S,
    cik: Cik,
    index: OnceCell<ExtractResult<SubmissionIndex>>,
    facts: OnceCell<ExtractResult<CompanyFacts>>,
    documents: DocumentCache,
}

impl<'a, S: FilingSource + ?Sized> Request<'a, S> {
    fn new(source: &'a S, cik: Cik) -> Self {
        Self {
            source,
            cik,
            index: OnceCell::new(),
            facts: OnceCell::new(),
            documents: DocumentCache::new(),
        }
    }

    async fn index(&self) -> ExtractResult<&SubmissionIndex> {
        self.index
            .get_or_init(|| async {
                self.source.submissions(self.cik).await.map_err(|e| {
                    log::warn!("Submissions for CIK {} unavailable: {:#}", self.cik, e);
                    ExtractError::upstream(e)
                })
            })
            .await
            .as_ref()
            .map_err(Clone::clone)
    }

    async fn facts(&self) -> ExtractResult<&CompanyFacts> {
        self.facts
            .get_or_init(|| async {
                self.source.company_facts(self.cik).await.map_err(|e| {
                    log::warn!("Company facts for CIK {} unavailable: {:#}", self.cik, e);
                    ExtractError::upstream(e)
                })
            })
            .await
            .as_ref()
            .map_err(Clone::clone)
    }

    /// A document that cannot be fetched is treated as absent.
    async fn text(&self, filing: &FilingRecord) -> Option<Arc<NormalizedText>> {
        match self.documents.get_or_fetch(self.source, self.cik, filing).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!(
                    "Document {} of {} unavailable: {:#}",
                    filing.primary_document,
                    filing.accession_number,
                    e
                );
                None
            }
        }
    }

    /// Company facts are only fetched when the cover page gives no count.
    async fn share_count(&self) -> ExtractResult<FinancialFact> {
        let index = self.index().await;
        let filing = index
            .as_ref()
            .ok()
            .copied()
            .and_then(|index| index.latest_filing(SHARE_COUNT_FORMS).ok());
        if let Some(filing) = filing {
            if let Some(text) = self.text(filing).await {
                if let Some(fact) = share_count_from_filing(filing, &text) {
                    return Ok(fact);
                }
            }
        }

        let facts = self.facts().await;
        match (facts.and_then(share_count_from_facts), index) {
            (Ok(fact), _) => Ok(fact),
            (Err(_), Err(e)) => Err(e),
            (Err(e), Ok(_)) => Err(e),
        }
    }

    async fn public_float(&self) -> ExtractResult<FinancialFact> {
        extract_public_float(Some(self.facts().await?))
    }

    async fn shelf(&self) -> ShelfOutcome {
        let filing = match self.index().await.and_then(|index| index.latest_filing(&[SHELF_FORM])) {
            Ok(filing) => filing,
            Err(e) => {
                return ShelfOutcome {
                    float: Err(e),
                    capacity: None,
                }
            }
        };

        let Some(text) = self.text(filing).await else {
            return ShelfOutcome {
                float: Err(ExtractError::not_found(format!(
                    "document {} of {}",
                    filing.primary_document, filing.accession_number
                ))),
                capacity: None,
            };
        };

        ShelfOutcome {
            float: extract_shelf_float(filing, &text),
            capacity: shelf_capacity(&text),
        }
    }
}
