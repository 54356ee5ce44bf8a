use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use shelfwatch::core::types::FactSource;
use shelfwatch::edgar::filing::{AccessionNumber, FilingRecord, SubmissionIndex};
use shelfwatch::edgar::report::ReportType;
use shelfwatch::edgar::tickers::Cik;
use shelfwatch::edgar::xbrl::CompanyFacts;
use shelfwatch::fetch::{DocumentCache, FilingSource};
use shelfwatch::{DilutionAnalyzer, DilutionVerdict, ExtractError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

const CIK: Cik = Cik(1603652);

const TEN_Q: &str = r#"<html><body><p>As of May 9, 2025, there were
<b>1,541,</b><span>234</span> shares of the registrant's common stock outstanding as of that date.</p></body></html>"#;

const S_3: &str = r#"<html><body><p>As of July 2, 2025, the aggregate market value of our common stock held by our
non-affiliates, as calculated pursuant to the rules of the Securities and Exchange Commission, was approximately
$8,635,571 million, based upon 1,233,653 shares of our outstanding common stock held by non-affiliates at the per
share price of $7.00, the closing sale price of our common stock on the Nasdaq Capital Market on July 1, 2025.</p>
<p>The aggregate offering price of the securities we sell pursuant to this prospectus will not exceed $25,000,000.</p>
</body></html>"#;

const FACTS: &str = r#"{
    "cik": 1603652,
    "entityName": "Urgent.ly Inc.",
    "facts": {
        "dei": {
            "EntityCommonStockSharesOutstanding": {
                "units": {"shares": [{"end": "2025-03-31", "val": 1400000, "form": "10-Q"}]}
            },
            "EntityPublicFloat": {
                "units": {"USD": [{"end": "2024-06-30", "val": 120000000, "form": "10-K"}]}
            }
        }
    }
}"#;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn filing(form: &str, filed: &str, accession: &str, document: &str) -> FilingRecord {
    FilingRecord {
        report_type: form.parse().unwrap(),
        accession_number: accession.parse().unwrap(),
        filing_date: date(filed),
        primary_document: document.to_string(),
        primary_doc_description: form.to_string(),
        is_inline_xbrl: form != "S-3",
        items: String::new(),
    }
}

#[derive(Default)]
struct FakeSource {
    index: Option<SubmissionIndex>,
    documents: HashMap<String, String>,
    facts: Option<CompanyFacts>,
    submissions_calls: AtomicUsize,
    document_calls: AtomicUsize,
    facts_calls: AtomicUsize,
}

#[async_trait]
impl FilingSource for FakeSource {
    async fn submissions(&self, cik: Cik) -> Result<SubmissionIndex> {
        self.submissions_calls.fetch_add(1, Ordering::SeqCst);
        self.index
            .clone()
            .ok_or_else(|| anyhow!("submissions for {} unavailable", cik))
    }

    async fn document(
        &self,
        _cik: Cik,
        accession: &AccessionNumber,
        filename: &str,
    ) -> Result<String> {
        self.document_calls.fetch_add(1, Ordering::SeqCst);
        self.documents
            .get(&format!("{}/{}", accession, filename))
            .cloned()
            .ok_or_else(|| anyhow!("document {} unavailable", filename))
    }

    async fn company_facts(&self, cik: Cik) -> Result<CompanyFacts> {
        self.facts_calls.fetch_add(1, Ordering::SeqCst);
        self.facts
            .clone()
            .ok_or_else(|| anyhow!("facts for {} unavailable", cik))
    }
}

fn full_source() -> FakeSource {
    let filings = vec![
        filing("8-K", "2025-07-10", "0001603652-25-000050", "uly-8k.htm"),
        filing("S-3", "2025-07-03", "0001193125-25-160001", "d12345ds3.htm"),
        filing("10-Q", "2025-05-14", "0001603652-25-000042", "uly-20250331.htm"),
        filing("10-K", "2025-03-20", "0001603652-25-000017", "uly-20241231.htm"),
    ];
    let mut documents = HashMap::new();
    documents.insert(
        "0001193125-25-160001/d12345ds3.htm".to_string(),
        S_3.to_string(),
    );
    documents.insert(
        "0001603652-25-000042/uly-20250331.htm".to_string(),
        TEN_Q.to_string(),
    );
    FakeSource {
        index: Some(SubmissionIndex {
            cik: CIK,
            name: "Urgent.ly Inc.".to_string(),
            filings,
        }),
        documents,
        facts: Some(CompanyFacts::from_json(FACTS).unwrap()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_report_prefers_filing_text_and_shelf_float() {
    let analyzer = DilutionAnalyzer::new(full_source());
    let report = analyzer.report(CIK).await.unwrap();

    assert_eq!(report.name, "Urgent.ly Inc.");

    let shares = report.shares_outstanding.unwrap();
    assert_eq!(shares.value, 1_541_234.0);
    assert_eq!(shares.as_of, date("2025-05-14"));
    assert_eq!(shares.source, FactSource::FilingText(ReportType::Form10Q));

    let float = report.public_float.unwrap();
    assert_eq!(float.source, FactSource::Computed);
    assert!((float.value - 8_635_571.0).abs() < 1e-6);
    assert_eq!(float.expiration, Some(date("2028-07-03")));

    assert_eq!(report.shelf_capacity, Some(25_000_000));
    match report.verdict {
        Some(DilutionVerdict::Restricted { max_issuance_12m }) => {
            assert!((max_issuance_12m - 8_635_571.0 / 3.0).abs() < 1e-6)
        }
        other => panic!("expected restricted verdict, got {:?}", other),
    }

    // One fetch per distinct document.
    assert_eq!(analyzer.source().document_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_structured_float_used_without_shelf() {
    let mut source = full_source();
    if let Some(index) = source.index.as_mut() {
        index.filings.retain(|f| f.report_type != ReportType::FormS3);
    }
    let analyzer = DilutionAnalyzer::new(source);

    assert!(analyzer.shelf_float(CIK).await.unwrap_err().is_not_found());

    let float = analyzer.effective_float(CIK).await.unwrap();
    assert_eq!(float.source, FactSource::Xbrl);
    assert_eq!(float.value, 120_000_000.0);

    let report = analyzer.report(CIK).await.unwrap();
    assert_eq!(report.verdict, Some(DilutionVerdict::Unrestricted));
    assert!(report.shelf.is_none());
}

#[tokio::test]
async fn test_empty_index_falls_back_to_structured_shares() {
    let mut source = full_source();
    if let Some(index) = source.index.as_mut() {
        index.filings.clear();
    }
    let analyzer = DilutionAnalyzer::new(source);

    let shares = analyzer.share_count(CIK).await.unwrap();
    assert_eq!(shares.source, FactSource::Xbrl);
    assert_eq!(shares.value, 1_400_000.0);
    assert_eq!(shares.as_of, date("2025-03-31"));

    let shelf = analyzer.shelf_float(CIK).await.unwrap_err();
    assert!(shelf.is_not_found());
}

#[tokio::test]
async fn test_missing_document_is_not_a_fault() {
    let mut source = full_source();
    source.documents.clear();
    let analyzer = DilutionAnalyzer::new(source);

    let shares = analyzer.share_count(CIK).await.unwrap();
    assert_eq!(shares.source, FactSource::Xbrl);

    assert!(analyzer.shelf_float(CIK).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_unavailable_upstreams() {
    let analyzer = DilutionAnalyzer::new(FakeSource::default());

    assert!(matches!(
        analyzer.report(CIK).await,
        Err(ExtractError::UpstreamUnavailable(_))
    ));
    assert!(matches!(
        analyzer.share_count(CIK).await,
        Err(ExtractError::UpstreamUnavailable(_))
    ));
    assert!(matches!(
        analyzer.public_float(CIK).await,
        Err(ExtractError::UpstreamUnavailable(_))
    ));
}

#[tokio::test]
async fn test_share_count_survives_missing_index() {
    let mut source = full_source();
    source.index = None;
    let analyzer = DilutionAnalyzer::new(source);

    let shares = analyzer.share_count(CIK).await.unwrap();
    assert_eq!(shares.source, FactSource::Xbrl);
}

#[tokio::test]
async fn test_share_count_from_text_skips_company_facts() {
    let analyzer = DilutionAnalyzer::new(full_source());

    let shares = analyzer.share_count(CIK).await.unwrap();
    assert_eq!(shares.source, FactSource::FilingText(ReportType::Form10Q));
    assert_eq!(analyzer.source().facts_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_share_count_fetches_facts_only_for_fallback() {
    let mut source = full_source();
    source.documents.clear();
    let analyzer = DilutionAnalyzer::new(source);

    let shares = analyzer.share_count(CIK).await.unwrap();
    assert_eq!(shares.source, FactSource::Xbrl);
    assert_eq!(analyzer.source().facts_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_structured_shares_take_latest_alias() {
    let mut source = full_source();
    source.documents.clear();
    source.facts = Some(
        CompanyFacts::from_json(
            r#"{
                "cik": 1603652,
                "entityName": "Urgent.ly Inc.",
                "facts": {
                    "dei": {"EntityCommonStockSharesOutstanding": {"units": {"shares": [{"end": "2019-03-31", "val": 1000}]}}},
                    "us-gaap": {"CommonStockSharesOutstanding": {"units": {"shares": [{"end": "2024-12-31", "val": 5000}]}}}
                }
            }"#,
        )
        .unwrap(),
    );
    let analyzer = DilutionAnalyzer::new(source);

    let shares = analyzer.share_count(CIK).await.unwrap();
    assert_eq!(shares.value, 5000.0);
    assert_eq!(shares.as_of, date("2024-12-31"));
}

#[tokio::test]
async fn test_report_with_index_reuses_submissions() {
    let analyzer = DilutionAnalyzer::new(full_source());

    let (report, index) = analyzer.report_with_index(CIK).await.unwrap();
    assert_eq!(report.name, index.name);
    assert_eq!(index.filings.len(), 4);
    assert_eq!(analyzer.source().submissions_calls.load(Ordering::SeqCst), 1);
    assert_eq!(analyzer.source().facts_calls.load(Ordering::SeqCst), 1);

    let unavailable = DilutionAnalyzer::new(FakeSource::default());
    assert!(matches!(
        unavailable.report_with_index(CIK).await,
        Err(ExtractError::UpstreamUnavailable(_))
    ));
}

#[tokio::test]
async fn test_document_cache_fetches_once() {
    let source = full_source();
    let s3 = filing("S-3", "2025-07-03", "0001193125-25-160001", "d12345ds3.htm");
    let cache = DocumentCache::new();

    let (a, b) = tokio::join!(
        cache.get_or_fetch(&source, CIK, &s3),
        cache.get_or_fetch(&source, CIK, &s3)
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(source.document_calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}
