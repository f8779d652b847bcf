use async_trait::async_trait;
use chrono::NaiveDate;
use reconcile::ai::{CompletionRequest, CompletionService};
use reconcile::extract::types::StatementType;
use reconcile::facts::{ConceptSeries, QuarterlyValue, StructuredFacts};
use reconcile::recon::Source;
use reconcile::table::ScrapedTable;
use reconcile::taxonomy::ConceptTaxonomy;
use reconcile::{ReconcileError, ReconcilerConfig, ReconcilerService};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use url::Url;

/// Canned completion service: answers every call with the same text and
/// counts invocations so cache behavior is observable.
struct MockCompletionService {
    response: String,
    calls: AtomicUsize,
    /// Calls past this index fail; usize::MAX means never fail.
    fail_after: usize,
}

impl MockCompletionService {
    fn new(response: &str) -> Self {
        MockCompletionService {
            response: response.to_string(),
            calls: AtomicUsize::new(0),
            fail_after: usize::MAX,
        }
    }

    fn failing_after(response: &str, fail_after: usize) -> Self {
        MockCompletionService {
            fail_after,
            ..Self::new(response)
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionService for MockCompletionService {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, ReconcileError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call >= self.fail_after {
            return Err(ReconcileError::MalformedExtraction(
                "mock endpoint down".into(),
            ));
        }
        Ok(self.response.clone())
    }
}

const EXTRACTION_JSON: &str = r#"{
    "periods": ["2024-Q4", "2024-Q3"],
    "lineItems": [
        {
            "originalLabel": "Total net sales",
            "standardCategory": "Revenue",
            "values": [1000, 900],
            "unit": "millions",
            "isNegative": false,
            "rowIndex": 0,
            "confidence": 0.95
        },
        {
            "originalLabel": "Deferred revenue haircut",
            "standardCategory": "Purchase Accounting Adjustment",
            "values": [12, 15],
            "unit": "millions",
            "rowIndex": 1,
            "confidence": 0.8
        }
    ],
    "metadata": {"currency": "USD", "statementType": "income"}
}"#;

fn wrapped_response() -> String {
    format!(
        "Here is the extraction you asked for:\n```json\n{}\n```\n",
        EXTRACTION_JSON
    )
}

fn test_config() -> ReconcilerConfig {
    ReconcilerConfig {
        completion_url: Url::parse("http://localhost:8001/generate").unwrap(),
        model: "gpt-oss-20b".to_string(),
        temperature: 0.2,
        max_tokens: 2048,
        user_agent: "software@example.com".to_string(),
    }
}

fn service_with(mock: Arc<MockCompletionService>) -> ReconcilerService {
    ReconcilerService::new(mock, Arc::new(ConceptTaxonomy::seeded()), &test_config())
}

fn sample_table() -> ScrapedTable {
    ScrapedTable {
        headers: vec!["Line item".into(), "2024-Q4".into(), "2024-Q3".into()],
        rows: vec![
            vec!["Total net sales".into(), "1,000".into(), "900".into()],
            vec!["Deferred revenue haircut".into(), "12".into(), "15".into()],
        ],
    }
}

fn facts_with_revenues(val: f64) -> StructuredFacts {
    let mut facts = StructuredFacts::default();
    facts.concepts.insert(
        "Revenues".to_string(),
        ConceptSeries {
            quarterly: vec![QuarterlyValue {
                val,
                end: NaiveDate::from_ymd_opt(2024, 12, 28).unwrap(),
            }],
        },
    );
    facts
}

#[tokio::test]
async fn matching_revenue_resolves_from_both_sources() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let service = service_with(mock.clone());
    let facts = facts_with_revenues(1_000_000_000.0);

    let report = service
        .reconcile(&sample_table(), &facts, "AAPL", StatementType::Income)
        .await
        .unwrap();

    let revenue = &report.statements["Revenue"];
    assert_eq!(revenue.value, 1000.0);
    assert_eq!(revenue.source, Source::Both);
    assert_eq!(revenue.confidence, 1.0);
    assert!(report.discrepancies.is_empty());

    // One match plus one AI-only item.
    assert_eq!(report.confidence.matches, 1);
    assert_eq!(report.confidence.ai_only, 1);
    assert!((report.confidence.overall - 0.9).abs() < 1e-12);
}

#[tokio::test]
async fn disagreeing_revenue_is_flagged_but_ai_preferred() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let service = service_with(mock.clone());
    let facts = facts_with_revenues(1_200_000_000.0);

    let report = service
        .reconcile(&sample_table(), &facts, "AAPL", StatementType::Income)
        .await
        .unwrap();

    let revenue = &report.statements["Revenue"];
    assert_eq!(revenue.value, 1000.0);
    assert_eq!(revenue.source, Source::AiDiscrepancy);
    assert_eq!(revenue.confidence, 0.7);
    assert_eq!(
        revenue.note.as_deref(),
        Some("16.67% difference with XBRL")
    );

    assert_eq!(report.discrepancies.len(), 1);
    assert_eq!(report.discrepancies[0].xbrl_value, 1200.0);
}

#[tokio::test]
async fn unknown_category_stays_ai_only_whatever_the_feed_says() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let service = service_with(mock.clone());
    let facts = facts_with_revenues(1_000_000_000.0);

    let report = service
        .reconcile(&sample_table(), &facts, "AAPL", StatementType::Income)
        .await
        .unwrap();

    let adjustment = &report.statements["Purchase Accounting Adjustment"];
    assert_eq!(adjustment.source, Source::Ai);
    assert_eq!(adjustment.value, 12.0);
    assert_eq!(adjustment.confidence, 0.8);
}

#[tokio::test]
async fn second_analysis_within_ttl_hits_the_cache() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let service = service_with(mock.clone());

    let first = service
        .analyze_table(&sample_table(), "AAPL", StatementType::Income)
        .await
        .unwrap();
    let second = service
        .analyze_table(&sample_table(), "AAPL", StatementType::Income)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.call_count(), 1);

    // A different statement type is a different key.
    service
        .analyze_table(&sample_table(), "AAPL", StatementType::CashFlow)
        .await
        .unwrap();
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn second_reconcile_within_ttl_returns_the_stored_report() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let service = service_with(mock.clone());

    let first = service
        .reconcile(
            &sample_table(),
            &facts_with_revenues(1_000_000_000.0),
            "AAPL",
            StatementType::Income,
        )
        .await
        .unwrap();
    assert_eq!(first.statements["Revenue"].source, Source::Both);

    // Even against a changed feed the memoized report comes back
    // untouched, and no further completion call is made.
    let second = service
        .reconcile(
            &sample_table(),
            &facts_with_revenues(1_200_000_000.0),
            "AAPL",
            StatementType::Income,
        )
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(mock.call_count(), 1);

    // A different statement type is a fresh reconciliation.
    service
        .reconcile(
            &sample_table(),
            &facts_with_revenues(1_000_000_000.0),
            "AAPL",
            StatementType::CashFlow,
        )
        .await
        .unwrap();
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn failed_reconcile_leaves_the_report_cache_cold() {
    let mock = Arc::new(MockCompletionService::new(
        "I'm sorry, I cannot parse that table.",
    ));
    let service = service_with(mock.clone());
    let facts = facts_with_revenues(1_000_000_000.0);

    let err = service
        .reconcile(&sample_table(), &facts, "AAPL", StatementType::Income)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::MalformedExtraction(_)));

    let _ = service
        .reconcile(&sample_table(), &facts, "AAPL", StatementType::Income)
        .await;
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn extraction_learns_label_variants() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let taxonomy = Arc::new(ConceptTaxonomy::seeded());
    let service = ReconcilerService::new(mock, taxonomy.clone(), &test_config());

    service
        .analyze_table(&sample_table(), "AAPL", StatementType::Income)
        .await
        .unwrap();

    assert!(taxonomy.variants("revenue").contains("total net sales"));
    assert!(taxonomy
        .variants("purchase accounting adjustment")
        .contains("deferred revenue haircut"));
}

#[tokio::test]
async fn garbage_response_is_a_malformed_extraction() {
    let mock = Arc::new(MockCompletionService::new(
        "I'm sorry, I cannot parse that table.",
    ));
    let service = service_with(mock.clone());

    let err = service
        .analyze_table(&sample_table(), "AAPL", StatementType::Income)
        .await
        .unwrap_err();
    assert!(matches!(err, ReconcileError::MalformedExtraction(_)));

    // Failures are not cached; the next call goes back to the service.
    let _ = service
        .analyze_table(&sample_table(), "AAPL", StatementType::Income)
        .await;
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn full_report_carries_insights() {
    let mock = Arc::new(MockCompletionService::new(&wrapped_response()));
    let service = service_with(mock.clone());
    let facts = facts_with_revenues(1_000_000_000.0);

    let report = service
        .generate_report("AAPL", &sample_table(), &facts)
        .await
        .unwrap();

    assert_eq!(report.ticker, "AAPL");
    // Mock answers the insight call with the same canned text.
    assert!(report.insights.is_some());
    assert_eq!(report.financials.len(), 2);
    assert_eq!(mock.call_count(), 2);
}

#[tokio::test]
async fn insight_failure_degrades_to_none() {
    let mock = Arc::new(MockCompletionService::failing_after(&wrapped_response(), 1));
    let service = service_with(mock.clone());
    let facts = facts_with_revenues(1_000_000_000.0);

    let report = service
        .generate_report("AAPL", &sample_table(), &facts)
        .await
        .unwrap();

    // Reconciliation succeeded, only the narrative layer degraded.
    assert!(report.insights.is_none());
    assert_eq!(report.financials["Revenue"].source, Source::Both);
    assert_eq!(report.data_quality.matches, 1);
}
