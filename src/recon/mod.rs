pub mod confidence;
pub mod matcher;
pub mod resolve;

pub use confidence::AggregateConfidence;
pub use matcher::{ComparisonRecord, MatchPartition, DISCREPANCY_TOLERANCE_PCT};
pub use resolve::{ResolvedConcept, Source};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reconciled view of one statement for one company.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReconciledReport {
    pub company: String,
    pub statements: BTreeMap<String, ResolvedConcept>,
    pub confidence: AggregateConfidence,
    pub discrepancies: Vec<ComparisonRecord>,
}

/// Full report with the optional narrative layer on top. `insights` is
/// `None` whenever the narrative call failed; that failure never fails
/// the report.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FullReport {
    pub ticker: String,
    pub company_name: String,
    pub data_quality: AggregateConfidence,
    pub financials: BTreeMap<String, ResolvedConcept>,
    pub insights: Option<String>,
    pub discrepancies: Vec<ComparisonRecord>,
    pub timestamp: DateTime<Utc>,
}
