use super::matcher::MatchPartition;
use serde::{Deserialize, Serialize};

/// Weighted coverage score over the partition, plus the raw counts.
/// Not a statistical confidence interval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AggregateConfidence {
    pub overall: f64,
    pub matches: usize,
    pub discrepancies: usize,
    pub ai_only: usize,
    pub total_items: usize,
}

const MATCH_WEIGHT: f64 = 1.0;
const DISCREPANCY_WEIGHT: f64 = 0.5;
const AI_ONLY_WEIGHT: f64 = 0.8;

pub fn aggregate(partition: &MatchPartition) -> AggregateConfidence {
    let matches = partition.matches.len();
    let discrepancies = partition.discrepancies.len();
    let ai_only = partition.ai_only.len();
    let total_items = matches + discrepancies + ai_only;

    let overall = if total_items == 0 {
        0.0
    } else {
        (matches as f64 * MATCH_WEIGHT
            + discrepancies as f64 * DISCREPANCY_WEIGHT
            + ai_only as f64 * AI_ONLY_WEIGHT)
            / total_items as f64
    };

    AggregateConfidence {
        overall,
        matches,
        discrepancies,
        ai_only,
        total_items,
    }
}
