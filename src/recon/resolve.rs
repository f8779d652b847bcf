use super::matcher::MatchPartition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Provenance of a resolved value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "AI")]
    Ai,
    Both,
    #[serde(rename = "AI (Discrepancy)")]
    AiDiscrepancy,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Ai => write!(f, "AI"),
            Source::Both => write!(f, "Both"),
            Source::AiDiscrepancy => write!(f, "AI (Discrepancy)"),
        }
    }
}

/// One authoritative value per concept, with provenance and confidence.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedConcept {
    pub value: f64,
    pub source: Source,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Collapses the partition into concept -> resolved value. Policy:
/// - AI-only: AI latest value in its original units, the item's own
///   confidence;
/// - matched: mean of the two millions-normalized values, confidence
///   `1 - diff/100`;
/// - discrepant: the AI value is deliberately preferred, fixed 0.7
///   confidence, difference noted.
///
/// Insertion order is AI-only, then matches, then discrepancies: when
/// the same concept appears more than once the last write wins, so a
/// cross-validated outcome always overrides an AI-only one.
pub fn resolve(partition: &MatchPartition) -> BTreeMap<String, ResolvedConcept> {
    let mut resolved = BTreeMap::new();

    for item in &partition.ai_only {
        resolved.insert(
            item.standard_category.clone(),
            ResolvedConcept {
                value: item.latest_value,
                source: Source::Ai,
                confidence: item.confidence,
                note: None,
            },
        );
    }

    for record in &partition.matches {
        resolved.insert(
            record.category.clone(),
            ResolvedConcept {
                value: (record.ai_value + record.xbrl_value) / 2.0,
                source: Source::Both,
                confidence: 1.0 - record.difference_percent / 100.0,
                note: None,
            },
        );
    }

    for record in &partition.discrepancies {
        resolved.insert(
            record.category.clone(),
            ResolvedConcept {
                value: record.ai_value,
                source: Source::AiDiscrepancy,
                confidence: 0.7,
                note: Some(format!(
                    "{:.2}% difference with XBRL",
                    record.difference_percent
                )),
            },
        );
    }

    resolved
}
