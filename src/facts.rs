use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One observed quarterly value for a concept, raw dollars.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuarterlyValue {
    pub val: f64,
    pub end: NaiveDate,
}

/// Quarterly series for a single concept, ordered most-recent-first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConceptSeries {
    #[serde(default)]
    pub quarterly: Vec<QuarterlyValue>,
}

impl ConceptSeries {
    pub fn latest(&self) -> Option<&QuarterlyValue> {
        self.quarterly.first()
    }
}

/// Read-only XBRL-derived feed: US-GAAP concept name -> quarterly series.
/// The reconciler only ever reads the most recent quarterly value of a
/// concept; the rest of the series rides along for provenance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StructuredFacts {
    pub concepts: HashMap<String, ConceptSeries>,
}

impl StructuredFacts {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Most recent quarterly value for `concept`, raw dollars.
    pub fn latest_value(&self, concept: &str) -> Option<f64> {
        self.concepts
            .get(concept)
            .and_then(|series| series.latest())
            .map(|quarter| quarter.val)
    }
}
