use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Statement the extraction prompt asks for. Doubles as part of the
/// result-cache key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatementType {
    Income,
    BalanceSheet,
    CashFlow,
}

/// Declared magnitude of a line item's values. Anything the extraction
/// emits that is not a recognized magnitude reads as raw dollars; that
/// includes non-string junk like a bare number, which must not abort
/// the whole extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Dollars,
    Thousands,
    Millions,
    Billions,
}

impl From<String> for Unit {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "thousands" => Unit::Thousands,
            "millions" => Unit::Millions,
            "billions" => Unit::Billions,
            _ => Unit::Dollars,
        }
    }
}

impl<'de> serde::Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Unit::from(s),
            _ => Unit::Dollars,
        })
    }
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Dollars
    }
}

fn default_confidence() -> f64 {
    0.9
}

/// Line item exactly as the completion emitted it, cells untyped.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawLineItem {
    pub original_label: String,
    pub standard_category: String,
    #[serde(default)]
    pub sub_category: Option<String>,
    #[serde(default)]
    pub values: Vec<Value>,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub is_negative: bool,
    #[serde(default)]
    pub row_index: i64,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawExtraction {
    #[serde(default)]
    pub periods: Vec<String>,
    pub line_items: Vec<RawLineItem>,
    #[serde(default)]
    pub metadata: ExtractionMetadata,
}

/// A validated line item. `values` are positionally aligned with the
/// parent result's `periods`, most recent first. `original_label` and
/// `standard_category` are carried verbatim from the extraction.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub original_label: String,
    pub standard_category: String,
    pub sub_category: Option<String>,
    pub values: Vec<f64>,
    pub unit: Unit,
    pub is_negative: bool,
    pub row_index: i64,
    pub confidence: f64,
    pub latest_value: f64,
    pub previous_value: f64,
    pub growth: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtractionMetadata {
    pub currency: Option<String>,
    pub statement_type: Option<String>,
    pub fiscal_year_end: Option<String>,
    pub notes_detected: bool,
}

/// Schema-validated output of one extraction call. `warnings` carries
/// every cell that silently coerced to zero, so data-quality problems
/// stay observable without failing the extraction.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub periods: Vec<String>,
    pub line_items: Vec<LineItem>,
    pub metadata: ExtractionMetadata,
    pub warnings: Vec<String>,
}
