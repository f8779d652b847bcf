pub mod types;

pub use types::{ExtractionMetadata, ExtractionResult, LineItem, StatementType, Unit};

use crate::error::ReconcileError;
use crate::numeric;
use serde_json::Value;
use std::collections::HashSet;
use types::RawExtraction;

/// Parses and validates the free-form completion output into an
/// [`ExtractionResult`]. The first top-level JSON object substring is
/// located and parsed; everything around it (markdown fences, prose,
/// trailing chatter) is ignored. Fails with
/// [`ReconcileError::MalformedExtraction`] when no object is found, the
/// JSON is invalid, or `lineItems` is missing or not an array.
pub fn validate_extraction(response: &str) -> Result<ExtractionResult, ReconcileError> {
    let payload = locate_json_object(response).ok_or_else(|| {
        ReconcileError::MalformedExtraction("no JSON object found in completion output".into())
    })?;

    let value: Value = serde_json::from_str(payload)
        .map_err(|e| ReconcileError::MalformedExtraction(format!("invalid JSON: {}", e)))?;

    match value.get("lineItems") {
        Some(Value::Array(_)) => {}
        _ => {
            return Err(ReconcileError::MalformedExtraction(
                "`lineItems` missing or not an array".into(),
            ))
        }
    }

    let raw: RawExtraction = serde_json::from_value(value)
        .map_err(|e| ReconcileError::MalformedExtraction(format!("schema mismatch: {}", e)))?;

    Ok(finalize(raw))
}

/// Slice of `text` covering the first balanced top-level JSON object.
/// Brace matching skips JSON string literals and escapes.
fn locate_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + i + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalizes cell values and computes per-item derived fields. Items
/// are deduplicated by row index, first occurrence wins.
fn finalize(raw: RawExtraction) -> ExtractionResult {
    let mut warnings = Vec::new();
    let mut seen_rows = HashSet::new();
    let mut line_items = Vec::with_capacity(raw.line_items.len());

    for item in raw.line_items {
        if !seen_rows.insert(item.row_index) {
            warnings.push(format!(
                "duplicate row index {} ({:?}), keeping the first occurrence",
                item.row_index, item.original_label
            ));
            continue;
        }

        let mut values = Vec::with_capacity(item.values.len());
        for (period, cell) in item.values.iter().enumerate() {
            let (value, clean) = numeric::normalize_checked(cell);
            if !clean {
                warnings.push(format!(
                    "row {} period {}: {} did not parse as a number, coerced to 0",
                    item.row_index, period, cell
                ));
            }
            values.push(value);
        }

        let latest_value = values.first().copied().unwrap_or(0.0);
        let previous_value = values.get(1).copied().unwrap_or(0.0);
        let growth = if previous_value != 0.0 {
            (latest_value - previous_value) / previous_value.abs() * 100.0
        } else {
            0.0
        };

        line_items.push(LineItem {
            original_label: item.original_label,
            standard_category: item.standard_category,
            sub_category: item.sub_category,
            values,
            unit: item.unit,
            is_negative: item.is_negative,
            row_index: item.row_index,
            confidence: item.confidence,
            latest_value,
            previous_value,
            growth,
        });
    }

    ExtractionResult {
        periods: raw.periods,
        line_items,
        metadata: raw.metadata,
        warnings,
    }
}
