use crate::extract::types::StatementType;
use crate::recon::ReconciledReport;
use crate::table::ScrapedTable;

/// Prompt asking the model to map a scraped statement table onto the
/// canonical extraction schema. The schema block mirrors the wire
/// format the validator expects; wording beyond that is glue.
pub fn extraction_prompt(
    table: &ScrapedTable,
    company_label: &str,
    statement_type: StatementType,
) -> String {
    format!(
        r#"You are a financial data extraction engine. Below is the {statement_type} statement table scraped from a filing by {company_label}.

Map every row to a standard financial category and respond with exactly one JSON object of this shape, no commentary:

{{
  "periods": ["<most recent period first>", "..."],
  "lineItems": [
    {{
      "originalLabel": "<row label verbatim>",
      "standardCategory": "<e.g. Revenue, Cost of Revenue, Net Income>",
      "subCategory": null,
      "values": [<numbers, most recent first, aligned with periods>],
      "unit": "<dollars|thousands|millions|billions>",
      "isNegative": false,
      "rowIndex": <original row number>,
      "confidence": <0..1>
    }}
  ],
  "metadata": {{
    "currency": "<ISO code>",
    "statementType": "{statement_type}",
    "fiscalYearEnd": "<MM-DD or null>",
    "notesDetected": false
  }}
}}

Table:
{table}"#,
        statement_type = statement_type,
        company_label = company_label,
        table = table.to_text(),
    )
}

/// Prompt for the narrative layer over an already-reconciled report.
pub fn insight_prompt(report: &ReconciledReport) -> String {
    let mut lines = String::new();
    for (concept, resolved) in &report.statements {
        lines.push_str(&format!(
            "- {}: {:.2} (source {}, confidence {:.2})\n",
            concept, resolved.value, resolved.source, resolved.confidence
        ));
    }

    format!(
        r#"As a financial analyst, provide professional insight on the following reconciled figures for {company}:

{lines}
{discrepancy_count} line item(s) disagreed with the XBRL feed; overall data quality score {overall:.2}.

Analysis:"#,
        company = report.company,
        lines = lines,
        discrepancy_count = report.discrepancies.len(),
        overall = report.confidence.overall,
    )
}
