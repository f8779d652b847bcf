use crate::extract::types::{LineItem, Unit};
use crate::facts::StructuredFacts;
use serde::{Deserialize, Serialize};

/// Percent difference below which two sourced values agree. Strict `<`.
pub const DISCREPANCY_TOLERANCE_PCT: f64 = 5.0;

/// Canonical category -> candidate US-GAAP concept names. Candidate
/// order within a slice is the declared lookup order; the first
/// candidate carrying a quarterly value decides the item.
const CONCEPT_CANDIDATES: &[(&str, &[&str])] = &[
    (
        "Revenue",
        &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
        ],
    ),
    ("Cost of Revenue", &["CostOfRevenue", "CostOfGoodsAndServicesSold"]),
    ("Gross Profit", &["GrossProfit"]),
    ("Operating Expenses", &["OperatingExpenses", "CostsAndExpenses"]),
    ("Operating Income", &["OperatingIncomeLoss"]),
    ("Net Income", &["NetIncomeLoss", "ProfitLoss"]),
    (
        "Research and Development",
        &["ResearchAndDevelopmentExpense"],
    ),
    (
        "Selling General and Administrative",
        &["SellingGeneralAndAdministrativeExpense"],
    ),
    ("Income Tax Expense", &["IncomeTaxExpenseBenefit"]),
    ("Interest Expense", &["InterestExpense"]),
];

fn candidates_for(category: &str) -> Option<&'static [&'static str]> {
    CONCEPT_CANDIDATES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, candidates)| *candidates)
}

/// One AI-vs-XBRL comparison, both sides in millions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub category: String,
    /// The candidate concept that decided the comparison.
    pub concept: String,
    pub ai_value: f64,
    pub xbrl_value: f64,
    pub difference_percent: f64,
}

/// Three-way partition of the extraction's line items.
#[derive(Debug, Clone, Default)]
pub struct MatchPartition {
    pub matches: Vec<ComparisonRecord>,
    pub discrepancies: Vec<ComparisonRecord>,
    pub ai_only: Vec<LineItem>,
}

/// Converts a line item value to millions per its declared unit.
/// Unrecognized units were already collapsed to raw dollars upstream.
pub fn to_millions(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Dollars => value / 1_000_000.0,
        Unit::Thousands => value / 1_000.0,
        Unit::Millions => value,
        Unit::Billions => value * 1_000.0,
    }
}

/// `|ai - xbrl| / max(|ai|, |xbrl|) * 100`. The denominator is the
/// larger magnitude so signed values (net losses, negative operating
/// income) compare the same way positive ones do; both zero reads as
/// full agreement, a one-sided zero as full disagreement.
pub fn difference_percent(ai: f64, xbrl: f64) -> f64 {
    let denominator = ai.abs().max(xbrl.abs());
    if denominator == 0.0 {
        0.0
    } else {
        (ai - xbrl).abs() / denominator * 100.0
    }
}

/// Aligns extracted line items with the structured feed. Deterministic
/// by declaration: items in extraction order, candidates in table order,
/// first decisive candidate wins; items with no candidate value land in
/// `ai_only`.
pub fn match_line_items(items: &[LineItem], facts: &StructuredFacts) -> MatchPartition {
    let mut partition = MatchPartition::default();

    for item in items {
        let candidates = match candidates_for(&item.standard_category) {
            Some(candidates) => candidates,
            None => {
                partition.ai_only.push(item.clone());
                continue;
            }
        };

        let mut decided = false;
        for concept in candidates {
            let xbrl_raw = match facts.latest_value(concept) {
                Some(v) => v,
                None => continue,
            };

            let ai_value = to_millions(item.latest_value, item.unit);
            let xbrl_value = xbrl_raw / 1_000_000.0;
            let difference = difference_percent(ai_value, xbrl_value);
            log::debug!(
                "{} vs {}: ai {:.2}M, xbrl {:.2}M, diff {:.2}%",
                item.standard_category,
                concept,
                ai_value,
                xbrl_value,
                difference
            );

            let record = ComparisonRecord {
                category: item.standard_category.clone(),
                concept: (*concept).to_string(),
                ai_value,
                xbrl_value,
                difference_percent: difference,
            };
            if difference < DISCREPANCY_TOLERANCE_PCT {
                partition.matches.push(record);
            } else {
                partition.discrepancies.push(record);
            }
            decided = true;
            break;
        }

        if !decided {
            partition.ai_only.push(item.clone());
        }
    }

    partition
}
