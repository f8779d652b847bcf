use crate::ai::{prompt, CompletionRequest, CompletionService};
use crate::cache::TtlCache;
use crate::core::config::ReconcilerConfig;
use crate::error::ReconcileError;
use crate::extract::{self, types::StatementType, ExtractionResult};
use crate::facts::StructuredFacts;
use crate::recon::{confidence, matcher, resolve, FullReport, ReconciledReport};
use crate::table::ScrapedTable;
use crate::taxonomy::ConceptTaxonomy;
use chrono::Utc;
use std::sync::Arc;

/// Facade over the reconciliation pipeline. One instance per process;
/// cheap per request, suspending only on the completion calls. The
/// taxonomy is injected so callers (and tests) control its lifetime.
pub struct ReconcilerService {
    ai: Arc<dyn CompletionService>,
    taxonomy: Arc<ConceptTaxonomy>,
    extraction_cache: TtlCache<ExtractionResult>,
    report_cache: TtlCache<ReconciledReport>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl ReconcilerService {
    pub fn new(
        ai: Arc<dyn CompletionService>,
        taxonomy: Arc<ConceptTaxonomy>,
        config: &ReconcilerConfig,
    ) -> Self {
        ReconcilerService {
            ai,
            taxonomy,
            extraction_cache: TtlCache::new(),
            report_cache: TtlCache::new(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// Extracts a canonical schema from a scraped table via the
    /// completion service. Memoized per (company, statement type) with
    /// the fixed cache TTL; the cache is only written on success, so a
    /// failed call leaves no state behind.
    pub async fn analyze_table(
        &self,
        table: &ScrapedTable,
        company_label: &str,
        statement_type: StatementType,
    ) -> Result<ExtractionResult, ReconcileError> {
        if let Some(hit) = self.extraction_cache.get(company_label, statement_type) {
            log::debug!("extraction cache hit: {} {}", company_label, statement_type);
            return Ok(hit);
        }
        log::debug!("extraction cache miss: {} {}", company_label, statement_type);

        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt::extraction_prompt(table, company_label, statement_type),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response = self.ai.complete(request).await?;
        let extraction = extract::validate_extraction(&response)?;

        for warning in &extraction.warnings {
            log::warn!("{}: {}", company_label, warning);
        }
        for item in &extraction.line_items {
            self.taxonomy
                .learn(&item.standard_category, &item.original_label);
        }

        self.extraction_cache
            .insert(company_label, statement_type, extraction.clone());
        Ok(extraction)
    }

    /// Full reconciliation of one statement: extract (cached), partition
    /// against the structured feed, resolve one value per concept, and
    /// score coverage. The finished report is itself memoized per
    /// (company, statement type) with the fixed TTL and written only on
    /// success.
    pub async fn reconcile(
        &self,
        table: &ScrapedTable,
        facts: &StructuredFacts,
        company_label: &str,
        statement_type: StatementType,
    ) -> Result<ReconciledReport, ReconcileError> {
        if let Some(hit) = self.report_cache.get(company_label, statement_type) {
            log::debug!("report cache hit: {} {}", company_label, statement_type);
            return Ok(hit);
        }

        let extraction = self
            .analyze_table(table, company_label, statement_type)
            .await?;

        let partition = matcher::match_line_items(&extraction.line_items, facts);
        let confidence = confidence::aggregate(&partition);
        let statements = resolve::resolve(&partition);
        log::debug!(
            "{}: {} matches, {} discrepancies, {} ai-only, overall {:.2}",
            company_label,
            confidence.matches,
            confidence.discrepancies,
            confidence.ai_only,
            confidence.overall
        );

        let report = ReconciledReport {
            company: company_label.to_string(),
            statements,
            confidence,
            discrepancies: partition.discrepancies,
        };
        self.report_cache
            .insert(company_label, statement_type, report.clone());
        Ok(report)
    }

    /// Reconciles the income statement and layers a narrative insight on
    /// top. The insight call is the only step allowed to fail partially:
    /// its errors are logged and degrade to `insights: None`.
    pub async fn generate_report(
        &self,
        ticker: &str,
        table: &ScrapedTable,
        facts: &StructuredFacts,
    ) -> Result<FullReport, ReconcileError> {
        let report = self
            .reconcile(table, facts, ticker, StatementType::Income)
            .await?;

        let insights = match self.generate_insights(&report).await {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("insight generation failed for {}, continuing without: {}", ticker, e);
                None
            }
        };

        Ok(FullReport {
            ticker: ticker.to_string(),
            company_name: report.company,
            data_quality: report.confidence,
            financials: report.statements,
            insights,
            discrepancies: report.discrepancies,
            timestamp: Utc::now(),
        })
    }

    async fn generate_insights(&self, report: &ReconciledReport) -> Result<String, ReconcileError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            prompt: prompt::insight_prompt(report),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let text = self.ai.complete(request).await?;
        Ok(text.trim().to_string())
    }
}
