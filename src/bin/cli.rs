use anyhow::Result;
use colored::*;
use reconcile::ai::HttpCompletionClient;
use reconcile::extract::types::StatementType;
use reconcile::facts::StructuredFacts;
use reconcile::recon::{FullReport, ReconciledReport, Source};
use reconcile::table::ScrapedTable;
use reconcile::taxonomy::ConceptTaxonomy;
use reconcile::{ReconcilerConfig, ReconcilerService};
use std::path::PathBuf;
use std::sync::Arc;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "reconcile-cli",
    about = "Reconcile a scraped financial statement against XBRL facts"
)]
struct Opt {
    /// Company ticker symbol
    ticker: String,

    /// Path to the scraped statement table (JSON)
    #[structopt(long, parse(from_os_str))]
    table: PathBuf,

    /// Path to the structured XBRL facts (JSON)
    #[structopt(long, parse(from_os_str))]
    facts: PathBuf,

    /// Statement type to extract (income, balance_sheet, cash_flow);
    /// defaults to income
    #[structopt(long)]
    statement: Option<StatementType>,

    /// Also generate the narrative insight section; always works on the
    /// income statement, so it cannot be combined with --statement
    #[structopt(long, conflicts_with = "statement")]
    insights: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();
    let opt = Opt::from_args();

    let config = ReconcilerConfig::from_env()?;
    let table = ScrapedTable::from_file(&opt.table)?;
    let facts = StructuredFacts::from_file(&opt.facts)?;

    let ai = Arc::new(HttpCompletionClient::new(&config));
    let taxonomy = Arc::new(ConceptTaxonomy::seeded());
    let service = ReconcilerService::new(ai, taxonomy, &config);

    if opt.insights {
        let report = service
            .generate_report(&opt.ticker, &table, &facts)
            .await?;
        print_full_report(&report);
    } else {
        let statement = opt.statement.unwrap_or(StatementType::Income);
        let report = service
            .reconcile(&table, &facts, &opt.ticker, statement)
            .await?;
        print_reconciled(&report);
    }

    Ok(())
}

fn source_tag(source: Source) -> ColoredString {
    match source {
        Source::Both => "Both".green(),
        Source::Ai => "AI".cyan(),
        Source::AiDiscrepancy => "AI (Discrepancy)".yellow(),
    }
}

fn print_reconciled(report: &ReconciledReport) {
    println!("\n{}", report.company.bold());
    for (concept, resolved) in &report.statements {
        println!(
            "  {:<40} {:>16.2}  [{}] confidence {:.2}",
            concept,
            resolved.value,
            source_tag(resolved.source),
            resolved.confidence
        );
        if let Some(note) = &resolved.note {
            println!("  {:<40} {}", "", note.yellow());
        }
    }

    let c = &report.confidence;
    println!(
        "\n  data quality {:.2} ({} matched, {} discrepant, {} AI-only)",
        c.overall, c.matches, c.discrepancies, c.ai_only
    );

    if !report.discrepancies.is_empty() {
        println!("\n  {}", "Discrepancies".yellow().bold());
        for d in &report.discrepancies {
            println!(
                "  {:<40} AI {:.2}M vs XBRL {:.2}M ({:.2}%)",
                d.category, d.ai_value, d.xbrl_value, d.difference_percent
            );
        }
    }
}

fn print_full_report(report: &FullReport) {
    let reconciled = ReconciledReport {
        company: report.company_name.clone(),
        statements: report.financials.clone(),
        confidence: report.data_quality.clone(),
        discrepancies: report.discrepancies.clone(),
    };
    print_reconciled(&reconciled);

    println!(
        "\n  generated {}",
        report.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    match &report.insights {
        Some(insights) => println!("\n{}\n{}", "Insights".bold(), insights),
        None => println!("\n{}", "Insights unavailable".dimmed()),
    }
}
