use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moolah_core::{format_dollar, InsightRequest};
use moolah_ingest::{detect_source, ingest_files, FieldMapping, SourceKind};
use moolah_stats::{aggregate_with, month_label, BreakdownProfile, Statistics};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;

mod config;

#[derive(Parser, Debug)]
#[command(name = "moolah", version, about = "Schema-free bank CSV spending analyzer")]
struct Cli {
    /// Config file (default: ~/.moolah/config.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ingest one or more CSV exports and print the derived statistics
    Analyze {
        /// CSV files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the full statistics bundle as JSON
        #[arg(long)]
        json: bool,

        /// Expanded category breakdown (top 6 instead of top 4)
        #[arg(long)]
        expanded: bool,
    },

    /// Show the detected source format and field mapping per file
    Inspect {
        /// CSV files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print the reports as JSON
        #[arg(long)]
        json: bool,
    },

    /// Emit the JSON payload handed to the external AI-insight consumer
    InsightPayload {
        /// CSV files to ingest
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    let synonyms = cfg.field_synonyms();

    match cli.command {
        Command::Analyze {
            files,
            json,
            expanded,
        } => {
            let outcome = ingest_files(&files, &synonyms)?;
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }

            let profile = if expanded || cfg.expanded_breakdown {
                BreakdownProfile::Expanded
            } else {
                BreakdownProfile::Default
            };
            let stats = aggregate_with(&outcome.transactions, profile);

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_summary(&stats, outcome.transactions.len());
            }
        }

        Command::Inspect { files, json } => {
            let mut reports = Vec::new();
            for path in &files {
                let report = inspect_file(path, &synonyms);
                match report {
                    Ok(r) => reports.push(r),
                    Err(e) => eprintln!("warning: {e:#}"),
                }
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for r in &reports {
                    print_inspect_report(r);
                }
            }
        }

        Command::InsightPayload { files } => {
            let outcome = ingest_files(&files, &synonyms)?;
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            // Ingestion succeeded, so the list is non-empty.
            if let Some(request) = InsightRequest::from_transactions(&outcome.transactions) {
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
        }
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct InspectReport {
    file: String,
    source: SourceKind,
    headers: Vec<String>,
    mapping: Option<FieldMapping>,
}

fn inspect_file(
    path: &PathBuf,
    synonyms: &moolah_ingest::FieldSynonyms,
) -> Result<InspectReport> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers: Vec<String> = rdr
        .headers()
        .with_context(|| format!("reading headers of {}", path.display()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    Ok(InspectReport {
        file: path.display().to_string(),
        source: detect_source(&headers),
        mapping: synonyms.detect(&headers),
        headers,
    })
}

fn print_inspect_report(report: &InspectReport) {
    println!("{}", report.file);
    println!("  source:  {}", report.source.label());
    println!("  headers: {}", report.headers.join(", "));
    match &report.mapping {
        Some(m) => {
            println!("  date:        {}", m.date_field);
            println!("  description: {}", m.description_field);
            if m.has_debit_credit_pair {
                println!(
                    "  amount:      debit/credit pair ({} / {})",
                    m.debit_field.as_deref().unwrap_or("?"),
                    m.credit_field.as_deref().unwrap_or("?")
                );
            } else if let Some(amount) = &m.amount_field {
                println!("  amount:      {amount}");
            }
            if let Some(category) = &m.category_field {
                println!("  category:    {category}");
            }
            if let Some(kind) = &m.transaction_type_field {
                println!("  type:        {kind}");
            }
        }
        None => println!("  mapping:     none (file would be rejected)"),
    }
    println!();
}

fn print_summary(stats: &Statistics, transaction_count: usize) {
    println!("Processed {transaction_count} transactions");
    if let Some(range) = &stats.date_range {
        println!("From {} to {}\n", range.start_date, range.end_date);
    }

    println!("Total spent:        {}", format_dollar(stats.total_spent));
    println!("Total income:       {}", format_dollar(stats.total_income));
    println!("Avg monthly spend:  {}", format_dollar(stats.avg_monthly_spend));
    println!("Avg daily spend:    {}", format_dollar(stats.avg_daily_spend));
    println!("Month-over-month:   {:.2}%", stats.month_over_month_change);
    println!("Year-over-year:     {:.2}%", stats.year_over_year_change);

    if let Some(top) = &stats.top_merchant {
        println!("\nTop merchant: {} ({})", top.name, format_dollar(top.amount));
    }
    if let Some(largest) = &stats.largest_expense {
        println!(
            "Largest expense: {} ({}) on {}",
            largest.description,
            format_dollar(largest.amount),
            largest.date
        );
    }

    if !stats.monthly_spending.is_empty() {
        println!("\nMonthly spending:");
        for point in &stats.monthly_spending {
            println!("  {:9} {}", month_label(&point.date), format_dollar(point.amount));
        }
    }

    println!("\nSpending by category:");
    for slice in &stats.category_breakdown {
        println!("  {:20} {}", slice.name, format_dollar(slice.value));
    }

    if !stats.recurring_payments.is_empty() {
        println!("\nRecurring payments:");
        for payment in &stats.recurring_payments {
            println!(
                "  {:30} {:>10}  [{}]",
                payment.description,
                format_dollar(payment.amount),
                payment.months
            );
        }
    }
}
