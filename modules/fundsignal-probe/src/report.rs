//! Run output: console summary, JSON report, CSV of candidates.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use fundsignal_common::registered_domain;

use crate::probe::ProbeReport;

/// Write the full report as pretty-printed JSON.
pub fn write_json(path: &Path, report: &ProbeReport) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(file, report).context("Failed to serialize report")?;
    Ok(())
}

/// Write one CSV row per candidate, best first.
pub fn write_csv(path: &Path, report: &ProbeReport) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record([
        "score",
        "source",
        "url",
        "title",
        "published_at",
        "amount_usd",
        "round_type",
        "announced_on",
        "investors",
        "snippet",
    ])?;
    for candidate in &report.candidates {
        let page = &candidate.page;
        let facts = &candidate.facts;
        writer.write_record([
            format!("{:.2}", candidate.score),
            registered_domain(&page.url),
            page.url.clone(),
            page.title.clone(),
            page.published_at.map(|d| d.to_string()).unwrap_or_default(),
            facts.amount_usd.map(|a| a.to_string()).unwrap_or_default(),
            facts.round_type.clone().unwrap_or_default(),
            facts.announced_on.map(|d| d.to_string()).unwrap_or_default(),
            facts.investors.join(", "),
            page.snippet.replace('\n', " ").trim().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Human-readable summary on stdout.
pub fn print_summary(report: &ProbeReport) {
    let identity = &report.identity;
    println!("\n=== Funding probe ===");
    println!(
        "Company: {}  |  Domain: {}",
        identity.name,
        identity.domain.as_deref().unwrap_or("-"),
    );
    if !identity.owners.is_empty() {
        println!("Owners: {}", identity.owners.join(", "));
    }
    if !identity.aka_names.is_empty() {
        println!("AKA: {}", identity.aka_names.join(", "));
    }
    println!("Candidates returned: {}", report.candidates.len());

    if let Some(best) = report.candidates.first() {
        println!("\n--- Best candidate ---");
        println!("Score: {:.2}  Source: {}", best.score, registered_domain(&best.page.url));
        println!("Title: {}", best.page.title);
        if let Some(amount) = best.facts.amount_usd {
            println!("Amount: ${amount}");
        }
        if let Some(round) = best.facts.round_type.as_deref() {
            println!("Round: {round}");
        }
        if !best.facts.investors.is_empty() {
            println!("Investors: {}", best.facts.investors.join(", "));
        }
        println!("URL: {}", best.page.url);
    }

    let record = &report.record;
    println!("\n--- Merged record ---");
    println!("Funding present: {}", record.funding_present);
    if let Some(round) = record.last_round_type.as_deref() {
        println!("Last round: {round}");
    }
    if let Some(date) = record.last_round_date {
        println!("Last round date: {date}");
    }
    if let Some(amount) = record.last_round_amount_usd {
        println!("Last round amount: ${amount}");
    }
    if let Some(total) = record.total_funding_usd {
        println!("Total funding: ${total}");
    }
    if !record.investors.is_empty() {
        println!("Investors: {}", record.investors.join(", "));
    }
    if !record.funding_sources.is_empty() {
        println!("Sources:");
        for source in &record.funding_sources {
            println!("  - {source}");
        }
    }
    if record.source_cb {
        println!("Includes Crunchbase data");
    }
}
