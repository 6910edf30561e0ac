use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crunchbase_client::CrunchbaseClient;
use fundsignal_common::{CompanyIdentity, ProbeConfig};
use fundsignal_probe::fetcher::PageTextFetcher;
use fundsignal_probe::probe::{ProbeDeps, ProbeOptions, Prober};
use fundsignal_probe::report;
use fundsignal_probe::traits::{FundingAuthority, PageFetcher, SearchProvider};
use gsearch_client::GsearchClient;

#[derive(Parser, Debug)]
#[command(about = "Probe likely funding events for a company")]
struct Args {
    /// Company name / brand
    #[arg(long)]
    name: String,

    /// Root domain, e.g. acme.com
    #[arg(long)]
    domain: Option<String>,

    /// Comma-separated founder or exec names
    #[arg(long)]
    owners: Option<String>,

    /// Comma-separated alternate names
    #[arg(long)]
    aka: Option<String>,

    /// Search window in days
    #[arg(long)]
    lookback_days: Option<u32>,

    /// Max candidates to report
    #[arg(long, default_value_t = 8)]
    max_results: usize,

    /// Score candidates on title+snippet only, skipping page fetches
    #[arg(long)]
    no_fetch_pages: bool,

    /// Overlay Crunchbase data (requires CRUNCHBASE_API_KEY)
    #[arg(long)]
    crunchbase: bool,

    /// Write the full report as JSON
    #[arg(long)]
    out_json: Option<PathBuf>,

    /// Write candidates as CSV
    #[arg(long)]
    out_csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fundsignal=info".parse()?))
        .init();

    let args = Args::parse();

    info!("FundSignal probe starting...");

    // Load config; the CLI lookback overrides the environment
    let mut config = ProbeConfig::from_env();
    if let Some(days) = args.lookback_days {
        config.lookback_days = days;
    }
    config.log_redacted();

    // Wire real providers from whatever credentials are present; the
    // prober reports missing search credentials itself.
    let searcher: Option<Arc<dyn SearchProvider>> =
        match (config.google_api_key.clone(), config.google_cse_id.clone()) {
            (Some(key), Some(cse_id)) => Some(Arc::new(GsearchClient::with_timeout(
                key,
                cse_id,
                Duration::from_secs(config.search_timeout_secs),
            ))),
            _ => None,
        };
    let authority: Option<Arc<dyn FundingAuthority>> =
        config.crunchbase_api_key.clone().map(|key| {
            Arc::new(CrunchbaseClient::with_timeout(
                key,
                Duration::from_secs(config.crunchbase_timeout_secs),
            )) as Arc<dyn FundingAuthority>
        });
    let fetcher: Arc<dyn PageFetcher> =
        Arc::new(PageTextFetcher::new(Duration::from_secs(config.fetch_timeout_secs)));

    let identity = CompanyIdentity {
        name: args.name.clone(),
        domain: args.domain.clone(),
        owners: split_csv(args.owners.as_deref()),
        aka_names: split_csv(args.aka.as_deref()),
    };

    let deps = ProbeDeps::builder()
        .searcher(searcher)
        .fetcher(fetcher)
        .authority(authority)
        .config(config)
        .build();
    let prober = Prober::new(deps);

    let options = ProbeOptions {
        enable_discovery: true,
        enable_authority: args.crunchbase,
        fetch_pages: !args.no_fetch_pages,
    };

    let mut report = prober.probe(&identity, &[], options).await?;
    report.candidates.truncate(args.max_results.max(1));

    report::print_summary(&report);

    if let Some(path) = args.out_json.as_deref() {
        report::write_json(path, &report)?;
        info!(path = %path.display(), "Wrote JSON report");
    }
    if let Some(path) = args.out_csv.as_deref() {
        report::write_csv(path, &report)?;
        info!(path = %path.display(), "Wrote CSV report");
    }

    Ok(())
}

fn split_csv(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}
