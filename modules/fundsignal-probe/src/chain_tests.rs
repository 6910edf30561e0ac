//! Chain tests: end-to-end through the prober with mocks.
//!
//! Each test follows MOCK -> FUNCTION -> OUTPUT: set up the fake external
//! world, call the actual facade, assert on what came out. Tests never
//! reach into the pipeline and call its internals.

use std::sync::Arc;

use chrono::NaiveDate;

use crunchbase_client::FundingSnapshot;
use fundsignal_common::{CompanyIdentity, ProbeConfig};

use crate::probe::{ProbeDeps, ProbeError, ProbeOptions, Prober};
use crate::testing::*;
use crate::traits::{FundingAuthority, PageFetcher, SearchProvider};

fn identity(name: &str, domain: Option<&str>) -> CompanyIdentity {
    CompanyIdentity {
        name: name.to_string(),
        domain: domain.map(|d| d.to_string()),
        owners: Vec::new(),
        aka_names: Vec::new(),
    }
}

fn prober(
    searcher: Option<MockSearch>,
    fetcher: MockFetcher,
    authority: Option<MockAuthority>,
) -> Prober {
    let deps = ProbeDeps::builder()
        .searcher(searcher.map(|s| Arc::new(s) as Arc<dyn SearchProvider>))
        .fetcher(Arc::new(fetcher) as Arc<dyn PageFetcher>)
        .authority(authority.map(|a| Arc::new(a) as Arc<dyn FundingAuthority>))
        .config(ProbeConfig::default())
        .build();
    Prober::new(deps)
}

fn discovery() -> ProbeOptions {
    ProbeOptions { enable_discovery: true, enable_authority: false, fetch_pages: true }
}

/// Filler long enough to clear the thin-body fallback without adding any
/// extractable facts.
fn padding() -> String {
    "Acme builds autonomous robots for warehouse logistics teams. ".repeat(8)
}

// ---------------------------------------------------------------------------
// Chain Test 1: Discovery
//
// search -> dedupe -> blocklist -> fetch (with fallback) -> extract ->
// score -> rank.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn discovery_ranks_dedupes_and_drops_blocked_hosts() {
    let press_url = "https://techcrunch.com/2024/03/15/acme-raises/";
    let press_body = format!(
        "Acme Robotics raises $8 million Series A led by Alpha Fund and Beta Capital, \
         announced 2024-03-15. {}",
        padding(),
    );

    let press_hit = || {
        hit(press_url, "Acme raises $8 million Series A", "The robotics startup closed its round.")
    };
    let searcher = MockSearch::new().on_query_containing(
        "Acme",
        vec![
            press_hit(),
            hit("https://www.linkedin.com/posts/acme-funding", "Acme on LinkedIn", "We raised!"),
            hit("https://acme.com/press/funding", "Acme funding", "details inside"),
            // Same URL surfaced by a second query.
            press_hit(),
        ],
    );
    let fetcher = MockFetcher::new().on_page(press_url, &press_body);

    let prober = prober(Some(searcher), fetcher, None);
    let report = prober
        .probe(&identity("Acme", Some("acme.com")), &[], discovery())
        .await
        .unwrap();

    assert_eq!(report.candidates.len(), 2, "blocked and duplicate hits must drop out");
    assert!(report
        .candidates
        .iter()
        .all(|c| !c.page.url.contains("linkedin.com")));

    // Trusted press with verb + full facts outranks the thin official page.
    let best = &report.candidates[0];
    assert_eq!(best.page.url, press_url);
    assert!(best.score > report.candidates[1].score);
    assert_eq!(best.facts.amount_usd, Some(8_000_000));
    assert_eq!(best.facts.round_type.as_deref(), Some("Series A"));
    assert_eq!(best.facts.investors, vec!["Alpha Fund", "Beta Capital"]);
    // No metadata hint, so the date comes from the /YYYY/MM/DD/ path.
    assert_eq!(best.page.published_at, NaiveDate::from_ymd_opt(2024, 3, 15));

    // The unfetchable official page fell back to title+snippet.
    assert_eq!(report.candidates[1].page.url, "https://acme.com/press/funding");
}

#[tokio::test]
async fn failed_query_does_not_abort_discovery() {
    let searcher = MockSearch::new()
        .failing_when_containing("announces funding")
        .on_query_containing(
            "fundraise",
            vec![hit(
                "https://news.example.com/beacon",
                "Beacon raises seed round",
                "funding news",
            )],
        );
    let fetcher = MockFetcher::new();

    let prober = prober(Some(searcher), fetcher, None);
    let report = prober.probe(&identity("Beacon", None), &[], discovery()).await.unwrap();

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].page.url, "https://news.example.com/beacon");
}

#[tokio::test]
async fn fetch_pages_off_scores_on_title_and_snippet_only() {
    let url = "https://news.example.com/beacon";
    let searcher = MockSearch::new().on_query_containing(
        "Beacon",
        vec![hit(url, "Beacon news", "Beacon raises $3 million")],
    );
    // The body would contradict the snippet if it were fetched.
    let body = format!("Beacon raises $9 million Series C. {}", padding());
    let fetcher = MockFetcher::new().on_page(url, &body);

    let prober = prober(Some(searcher), fetcher, None);
    let options = ProbeOptions { fetch_pages: false, ..discovery() };
    let report = prober.probe(&identity("Beacon", None), &[], options).await.unwrap();

    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.candidates[0].facts.amount_usd, Some(3_000_000));
    assert_eq!(report.candidates[0].facts.round_type, None);
}

// ---------------------------------------------------------------------------
// Chain Test 2: Tier precedence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn known_pages_beat_discovery_on_conflicts() {
    let hit_url = "https://news.example.com/beacon-seed";
    let searcher = MockSearch::new().on_query_containing(
        "Beacon",
        vec![hit(hit_url, "Beacon raises seed round", "funding news")],
    );
    let fetcher = MockFetcher::new().on_page(
        hit_url,
        &format!(
            "Beacon raises a Seed round of $2 million led by Gamma Partners, \
             announced 2024-05-01. {}",
            padding(),
        ),
    );

    let known = [page("https://beacon.io/press", "Beacon closed a Series A round of $8 million.")];

    let prober = prober(Some(searcher), fetcher, None);
    let record = prober
        .best_funding(&identity("Beacon", None), &known, discovery())
        .await
        .unwrap();

    // Known pages win conflicts; discovery fills the gaps they left.
    assert_eq!(record.last_round_type.as_deref(), Some("Series A"));
    assert_eq!(record.last_round_amount_usd, Some(8_000_000));
    assert_eq!(record.last_round_date, NaiveDate::from_ymd_opt(2024, 5, 1));
    assert_eq!(record.investors, vec!["Gamma Partners"]);
    assert_eq!(record.funding_sources, vec!["https://beacon.io/press"]);
    assert!(record.funding_present);
    assert!(!record.source_cb);
}

#[tokio::test]
async fn later_known_page_wins_within_the_tier() {
    let known = [
        page("https://beacon.io/2023", "Beacon closed a Series A round."),
        page("https://beacon.io/2024", "Beacon closed a Seed round of $2 million."),
    ];

    let prober = prober(None, MockFetcher::new(), None);
    let record = prober
        .best_funding(&identity("Beacon", None), &known, ProbeOptions::default())
        .await
        .unwrap();

    assert_eq!(record.last_round_type.as_deref(), Some("Seed"));
    assert_eq!(record.last_round_amount_usd, Some(2_000_000));
    assert_eq!(
        record.funding_sources,
        vec!["https://beacon.io/2023", "https://beacon.io/2024"],
    );
}

#[tokio::test]
async fn authority_wins_conflicts_and_fills_gaps() {
    let snapshot = FundingSnapshot {
        total_funding_usd: Some(20_000_000),
        last_round_type: Some("Series B".to_string()),
        last_round_date: NaiveDate::from_ymd_opt(2023, 6, 1),
        last_round_amount_usd: Some(12_000_000),
        investors: vec!["Delta Fund".to_string()],
    };
    let known = [page("https://beacon.io/press", "Beacon closed a Series A round of $8 million.")];

    let prober = prober(None, MockFetcher::new(), Some(MockAuthority::with_snapshot(snapshot)));
    let options = ProbeOptions { enable_authority: true, ..ProbeOptions::default() };
    let record = prober.best_funding(&identity("Beacon", None), &known, options).await.unwrap();

    // Authority fields win; heuristic sources survive because the
    // authority has none.
    assert_eq!(record.last_round_type.as_deref(), Some("Series B"));
    assert_eq!(record.last_round_amount_usd, Some(12_000_000));
    assert_eq!(record.total_funding_usd, Some(20_000_000));
    assert_eq!(record.investors, vec!["Delta Fund"]);
    assert_eq!(record.funding_sources, vec!["https://beacon.io/press"]);
    assert!(record.source_cb);
}

#[tokio::test]
async fn authority_failure_degrades_to_heuristics() {
    let known = [page("https://beacon.io/press", "Beacon closed a Series A round of $8 million.")];

    let prober = prober(None, MockFetcher::new(), Some(MockAuthority::failing()));
    let options = ProbeOptions { enable_authority: true, ..ProbeOptions::default() };
    let record = prober.best_funding(&identity("Beacon", None), &known, options).await.unwrap();

    assert_eq!(record.last_round_type.as_deref(), Some("Series A"));
    assert!(!record.source_cb);
}

#[tokio::test]
async fn empty_authority_answer_changes_nothing() {
    let prober = prober(None, MockFetcher::new(), Some(MockAuthority::empty()));
    let options = ProbeOptions { enable_authority: true, ..ProbeOptions::default() };
    let record = prober.best_funding(&identity("Beacon", None), &[], options).await.unwrap();

    assert!(record.is_empty());
    assert!(!record.source_cb);
}

// ---------------------------------------------------------------------------
// Chain Test 3: Degenerate inputs
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_inputs_produce_empty_record_not_an_error() {
    let prober = prober(None, MockFetcher::new(), None);
    let record = prober
        .best_funding(&identity("", None), &[], ProbeOptions::default())
        .await
        .unwrap();

    assert!(!record.funding_present);
    assert!(record.is_empty());
}

#[tokio::test]
async fn discovery_without_a_searcher_is_an_error() {
    let prober = prober(None, MockFetcher::new(), None);
    let err = prober
        .best_funding(&identity("Acme", None), &[], discovery())
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::MissingSearchCredentials));
}

// ---------------------------------------------------------------------------
// Chain Test 4: Full scenario
//
// One press hit carries the whole story; the record reflects it.
// ---------------------------------------------------------------------------

#[tokio::test]
async fn press_release_flows_into_the_merged_record() {
    let press_url = "https://techcrunch.com/2024/03/15/acme-raises/";
    let searcher = MockSearch::new().on_query_containing(
        "Acme",
        vec![hit(press_url, "Acme Robotics raises $8 million", "Series A for warehouse robots")],
    );
    let fetcher = MockFetcher::new().on_page(
        press_url,
        &format!(
            "Acme Robotics raises $8 million Series A led by Acme Ventures and Beta Capital, \
             announced 2024-03-15. {}",
            padding(),
        ),
    );

    let prober = prober(Some(searcher), fetcher, None);
    let report = prober
        .probe(&identity("Acme Robotics", Some("acme.com")), &[], discovery())
        .await
        .unwrap();

    let record = &report.record;
    assert!(record.funding_present);
    assert_eq!(record.last_round_type.as_deref(), Some("Series A"));
    assert_eq!(record.last_round_amount_usd, Some(8_000_000));
    assert_eq!(record.last_round_date, NaiveDate::from_ymd_opt(2024, 3, 15));
    assert_eq!(record.investors, vec!["Acme Ventures", "Beta Capital"]);
    assert_eq!(record.funding_sources, vec![press_url.to_string()]);
    assert!(!record.source_cb);
}
