//! Fresh-search discovery: build queries, search, filter, fetch, extract,
//! score, rank.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use regex::Regex;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use fundsignal_common::{
    host_matches_domain, host_of, registered_domain, CompanyIdentity, EvidencePage, ProbeConfig,
    ScoredCandidate,
};

use crate::facts::extract_facts;
use crate::limiter::RateLimiter;
use crate::queries::build_queries;
use crate::score::score_candidate;
use crate::traits::{PageFetcher, SearchHit, SearchProvider};

/// Hosts that aggregate or socialize funding news without being citable
/// for it. Includes subdomains of each entry.
pub const BLOCKED_DOMAINS: &[&str] = &[
    "linkedin.com",
    "x.com",
    "twitter.com",
    "facebook.com",
    "instagram.com",
    "youtube.com",
    "github.com",
    "medium.com",
    "substack.com",
    "notion.so",
    "notion.site",
    "docs.google.com",
    "wikipedia.org",
    "angel.co",
];

/// Extracted bodies shorter than this are almost always consent walls or
/// extraction misses; title+snippet carries more signal than that.
const MIN_BODY_CHARS: usize = 400;

/// How many queries run concurrently. Results are collected in submission
/// order so ranking stays deterministic run to run.
const SEARCH_CONCURRENCY: usize = 4;

static DATE_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/((?:19|20)\d{2})/(\d{1,2})/(\d{1,2})/").expect("valid regex"));

/// Counters from one discovery run, logged at the end of the pass.
#[derive(Debug, Default)]
pub struct DiscoveryStats {
    pub queries_run: u32,
    pub queries_failed: u32,
    pub hits: u32,
    pub unique_urls: u32,
    pub blocked: u32,
    pub fetched: u32,
    pub fallbacks: u32,
    pub timed_out: u32,
    pub scored: u32,
}

impl std::fmt::Display for DiscoveryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Discovery: {}/{} queries ok, {} hits, {} unique, {} blocked, {} fetched, {} fallbacks, {} timed out, {} scored",
            self.queries_run - self.queries_failed,
            self.queries_run,
            self.hits,
            self.unique_urls,
            self.blocked,
            self.fetched,
            self.fallbacks,
            self.timed_out,
            self.scored,
        )
    }
}

/// One discovery pass over the open web for one company.
pub struct DiscoveryEngine<'a> {
    searcher: &'a dyn SearchProvider,
    fetcher: &'a dyn PageFetcher,
    limiter: &'a RateLimiter,
    config: &'a ProbeConfig,
}

impl<'a> DiscoveryEngine<'a> {
    pub fn new(
        searcher: &'a dyn SearchProvider,
        fetcher: &'a dyn PageFetcher,
        limiter: &'a RateLimiter,
        config: &'a ProbeConfig,
    ) -> Self {
        Self { searcher, fetcher, limiter, config }
    }

    /// Run the full pass: search, dedupe, drop blocked hosts, fetch (unless
    /// `fetch_pages` is off), extract, score, rank best-first.
    ///
    /// Failed queries and dead pages drop out with a log line; the batch
    /// deadline abandons stragglers and keeps whatever finished. Ties in
    /// score break toward the earlier search hit.
    pub async fn discover_and_score(
        &self,
        identity: &CompanyIdentity,
        max_pages: usize,
        fetch_pages: bool,
    ) -> Vec<ScoredCandidate> {
        let mut stats = DiscoveryStats::default();

        let mut queries = build_queries(identity);
        queries.truncate(self.config.max_queries);
        let date_restrict = format!("d{}", self.config.lookback_days.max(1));

        let results: Vec<(String, anyhow::Result<Vec<SearchHit>>)> =
            stream::iter(queries.into_iter().map(|query| {
                let date_restrict = date_restrict.as_str();
                async move {
                    self.limiter.acquire().await;
                    debug!(query = query.as_str(), "Running search");
                    let result = self
                        .searcher
                        .search(&query, self.config.results_per_query, Some(date_restrict))
                        .await;
                    (query, result)
                }
            }))
            .buffered(SEARCH_CONCURRENCY)
            .collect()
            .await;

        let mut hits: Vec<SearchHit> = Vec::new();
        for (query, result) in results {
            stats.queries_run += 1;
            match result {
                Ok(items) => {
                    stats.hits += items.len() as u32;
                    hits.extend(items);
                }
                Err(e) => {
                    stats.queries_failed += 1;
                    warn!(query, error = %e, "Search query failed");
                }
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut kept: Vec<SearchHit> = Vec::new();
        for mut hit in hits {
            let url = hit.url.trim().to_string();
            if url.is_empty() || !seen.insert(url.clone()) {
                continue;
            }
            stats.unique_urls += 1;
            let host = host_of(&url);
            if BLOCKED_DOMAINS.iter().any(|blocked| host_matches_domain(&host, blocked)) {
                stats.blocked += 1;
                continue;
            }
            hit.url = url;
            kept.push(hit);
        }
        kept.truncate(max_pages);
        let total = kept.len();

        let outcomes: Vec<(usize, SearchHit, Option<String>)> = if fetch_pages {
            self.fetch_batch(kept).await
        } else {
            kept.into_iter().enumerate().map(|(rank, hit)| (rank, hit, None)).collect()
        };
        stats.timed_out = (total - outcomes.len()) as u32;

        let company_domain = identity
            .domain
            .as_deref()
            .map(registered_domain)
            .filter(|d| !d.is_empty());

        let mut ranked: Vec<(usize, ScoredCandidate)> = Vec::new();
        for (rank, hit, fetched) in outcomes {
            let body = match fetched {
                Some(text) if text.chars().count() >= MIN_BODY_CHARS => {
                    stats.fetched += 1;
                    text
                }
                _ => {
                    stats.fallbacks += 1;
                    format!("{}\n{}", hit.title, hit.snippet)
                }
            };

            let published_at = hit.published_hint.or_else(|| published_from_url(&hit.url));
            let page = EvidencePage {
                url: hit.url,
                title: hit.title,
                snippet: hit.snippet,
                fetched_text: body,
                published_at,
            };
            let facts = extract_facts(&page.combined_text());
            let score = score_candidate(&page, &facts, company_domain.as_deref());
            stats.scored += 1;
            ranked.push((rank, ScoredCandidate { page, facts, score }));
        }

        ranked.sort_by(|a, b| b.1.score.total_cmp(&a.1.score).then(a.0.cmp(&b.0)));

        info!("{stats}");
        ranked.into_iter().map(|(_, candidate)| candidate).collect()
    }

    /// Fetch pages concurrently under the batch deadline. Slots that miss
    /// the deadline are dropped, not failed.
    async fn fetch_batch(&self, kept: Vec<SearchHit>) -> Vec<(usize, SearchHit, Option<String>)> {
        let deadline = Instant::now() + Duration::from_secs(self.config.discovery_timeout_secs);

        let mut tasks = stream::iter(kept.into_iter().enumerate().map(|(rank, hit)| async move {
            let fetched = match self.fetcher.fetch_text(&hit.url).await {
                Ok(text) => text,
                Err(e) => {
                    debug!(url = hit.url.as_str(), error = %e, "Fetch errored");
                    None
                }
            };
            (rank, hit, fetched)
        }))
        .buffer_unordered(self.config.fetch_concurrency);

        let mut outcomes = Vec::new();
        loop {
            match timeout_at(deadline, tasks.next()).await {
                Ok(Some(outcome)) => outcomes.push(outcome),
                Ok(None) => break,
                Err(_) => {
                    warn!(
                        collected = outcomes.len(),
                        "Fetch deadline reached, keeping partial results"
                    );
                    break;
                }
            }
        }
        outcomes
    }
}

/// Publication date from a /YYYY/MM/DD/ path segment, a convention most
/// news CMSes follow.
fn published_from_url(url: &str) -> Option<NaiveDate> {
    let caps = DATE_PATH_RE.captures(url)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    let day = caps.get(3)?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
