//! The probe facade: known pages, optional discovery, optional authority
//! overlay, merged into one record.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use typed_builder::TypedBuilder;

use fundsignal_common::{
    registered_domain, CompanyIdentity, EvidencePage, FundingRecord, ProbeConfig, ScoredCandidate,
};

use crate::discovery::DiscoveryEngine;
use crate::facts::extract_facts;
use crate::limiter::RateLimiter;
use crate::merge::{
    dedupe_preserving_order, merge, record_from_facts, record_from_snapshot, MAX_SOURCES,
};
use crate::traits::{FundingAuthority, PageFetcher, SearchProvider};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("discovery requested but no search provider is configured (set GOOGLE_API_KEY and GOOGLE_CSE_ID)")]
    MissingSearchCredentials,
}

/// Everything the prober needs, injected so tests can swap in mocks.
#[derive(Clone, TypedBuilder)]
pub struct ProbeDeps {
    #[builder(default)]
    pub searcher: Option<Arc<dyn SearchProvider>>,
    pub fetcher: Arc<dyn PageFetcher>,
    #[builder(default)]
    pub authority: Option<Arc<dyn FundingAuthority>>,
    #[builder(default)]
    pub config: ProbeConfig,
}

/// Per-call switches. Discovery and the authority overlay are opt-in;
/// page fetching defaults on and only matters when discovery runs.
#[derive(Debug, Clone, Copy)]
pub struct ProbeOptions {
    pub enable_discovery: bool,
    pub enable_authority: bool,
    pub fetch_pages: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self { enable_discovery: false, enable_authority: false, fetch_pages: true }
    }
}

/// Everything one probe run produced: the ranked evidence and the record
/// merged from it.
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    pub identity: CompanyIdentity,
    pub candidates: Vec<ScoredCandidate>,
    pub record: FundingRecord,
}

pub struct Prober {
    deps: ProbeDeps,
    limiter: RateLimiter,
}

impl Prober {
    pub fn new(deps: ProbeDeps) -> Self {
        let limiter = RateLimiter::new(deps.config.search_rate_cps, deps.config.search_rate_burst);
        Self { deps, limiter }
    }

    /// Best-guess funding record for one company. See [`Prober::probe`]
    /// for the full report including the evidence behind the record.
    pub async fn best_funding(
        &self,
        identity: &CompanyIdentity,
        known_pages: &[EvidencePage],
        options: ProbeOptions,
    ) -> Result<FundingRecord, ProbeError> {
        Ok(self.probe(identity, known_pages, options).await?.record)
    }

    /// Run the full probe.
    ///
    /// Tier precedence: authority data wins conflicts over everything,
    /// known-page heuristics win over discovery, and lower tiers only fill
    /// gaps. Failures inside discovery or the authority lookup degrade to
    /// whatever the remaining tiers produced. The one hard error is
    /// requesting discovery with no search provider configured; with every
    /// tier empty or disabled the result is an empty record, not an error.
    pub async fn probe(
        &self,
        identity: &CompanyIdentity,
        known_pages: &[EvidencePage],
        options: ProbeOptions,
    ) -> Result<ProbeReport, ProbeError> {
        let known_tier = fold_known_pages(known_pages);

        let mut candidates: Vec<ScoredCandidate> = Vec::new();
        let discovery_tier = if options.enable_discovery {
            let searcher = self
                .deps
                .searcher
                .as_deref()
                .ok_or(ProbeError::MissingSearchCredentials)?;
            let engine = DiscoveryEngine::new(
                searcher,
                self.deps.fetcher.as_ref(),
                &self.limiter,
                &self.deps.config,
            );
            candidates = engine
                .discover_and_score(
                    identity,
                    self.deps.config.max_discovery_pages,
                    options.fetch_pages,
                )
                .await;
            fold_discovery(&candidates)
        } else {
            FundingRecord::default()
        };

        let heuristic = merge(known_tier, discovery_tier);

        let record = if options.enable_authority {
            match self.authority_record(identity).await {
                Some(authority) => merge(authority, heuristic),
                None => heuristic,
            }
        } else {
            heuristic
        };

        info!(
            company = identity.name.as_str(),
            funding_present = record.funding_present,
            candidates = candidates.len(),
            "Probe complete"
        );

        Ok(ProbeReport { identity: identity.clone(), candidates, record })
    }

    /// Authority tier, degrading to None on any failure.
    async fn authority_record(&self, identity: &CompanyIdentity) -> Option<FundingRecord> {
        let authority = self.deps.authority.as_ref()?;
        let name = Some(identity.name.as_str()).filter(|n| !n.trim().is_empty());
        let domain = identity
            .domain
            .as_deref()
            .map(registered_domain)
            .filter(|d| !d.is_empty());

        match authority.lookup(name, domain.as_deref()).await {
            Ok(Some(snapshot)) => {
                let record = record_from_snapshot(&snapshot);
                if record.is_empty() {
                    None
                } else {
                    Some(record)
                }
            }
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Authority lookup failed, continuing with heuristics");
                None
            }
        }
    }
}

/// Fold facts out of pages the caller already holds. A later page's facts
/// win conflicts with earlier ones; pages that yielded anything are
/// credited in funding_sources, first-seen order.
fn fold_known_pages(pages: &[EvidencePage]) -> FundingRecord {
    let mut acc = FundingRecord::default();
    let mut sources: Vec<String> = Vec::new();
    for page in pages {
        let text = page.combined_text();
        if text.trim().is_empty() {
            continue;
        }
        let facts = extract_facts(&text);
        if facts.is_empty() {
            continue;
        }
        sources.push(page.url.clone());
        acc = merge(record_from_facts(&facts, None), acc);
    }
    attach_sources(acc, sources)
}

/// Fold ranked discovery candidates best-first: the top candidate wins
/// conflicts, lower-ranked ones fill its gaps.
fn fold_discovery(candidates: &[ScoredCandidate]) -> FundingRecord {
    let mut acc = FundingRecord::default();
    let mut sources: Vec<String> = Vec::new();
    for candidate in candidates {
        if candidate.facts.is_empty() {
            continue;
        }
        sources.push(candidate.page.url.clone());
        acc = merge(acc, record_from_facts(&candidate.facts, None));
    }
    attach_sources(acc, sources)
}

fn attach_sources(mut record: FundingRecord, sources: Vec<String>) -> FundingRecord {
    if !sources.is_empty() {
        let mut sources = dedupe_preserving_order(sources);
        sources.truncate(MAX_SOURCES);
        record.funding_sources = sources;
        record.funding_present = !record.is_empty();
    }
    record
}
