// Test mocks for the probe pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockSearch (SearchProvider) — queries routed by substring needle
// - MockFetcher (PageFetcher) — HashMap-based URL→text
// - MockAuthority (FundingAuthority) — fixed snapshot, empty, or failing
//
// Plus small constructors for hits and evidence pages.

use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crunchbase_client::FundingSnapshot;
use fundsignal_common::{registered_domain, EvidencePage};

use crate::traits::{FundingAuthority, PageFetcher, SearchHit, SearchProvider};

// ---------------------------------------------------------------------------
// MockSearch
// ---------------------------------------------------------------------------

/// Routes queries by substring: the first registered needle contained in
/// the query wins. Unregistered queries return no hits, so tests only
/// describe the traffic they care about. `failing_when_containing` forces
/// an error instead.
pub struct MockSearch {
    routes: Vec<(String, Vec<SearchHit>)>,
    failures: Vec<String>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self { routes: Vec::new(), failures: Vec::new() }
    }

    pub fn on_query_containing(mut self, needle: &str, hits: Vec<SearchHit>) -> Self {
        self.routes.push((needle.to_string(), hits));
        self
    }

    pub fn failing_when_containing(mut self, needle: &str) -> Self {
        self.failures.push(needle.to_string());
        self
    }
}

impl Default for MockSearch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchProvider for MockSearch {
    async fn search(
        &self,
        query: &str,
        _num: u32,
        _date_restrict: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        if let Some(needle) = self.failures.iter().find(|n| query.contains(n.as_str())) {
            return Err(anyhow!("MockSearch: forced failure for queries containing {needle:?}"));
        }
        Ok(self
            .routes
            .iter()
            .find(|(needle, _)| query.contains(needle.as_str()))
            .map(|(_, hits)| hits.clone())
            .unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// MockFetcher
// ---------------------------------------------------------------------------

/// HashMap-based page fetcher. Unregistered URLs fetch as `None`, like a
/// dead page; `failing_on` URLs return `Err`.
pub struct MockFetcher {
    pages: HashMap<String, String>,
    failures: Vec<String>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self { pages: HashMap::new(), failures: Vec::new() }
    }

    pub fn on_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }

    pub fn failing_on(mut self, url: &str) -> Self {
        self.failures.push(url.to_string());
        self
    }
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        if self.failures.iter().any(|u| u == url) {
            return Err(anyhow!("MockFetcher: forced failure for {url}"));
        }
        Ok(self.pages.get(url).cloned())
    }
}

// ---------------------------------------------------------------------------
// MockAuthority
// ---------------------------------------------------------------------------

/// Fixed-answer funding authority.
pub struct MockAuthority {
    snapshot: Option<FundingSnapshot>,
    fail: bool,
}

impl MockAuthority {
    pub fn with_snapshot(snapshot: FundingSnapshot) -> Self {
        Self { snapshot: Some(snapshot), fail: false }
    }

    pub fn empty() -> Self {
        Self { snapshot: None, fail: false }
    }

    pub fn failing() -> Self {
        Self { snapshot: None, fail: true }
    }
}

#[async_trait]
impl FundingAuthority for MockAuthority {
    async fn lookup(
        &self,
        _name: Option<&str>,
        _domain: Option<&str>,
    ) -> Result<Option<FundingSnapshot>> {
        if self.fail {
            return Err(anyhow!("MockAuthority: forced failure"));
        }
        Ok(self.snapshot.clone())
    }
}

// ---------------------------------------------------------------------------
// Constructors
// ---------------------------------------------------------------------------

/// Hit with `source` derived from the URL, no publish hint.
pub fn hit(url: &str, title: &str, snippet: &str) -> SearchHit {
    SearchHit {
        url: url.to_string(),
        title: title.to_string(),
        snippet: snippet.to_string(),
        source: registered_domain(url),
        published_hint: None,
    }
}

/// Evidence page holding only body text, as callers with pre-fetched
/// content supply them.
pub fn page(url: &str, text: &str) -> EvidencePage {
    EvidencePage {
        url: url.to_string(),
        title: String::new(),
        snippet: String::new(),
        fetched_text: text.to_string(),
        published_at: None,
    }
}
