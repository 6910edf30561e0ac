// Trait abstractions for the probe's external dependencies.
//
// SearchProvider  - web search returning normalized hits
// PageFetcher     - URL to cleaned body text
// FundingAuthority - structured funding lookups
//
// These seams keep the pipeline testable with the mocks in testing.rs:
// no network, no API keys, deterministic assertions.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crunchbase_client::{CrunchbaseClient, FundingSnapshot};
use fundsignal_common::registered_domain;
use gsearch_client::GsearchClient;

/// One normalized search result.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Registered domain of `url`, used for trust and blocklist checks.
    pub source: String,
    /// Publish date hinted by result metadata, when the provider has one.
    pub published_hint: Option<NaiveDate>,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Run one query. `date_restrict` narrows results to a recency window
    /// in the provider's syntax (e.g. "d365"); `num` is capped by the
    /// provider's page size.
    async fn search(
        &self,
        query: &str,
        num: u32,
        date_restrict: Option<&str>,
    ) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Cleaned plain text of a page, or None when the page is unusable.
    async fn fetch_text(&self, url: &str) -> Result<Option<String>>;
}

#[async_trait]
pub trait FundingAuthority: Send + Sync {
    /// Structured funding snapshot for a company, or None when the
    /// authority does not know it.
    async fn lookup(
        &self,
        name: Option<&str>,
        domain: Option<&str>,
    ) -> Result<Option<FundingSnapshot>>;
}

#[async_trait]
impl SearchProvider for GsearchClient {
    async fn search(
        &self,
        query: &str,
        num: u32,
        date_restrict: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        let items = GsearchClient::search(self, query, num, date_restrict, &[]).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| {
                let url = item.url()?.to_string();
                let published_hint = item.published_hint();
                Some(SearchHit {
                    source: registered_domain(&url),
                    title: item.title,
                    snippet: item.snippet,
                    url,
                    published_hint,
                })
            })
            .collect())
    }
}

#[async_trait]
impl FundingAuthority for CrunchbaseClient {
    async fn lookup(
        &self,
        name: Option<&str>,
        domain: Option<&str>,
    ) -> Result<Option<FundingSnapshot>> {
        Ok(CrunchbaseClient::lookup(self, name, domain).await?)
    }
}
