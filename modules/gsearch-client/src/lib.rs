pub mod error;
pub mod types;

pub use error::{GsearchError, Result};
pub use types::{SearchItem, SearchResponse};

use std::time::Duration;

const BASE_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// The API rejects page sizes above 10.
const MAX_PAGE_SIZE: u32 = 10;

pub struct GsearchClient {
    client: reqwest::Client,
    api_key: String,
    cse_id: String,
}

impl GsearchClient {
    pub fn new(api_key: String, cse_id: String) -> Self {
        Self::with_timeout(api_key, cse_id, Duration::from_secs(30))
    }

    pub fn with_timeout(api_key: String, cse_id: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            cse_id,
        }
    }

    /// Run one query. `num` is clamped to 1..=10; `date_restrict` is passed
    /// through as-is (e.g. "d365", "m6", "y1"). Excluded domains become
    /// `-site:` clauses on the query.
    pub async fn search(
        &self,
        query: &str,
        num: u32,
        date_restrict: Option<&str>,
        exclude_domains: &[String],
    ) -> Result<Vec<SearchItem>> {
        let q = apply_exclusions(query, exclude_domains);
        let num = num.clamp(1, MAX_PAGE_SIZE);

        let mut params: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("cx", self.cse_id.clone()),
            ("q", q),
            ("num", num.to_string()),
        ];
        if let Some(restrict) = date_restrict {
            params.push(("dateRestrict", restrict.to_string()));
        }

        tracing::debug!(query, num, date_restrict, "CSE search");

        let resp = self.client.get(BASE_URL).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(GsearchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: SearchResponse = resp.json().await?;
        Ok(body.items)
    }
}

/// Append deduplicated `-site:domain` clauses to a query.
fn apply_exclusions(query: &str, exclude_domains: &[String]) -> String {
    let mut q = query.to_string();
    let mut seen: Vec<String> = Vec::new();
    for domain in exclude_domains {
        let domain = domain.trim().to_lowercase();
        if domain.is_empty() || seen.contains(&domain) {
            continue;
        }
        q.push_str(&format!(" -site:{domain}"));
        seen.push(domain);
    }
    q
}
