pub mod error;
pub mod types;

pub use error::{CrunchbaseError, Result};
pub use types::FundingSnapshot;

use std::time::Duration;

use types::{EntityResponse, SearchResponse};

const BASE_URL: &str = "https://api.crunchbase.com/api/v4";

pub struct CrunchbaseClient {
    client: reqwest::Client,
    api_key: String,
}

impl CrunchbaseClient {
    pub fn new(api_key: String) -> Self {
        Self::with_timeout(api_key, Duration::from_secs(10))
    }

    pub fn with_timeout(api_key: String, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self { client, api_key }
    }

    /// Find an organization id by website substring, falling back to a name
    /// substring. A predicate that errors at the API level is skipped so the
    /// next one can still match.
    pub async fn find_organization(
        &self,
        domain: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<String>> {
        for (field_id, value) in [("website", domain), ("name", name)] {
            let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };

            let resp = self
                .client
                .post(format!("{BASE_URL}/searches/organizations"))
                .header("X-cb-user-key", &self.api_key)
                .json(&search_body(field_id, value))
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                tracing::debug!(
                    field_id,
                    status = status.as_u16(),
                    "Organization search predicate failed"
                );
                continue;
            }

            let parsed: SearchResponse = resp.json().await?;
            if let Some(id) = parsed.first_id() {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Fetch the funding fields for an organization id.
    pub async fn funding_snapshot(&self, org_id: &str) -> Result<Option<FundingSnapshot>> {
        let body = serde_json::json!({
            "field_ids": [
                "name",
                "identifier",
                "website",
                "last_funding_type",
                "last_funding_at",
                "last_funding_total_usd",
                "funding_total_usd",
                "investors",
                "investors_names",
                "announced_on",
            ]
        });

        let resp = self
            .client
            .post(format!("{BASE_URL}/entities/organizations/{org_id}"))
            .header("X-cb-user-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(CrunchbaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: EntityResponse = resp.json().await?;
        Ok(parsed.properties.map(|p| p.into_snapshot()))
    }

    /// Search then fetch in one call. None when the organization is unknown.
    pub async fn lookup(
        &self,
        name: Option<&str>,
        domain: Option<&str>,
    ) -> Result<Option<FundingSnapshot>> {
        let Some(org_id) = self.find_organization(domain, name).await? else {
            return Ok(None);
        };
        self.funding_snapshot(&org_id).await
    }
}

fn search_body(field_id: &str, value: &str) -> serde_json::Value {
    serde_json::json!({
        "field_ids": ["identifier", "name", "website", "short_description"],
        "query": [{
            "type": "predicate",
            "field_id": field_id,
            "operator_id": "contains",
            "values": [value],
        }],
        "limit": 1,
    })
}
