//! HTTP page fetching with Readability-style boilerplate removal.

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};
use tracing::debug;

use crate::traits::PageFetcher;

/// Cap on extracted body text; funding language lives near the top of a
/// press page, and the regex passes should not chew megabyte bodies.
const MAX_TEXT_CHARS: usize = 25_000;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; FundSignal/1.0; +https://example.invalid/bot)";

/// Plain HTTP fetcher that reduces pages to readable main-content text.
/// Every transport and extraction failure surfaces as `None`; one dead
/// page never aborts a batch.
pub struct PageTextFetcher {
    client: reqwest::Client,
}

impl PageTextFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");
        Self { client }
    }
}

impl Default for PageTextFetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[async_trait]
impl PageFetcher for PageTextFetcher {
    async fn fetch_text(&self, url: &str) -> Result<Option<String>> {
        let resp = match self.client.get(url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                debug!(url, error = %e, "Fetch failed");
                return Ok(None);
            }
        };

        let status = resp.status().as_u16();
        if status >= 400 {
            debug!(url, status, "Fetch rejected");
            return Ok(None);
        }

        let html = match resp.text().await {
            Ok(html) => html,
            Err(e) => {
                debug!(url, error = %e, "Body read failed");
                return Ok(None);
            }
        };
        if html.trim().is_empty() {
            return Ok(None);
        }

        let parsed_url = url::Url::parse(url).ok();
        let config = TransformConfig {
            readability: true,
            main_content: true,
            return_format: ReturnFormat::Markdown,
            filter_images: true,
            filter_svg: true,
            clean_html: true,
        };
        let input = TransformInput {
            url: parsed_url.as_ref(),
            content: html.as_bytes(),
            screenshot_bytes: None,
            encoding: None,
            selector_config: None,
            ignore_tags: None,
        };

        let text = transform_content_input(input, &config);
        let text = text.trim();
        if text.is_empty() {
            debug!(url, "Empty content after extraction");
            return Ok(None);
        }

        Ok(Some(truncate_chars(text, MAX_TEXT_CHARS)))
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "héllo wörld".repeat(3);
        let cut = truncate_chars(&text, 5);
        assert_eq!(cut, "héllo");
        assert_eq!(truncate_chars("short", 100), "short");
    }
}
