use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

/// Metatag keys that carry a publish date, in preference order.
const DATE_META_KEYS: &[&str] = &["article:published_time", "og:updated_time", "date"];

/// Top-level Custom Search response. Only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// One search result item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, rename = "formattedUrl")]
    pub formatted_url: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub pagemap: Option<PageMap>,
}

impl SearchItem {
    /// Result URL: `link`, falling back to `formattedUrl`.
    pub fn url(&self) -> Option<&str> {
        self.link
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.formatted_url.as_deref().filter(|s| !s.is_empty()))
    }

    /// Best-effort publish date from the first pagemap metatag block.
    pub fn published_hint(&self) -> Option<NaiveDate> {
        self.pagemap.as_ref()?.first_metatag_date()
    }
}

/// Pagemap with the metatag blocks CSE attaches to results.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMap {
    #[serde(default)]
    pub metatags: Vec<HashMap<String, serde_json::Value>>,
}

impl PageMap {
    fn first_metatag_date(&self) -> Option<NaiveDate> {
        let tags = self.metatags.first()?;
        for key in DATE_META_KEYS {
            if let Some(date) = tags
                .get(*key)
                .and_then(|v| v.as_str())
                .and_then(parse_meta_date)
            {
                return Some(date);
            }
        }
        None
    }
}

/// Parse a metatag timestamp: full RFC 3339 or a bare "YYYY-MM-DD" prefix.
fn parse_meta_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}
