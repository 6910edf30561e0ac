use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// --- Identity ---

/// The company being probed. Immutable input to every query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyIdentity {
    /// Display / DBA name.
    pub name: String,
    /// Registered root domain, e.g. "acme.com".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Founder / exec names, most relevant first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owners: Vec<String>,
    /// Alternate names the company trades under.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aka_names: Vec<String>,
}

impl CompanyIdentity {
    /// Primary name plus aliases, trimmed, deduplicated case-insensitively,
    /// first-seen order preserved.
    pub fn all_names(&self) -> Vec<&str> {
        let mut seen: Vec<String> = Vec::new();
        let mut out = Vec::new();
        for name in std::iter::once(self.name.as_str())
            .chain(self.aka_names.iter().map(String::as_str))
        {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let key = name.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                out.push(name);
            }
        }
        out
    }
}

// --- Evidence ---

/// One candidate page. Created once per fetch, never mutated afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidencePage {
    pub url: String,
    pub title: String,
    pub snippet: String,
    /// Cleaned body text; empty when the fetch failed or was skipped.
    pub fetched_text: String,
    /// Best-effort publication date from result metadata or the URL path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<NaiveDate>,
}

impl EvidencePage {
    /// Title, snippet, and body joined for extraction. Headline text comes
    /// first so first-match-wins rules see it before boilerplate.
    pub fn combined_text(&self) -> String {
        [
            self.title.as_str(),
            self.snippet.as_str(),
            self.fetched_text.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

// --- Extracted facts ---

/// Facts pulled out of one blob of text. A field is present only when
/// extraction succeeded; nothing is guessed or defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_usd: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub announced_on: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub investors: Vec<String>,
}

impl FundingFacts {
    pub fn is_empty(&self) -> bool {
        self.round_type.is_none()
            && self.amount_usd.is_none()
            && self.announced_on.is_none()
            && self.investors.is_empty()
    }
}

/// A candidate page with its extracted facts and reliability score.
/// The score is fixed once computed.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredCandidate {
    pub page: EvidencePage,
    pub facts: FundingFacts,
    pub score: f64,
}

// --- Output record ---

/// The merged best-guess funding snapshot for one company, one run.
/// Built once by the merge step; never partially updated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundingRecord {
    pub funding_present: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_round_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_round_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_round_amount_usd: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_funding_usd: Option<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub investors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funding_sources: Vec<String>,
    #[serde(default)]
    pub source_cb: bool,
}

impl FundingRecord {
    /// True when no data field carries a usable value. Zero amounts and
    /// empty strings count as absent. `funding_present` and `source_cb`
    /// are markers, not data, and do not count.
    pub fn is_empty(&self) -> bool {
        self.last_round_type
            .as_deref()
            .is_none_or(|s| s.trim().is_empty())
            && self.last_round_date.is_none()
            && self.last_round_amount_usd.unwrap_or(0) == 0
            && self.total_funding_usd.unwrap_or(0) == 0
            && self.investors.is_empty()
            && self.funding_sources.is_empty()
    }
}
