use chrono::NaiveDate;
use serde::Deserialize;

/// Response from POST /searches/organizations.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub entities: Vec<SearchEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntity {
    #[serde(default)]
    pub identifier: Identifier,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Identifier {
    #[serde(default)]
    pub uuid: Option<String>,
    #[serde(default)]
    pub permalink: Option<String>,
}

impl SearchResponse {
    /// Id of the first entity: uuid, falling back to permalink.
    pub(crate) fn first_id(&self) -> Option<String> {
        let identifier = &self.entities.first()?.identifier;
        identifier
            .uuid
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| identifier.permalink.clone().filter(|s| !s.is_empty()))
    }
}

/// Response from POST /entities/organizations/{id}.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityResponse {
    #[serde(default)]
    pub properties: Option<EntityProperties>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityProperties {
    #[serde(default)]
    pub funding_total_usd: Option<u64>,
    #[serde(default)]
    pub last_funding_type: Option<String>,
    #[serde(default)]
    pub last_funding_at: Option<String>,
    #[serde(default)]
    pub announced_on: Option<String>,
    #[serde(default)]
    pub last_funding_total_usd: Option<u64>,
    #[serde(default)]
    pub investors_names: Option<InvestorList>,
    #[serde(default)]
    pub investors: Option<InvestorList>,
}

/// Crunchbase serves investors as a list of names on some plans and as one
/// comma-joined string on others; anything else is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum InvestorList {
    Names(Vec<String>),
    Joined(String),
    Other(serde_json::Value),
}

impl InvestorList {
    fn into_names(self) -> Vec<String> {
        match self {
            InvestorList::Names(names) => names
                .into_iter()
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .collect(),
            InvestorList::Joined(joined) => joined
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            InvestorList::Other(_) => Vec::new(),
        }
    }
}

/// Normalized funding data for one organization. Empty strings and zero
/// amounts from the API are treated as absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FundingSnapshot {
    pub total_funding_usd: Option<u64>,
    pub last_round_type: Option<String>,
    pub last_round_date: Option<NaiveDate>,
    pub last_round_amount_usd: Option<u64>,
    /// Capped at 10 entries.
    pub investors: Vec<String>,
}

impl FundingSnapshot {
    pub fn is_empty(&self) -> bool {
        self.total_funding_usd.is_none()
            && self.last_round_type.is_none()
            && self.last_round_date.is_none()
            && self.last_round_amount_usd.is_none()
            && self.investors.is_empty()
    }
}

impl EntityProperties {
    pub(crate) fn into_snapshot(self) -> FundingSnapshot {
        let last_round_date = self
            .last_funding_at
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.announced_on.as_deref().filter(|s| !s.is_empty()))
            .and_then(parse_cb_date);

        let mut investors = self
            .investors_names
            .or(self.investors)
            .map(InvestorList::into_names)
            .unwrap_or_default();
        investors.truncate(10);

        FundingSnapshot {
            total_funding_usd: self.funding_total_usd.filter(|&v| v != 0),
            last_round_type: self
                .last_funding_type
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            last_round_date,
            last_round_amount_usd: self.last_funding_total_usd.filter(|&v| v != 0),
            investors,
        }
    }
}

/// Crunchbase dates are "YYYY-MM-DD"; tolerate a trailing time component.
fn parse_cb_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d").ok()
}
