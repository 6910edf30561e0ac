//! Additive reliability scoring for evidence pages.

use fundsignal_common::{host_matches_domain, host_of, EvidencePage, FundingFacts};

/// Publishers whose funding coverage is reliable enough to boost a page.
/// Matching is host against entry with subdomains allowed, so the
/// `news.yahoo.com` entry matches that host and its subdomains without
/// blessing the rest of yahoo.com.
pub const TRUSTED_DOMAINS: &[&str] = &[
    "techcrunch.com",
    "businesswire.com",
    "prnewswire.com",
    "globenewswire.com",
    "news.yahoo.com",
    "venturebeat.com",
    "crunchbase.com",
    "pitchbook.com",
    "tech.eu",
    "sifted.eu",
    "blog.google",
];

/// Funding vocabulary. Lowercase; matched as case-insensitive substrings.
pub const FUNDING_VERBS: &[&str] = &[
    "raises",
    "raised",
    "announces funding",
    "announced funding",
    "closes",
    "closed",
    "secures",
    "secured",
    "lands",
    "snags",
    "bags",
    "series",
    "seed round",
    "pre-seed",
    "angel round",
    "venture round",
    "funding round",
    "financing",
];

/// True when any funding verb or phrase appears in the text.
pub fn contains_funding_verb(text: &str) -> bool {
    let lowered = text.to_lowercase();
    FUNDING_VERBS.iter().any(|verb| lowered.contains(verb))
}

/// Reliability of one candidate page in [0, 1].
///
/// Bonuses are additive: 0.35 for the company's own domain (subdomains
/// count, lookalike names do not), else 0.25 for a trusted publisher;
/// 0.20 for funding language anywhere in title, snippet, or body; 0.10
/// for an extracted amount; 0.05 each for a round label and investors.
/// The clamp keeps future bonuses from pushing past 1.0.
pub fn score_candidate(
    page: &EvidencePage,
    facts: &FundingFacts,
    company_domain: Option<&str>,
) -> f64 {
    let host = host_of(&page.url);
    let mut score: f64 = 0.0;

    if company_domain.is_some_and(|domain| host_matches_domain(&host, domain)) {
        score += 0.35;
    } else if TRUSTED_DOMAINS.iter().any(|trusted| host_matches_domain(&host, trusted)) {
        score += 0.25;
    }

    if contains_funding_verb(&page.title)
        || contains_funding_verb(&page.snippet)
        || contains_funding_verb(&page.fetched_text)
    {
        score += 0.20;
    }

    if facts.amount_usd.is_some() {
        score += 0.10;
    }
    if facts.round_type.is_some() {
        score += 0.05;
    }
    if !facts.investors.is_empty() {
        score += 0.05;
    }

    score.clamp(0.0, 1.0)
}
