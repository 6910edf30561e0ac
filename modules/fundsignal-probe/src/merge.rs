//! Field-wise precedence merging of partial funding records.

use crunchbase_client::FundingSnapshot;
use fundsignal_common::{FundingFacts, FundingRecord};

/// Caps applied wherever a record is assembled or merged.
pub const MAX_INVESTORS: usize = 10;
pub const MAX_SOURCES: usize = 5;

/// Merge two records field by field. `primary` keeps its value unless it
/// is absent, empty, or zero, in which case `secondary` fills the gap.
/// `source_cb` survives from either side; `funding_present` is recomputed
/// from the merged fields so it can never contradict them.
pub fn merge(primary: FundingRecord, secondary: FundingRecord) -> FundingRecord {
    let mut merged = FundingRecord {
        funding_present: false,
        last_round_type: pick_text(primary.last_round_type, secondary.last_round_type),
        last_round_date: primary.last_round_date.or(secondary.last_round_date),
        last_round_amount_usd: pick_amount(
            primary.last_round_amount_usd,
            secondary.last_round_amount_usd,
        ),
        total_funding_usd: pick_amount(primary.total_funding_usd, secondary.total_funding_usd),
        investors: pick_list(primary.investors, secondary.investors),
        funding_sources: pick_list(primary.funding_sources, secondary.funding_sources),
        source_cb: primary.source_cb || secondary.source_cb,
    };
    merged.investors.truncate(MAX_INVESTORS);
    merged.funding_sources = dedupe_preserving_order(merged.funding_sources);
    merged.funding_sources.truncate(MAX_SOURCES);
    merged.funding_present = !merged.is_empty();
    merged
}

/// Lift extracted facts into the record shape, crediting `source_url`
/// when the facts carry anything.
pub fn record_from_facts(facts: &FundingFacts, source_url: Option<&str>) -> FundingRecord {
    if facts.is_empty() {
        return FundingRecord::default();
    }
    let mut investors = facts.investors.clone();
    investors.truncate(MAX_INVESTORS);
    FundingRecord {
        funding_present: true,
        last_round_type: facts.round_type.clone(),
        last_round_date: facts.announced_on,
        last_round_amount_usd: facts.amount_usd,
        total_funding_usd: None,
        investors,
        funding_sources: source_url.map(|u| vec![u.to_string()]).unwrap_or_default(),
        source_cb: false,
    }
}

/// Lift an authority snapshot into the record shape. `source_cb` is set
/// only when the snapshot actually carries data.
pub fn record_from_snapshot(snapshot: &FundingSnapshot) -> FundingRecord {
    if snapshot.is_empty() {
        return FundingRecord::default();
    }
    FundingRecord {
        funding_present: true,
        last_round_type: snapshot.last_round_type.clone(),
        last_round_date: snapshot.last_round_date,
        last_round_amount_usd: snapshot.last_round_amount_usd,
        total_funding_usd: snapshot.total_funding_usd,
        investors: snapshot.investors.iter().take(MAX_INVESTORS).cloned().collect(),
        funding_sources: Vec::new(),
        source_cb: true,
    }
}

pub(crate) fn dedupe_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

fn pick_text(primary: Option<String>, secondary: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(|| secondary.filter(|v| !v.trim().is_empty()))
}

fn pick_amount(primary: Option<u64>, secondary: Option<u64>) -> Option<u64> {
    primary.filter(|&v| v != 0).or_else(|| secondary.filter(|&v| v != 0))
}

fn pick_list(primary: Vec<String>, secondary: Vec<String>) -> Vec<String> {
    if primary.is_empty() {
        secondary
    } else {
        primary
    }
}
