//! Search query generation from a company identity.

use std::collections::HashSet;

use fundsignal_common::CompanyIdentity;

/// Funding phrases OR-joined into the broad per-name query.
const FUNDING_TERMS: &[&str] = &[
    "raises",
    "raised",
    "fundraise",
    "funding",
    "\"funding round\"",
    "\"seed round\"",
    "\"pre-seed\"",
    "\"Series A\"",
    "\"Series B\"",
    "\"Series C\"",
    "\"venture round\"",
    "financing",
    "\"led by\"",
    "\"co-led by\"",
    "\"participation from\"",
];

/// Owner queries are built for the first few owners only; past that the
/// names stop being useful search handles.
const MAX_OWNER_QUERIES: usize = 2;

/// Build the query list for one company: broad funding queries per name
/// and alias, site-restricted queries when the domain is known, then
/// owner+company queries. Deduplicated, first-seen order preserved.
pub fn build_queries(identity: &CompanyIdentity) -> Vec<String> {
    let mut queries: Vec<String> = Vec::new();

    for name in identity.all_names() {
        queries.push(format!("{name} {}", FUNDING_TERMS.join(" OR ")));
        queries.push(format!("{name} announces funding OR raises OR financing"));
    }

    let domain = identity.domain.as_deref().map(str::trim).filter(|d| !d.is_empty());

    if let Some(domain) = domain {
        for section in ["press", "news", "blog"] {
            queries.push(format!("site:{domain} {section} raises OR funding OR seed OR series"));
        }
    }

    let company = identity.name.trim();
    for owner in identity
        .owners
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .take(MAX_OWNER_QUERIES)
    {
        queries.push(format!("\"{owner}\" {company} raises OR funding OR seed OR series"));
        queries.push(format!("\"{owner}\" {company} announces funding OR financing"));
    }

    if let Some(domain) = domain {
        queries.push(format!("site:{domain} \"funding\""));
        queries.push(format!("site:{domain} \"raises\""));
    }

    dedupe_preserving_order(queries)
}

fn dedupe_preserving_order(queries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for query in queries {
        if seen.insert(query.clone()) {
            out.push(query);
        }
    }
    out
}
