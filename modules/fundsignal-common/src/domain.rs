//! Host and registered-domain helpers for "is this page on the company's
//! own site" checks.

/// Public suffixes spanning two labels, where the registered domain keeps
/// three (e.g. "blog.acme.co.uk" -> "acme.co.uk").
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "com.au", "net.au", "org.au", "co.nz", "co.jp", "co.in",
    "co.kr", "co.za", "com.br", "com.mx", "com.sg", "com.hk",
];

/// Lowercased host of a URL, without port. Accepts bare hosts and
/// scheme-less inputs.
pub fn host_of(url: &str) -> String {
    if let Some(host) = url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
    {
        return host;
    }
    url.split("://")
        .last()
        .unwrap_or(url)
        .split('/')
        .next()
        .unwrap_or("")
        .split(':')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Registered domain of a URL or host: subdomains stripped, public suffix
/// kept (e.g. "https://www.acme.com/press" -> "acme.com").
pub fn registered_domain(url_or_host: &str) -> String {
    let host = host_of(url_or_host);
    let parts: Vec<&str> = host.split('.').filter(|p| !p.is_empty()).collect();
    if parts.len() <= 2 {
        return parts.join(".");
    }
    let last_two = parts[parts.len() - 2..].join(".");
    if MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        parts[parts.len() - 3..].join(".")
    } else {
        last_two
    }
}

/// Exact-or-subdomain match with a dot boundary: "press.acme.com" matches
/// "acme.com", "notacme.com" does not.
pub fn host_matches_domain(host: &str, domain: &str) -> bool {
    let host = host.trim().to_lowercase();
    let domain = domain.trim().to_lowercase();
    if host.is_empty() || domain.is_empty() {
        return false;
    }
    host == domain || host.ends_with(&format!(".{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_of_handles_schemes_paths_and_ports() {
        assert_eq!(host_of("https://www.Acme.com/press/raise"), "www.acme.com");
        assert_eq!(host_of("http://acme.com:8080/x"), "acme.com");
        assert_eq!(host_of("acme.com/press"), "acme.com");
        assert_eq!(host_of("acme.com"), "acme.com");
    }

    #[test]
    fn registered_domain_strips_subdomains() {
        assert_eq!(registered_domain("https://press.acme.com/a"), "acme.com");
        assert_eq!(registered_domain("news.yahoo.com"), "yahoo.com");
        assert_eq!(registered_domain("acme.com"), "acme.com");
    }

    #[test]
    fn registered_domain_keeps_multi_label_suffixes() {
        assert_eq!(registered_domain("blog.acme.co.uk"), "acme.co.uk");
        assert_eq!(registered_domain("https://www.bbc.co.uk/news"), "bbc.co.uk");
    }

    #[test]
    fn host_match_requires_dot_boundary() {
        assert!(host_matches_domain("acme.com", "acme.com"));
        assert!(host_matches_domain("press.acme.com", "acme.com"));
        assert!(!host_matches_domain("notacme.com", "acme.com"));
        assert!(!host_matches_domain("", "acme.com"));
        assert!(!host_matches_domain("acme.com", ""));
    }
}
