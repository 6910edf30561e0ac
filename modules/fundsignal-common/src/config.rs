use std::env;

use tracing::info;

/// Pipeline configuration loaded from environment variables.
/// Secrets are optional; the pipeline runs whatever tiers have keys.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    // Google Custom Search
    pub google_api_key: Option<String>,
    pub google_cse_id: Option<String>,

    // Crunchbase
    pub crunchbase_api_key: Option<String>,

    // Timeouts (seconds)
    pub fetch_timeout_secs: u64,
    pub search_timeout_secs: u64,
    pub crunchbase_timeout_secs: u64,
    pub discovery_timeout_secs: u64,

    // Fanout bounds
    pub max_queries: usize,
    pub results_per_query: u32,
    pub max_discovery_pages: usize,
    pub fetch_concurrency: usize,

    // Client-side search quota
    pub search_rate_cps: f64,
    pub search_rate_burst: f64,

    // Search window
    pub lookback_days: u32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            google_api_key: None,
            google_cse_id: None,
            crunchbase_api_key: None,
            fetch_timeout_secs: 5,
            search_timeout_secs: 30,
            crunchbase_timeout_secs: 10,
            discovery_timeout_secs: 60,
            max_queries: 5,
            results_per_query: 5,
            max_discovery_pages: 20,
            fetch_concurrency: 8,
            search_rate_cps: 2.5,
            search_rate_burst: 5.0,
            lookback_days: 365,
        }
    }
}

impl ProbeConfig {
    /// Load configuration from environment variables.
    /// Panics with a clear message if a tunable is set but not numeric.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            google_api_key: optional_env("GOOGLE_API_KEY"),
            google_cse_id: optional_env("GOOGLE_CSE_ID"),
            crunchbase_api_key: optional_env("CRUNCHBASE_API_KEY"),
            fetch_timeout_secs: numeric_env("FETCH_TIMEOUT_SECS", defaults.fetch_timeout_secs),
            search_timeout_secs: numeric_env("SEARCH_TIMEOUT_SECS", defaults.search_timeout_secs),
            crunchbase_timeout_secs: numeric_env(
                "CRUNCHBASE_TIMEOUT_SECS",
                defaults.crunchbase_timeout_secs,
            ),
            discovery_timeout_secs: numeric_env(
                "DISCOVERY_TIMEOUT_SECS",
                defaults.discovery_timeout_secs,
            ),
            max_queries: numeric_env("MAX_QUERIES", defaults.max_queries),
            results_per_query: numeric_env("RESULTS_PER_QUERY", defaults.results_per_query),
            max_discovery_pages: numeric_env(
                "MAX_DISCOVERY_PAGES",
                defaults.max_discovery_pages,
            ),
            fetch_concurrency: numeric_env("FETCH_CONCURRENCY", defaults.fetch_concurrency),
            search_rate_cps: numeric_env("SEARCH_RATE_CPS", defaults.search_rate_cps),
            search_rate_burst: numeric_env("SEARCH_RATE_BURST", defaults.search_rate_burst),
            lookback_days: numeric_env("LOOKBACK_DAYS", defaults.lookback_days),
        }
    }

    /// True when both Google Custom Search credentials are present.
    pub fn has_search_credentials(&self) -> bool {
        self.google_api_key.is_some() && self.google_cse_id.is_some()
    }

    /// Log which integrations are configured without printing secrets.
    pub fn log_redacted(&self) {
        info!(
            google_search = self.has_search_credentials(),
            crunchbase = self.crunchbase_api_key.is_some(),
            lookback_days = self.lookback_days,
            max_queries = self.max_queries,
            max_discovery_pages = self.max_discovery_pages,
            fetch_concurrency = self.fetch_concurrency,
            "Probe configuration loaded"
        );
    }
}

fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn numeric_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{key} must be a number")),
        Err(_) => default,
    }
}
