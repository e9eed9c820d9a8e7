use std::env;

pub const DEFAULT_CACHE_TTL_SECS: i64 = 300;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Configuration loaded from environment variables
pub struct Config {
    pub base_url: String,
    pub cache_ttl_secs: i64,
    pub fetch_timeout_secs: u64,
    pub fixture_dir: Option<String>,
    pub rust_log: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Everything has a default; set FIXTURE_DIR to serve analytics from
    /// on-disk JSON fixtures instead of live profile markup.
    pub fn from_env() -> Self {
        let base_url = env::var("MOLTBOOK_BASE_URL")
            .unwrap_or_else(|_| "https://moltbook.com".to_string());

        let cache_ttl_secs = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);

        let fixture_dir = env::var("FIXTURE_DIR").ok();
        let rust_log = env::var("RUST_LOG").ok();

        Self {
            base_url,
            cache_ttl_secs,
            fetch_timeout_secs,
            fixture_dir,
            rust_log,
        }
    }
}
