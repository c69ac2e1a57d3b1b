//! Client configuration.

use std::time::Duration;

/// How long each cached view is trusted before a fetch goes back to the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreshnessWindows {
    pub warehouse: Duration,
    pub store: Duration,
    pub reports: Duration,
    pub predictions: Duration,
}

impl Default for FreshnessWindows {
    fn default() -> Self {
        Self {
            warehouse: Duration::from_secs(60),
            store: Duration::from_secs(60),
            reports: Duration::from_secs(5 * 60),
            predictions: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root, without a trailing slash.
    pub base_url: String,
    pub request_timeout: Duration,
    /// Route handed to the navigator when the backend answers 401.
    pub login_route: String,
    /// Delay before a mutation's dependent views are refetched in the background.
    pub refetch_delay: Duration,
    pub freshness: FreshnessWindows,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout: Duration::from_secs(30),
            login_route: "/login".to_string(),
            refetch_delay: Duration::from_secs(1),
            freshness: FreshnessWindows::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            ..Self::default()
        }
    }

    /// Read overrides from the environment:
    ///
    /// - `SHELFLINE_API_URL`
    /// - `SHELFLINE_LOGIN_ROUTE`
    /// - `SHELFLINE_REFETCH_DELAY_MS`
    /// - `SHELFLINE_REQUEST_TIMEOUT_SECS`
    ///
    /// Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ClientConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        match lookup("SHELFLINE_API_URL") {
            Some(url) if !url.trim().is_empty() => config.base_url = normalize_base_url(url),
            _ => tracing::warn!(
                base_url = %config.base_url,
                "SHELFLINE_API_URL not set; using local default"
            ),
        }

        if let Some(route) = lookup("SHELFLINE_LOGIN_ROUTE").filter(|r| r.starts_with('/')) {
            config.login_route = route;
        }

        if let Some(ms) = parse_u64(&lookup, "SHELFLINE_REFETCH_DELAY_MS") {
            config.refetch_delay = Duration::from_millis(ms);
        }

        if let Some(secs) = parse_u64(&lookup, "SHELFLINE_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(secs);
        }

        config
    }
}

fn parse_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(%key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
