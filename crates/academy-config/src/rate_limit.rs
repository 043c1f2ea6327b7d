//! Rate limiting configuration for API endpoints.
//!
//! Limits are applied per client IP with `tower_governor` token buckets.
//! Authentication routes get their own, stricter bucket.
//!
//! - `RATE_LIMIT_ENABLED`: turn limiting off entirely (default: true)
//! - `RATE_LIMIT_GENERAL_PER_SECOND`: token refill rate for `/api` (default: 2)
//! - `RATE_LIMIT_GENERAL_BURST_SIZE`: bucket size for `/api` (default: 30)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: token refill rate for `/api/auth` (default: 1)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket size for `/api/auth` (default: 5)
//! - `RATE_LIMIT_TRUST_PROXY`: key on `X-Forwarded-For` / `X-Real-IP` instead
//!   of the socket peer (default: false). Only enable behind a reverse proxy
//!   that overwrites these headers.
//! - `RATE_LIMIT_CLEANUP_INTERVAL_SECS`: how often idle client buckets are
//!   pruned (default: 60)

use std::time::Duration;

use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::KeyExtractor;

/// Upper bound for the refill rate; governor cannot represent a zero period.
const MAX_PER_SECOND: u64 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub general_per_second: u64,
    pub general_burst_size: u32,
    pub auth_per_second: u64,
    pub auth_burst_size: u32,
    pub trust_proxy_headers: bool,
    pub cleanup_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            general_per_second: 2,
            general_burst_size: 30,
            auth_per_second: 1,
            auth_burst_size: 5,
            trust_proxy_headers: false,
            cleanup_interval_secs: 60,
        }
    }
}

impl RateLimitConfig {
    /// Falls back to the defaults for unset or unparsable variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: env_flag("RATE_LIMIT_ENABLED").unwrap_or(defaults.enabled),
            general_per_second: env_parse("RATE_LIMIT_GENERAL_PER_SECOND")
                .unwrap_or(defaults.general_per_second),
            general_burst_size: env_parse("RATE_LIMIT_GENERAL_BURST_SIZE")
                .unwrap_or(defaults.general_burst_size),
            auth_per_second: env_parse("RATE_LIMIT_AUTH_PER_SECOND")
                .unwrap_or(defaults.auth_per_second),
            auth_burst_size: env_parse("RATE_LIMIT_AUTH_BURST_SIZE")
                .unwrap_or(defaults.auth_burst_size),
            trust_proxy_headers: env_flag("RATE_LIMIT_TRUST_PROXY")
                .unwrap_or(defaults.trust_proxy_headers),
            cleanup_interval_secs: env_parse("RATE_LIMIT_CLEANUP_INTERVAL_SECS")
                .unwrap_or(defaults.cleanup_interval_secs),
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Builder for the `/api` bucket, keyed by `key_extractor`.
    pub fn general_governor_builder<K: KeyExtractor>(
        &self,
        key_extractor: K,
    ) -> GovernorConfigBuilder<K, ::governor::middleware::NoOpMiddleware> {
        governor_builder(self.general_per_second, self.general_burst_size, key_extractor)
    }

    /// Builder for the stricter `/api/auth` bucket.
    pub fn auth_governor_builder<K: KeyExtractor>(
        &self,
        key_extractor: K,
    ) -> GovernorConfigBuilder<K, ::governor::middleware::NoOpMiddleware> {
        governor_builder(self.auth_per_second, self.auth_burst_size, key_extractor)
    }

    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

/// Zero values are bumped to one; governor rejects empty quotas.
fn governor_builder<K: KeyExtractor>(
    per_second: u64,
    burst_size: u32,
    key_extractor: K,
) -> GovernorConfigBuilder<K, ::governor::middleware::NoOpMiddleware> {
    GovernorConfigBuilder::default()
        .per_second(per_second.clamp(1, MAX_PER_SECOND))
        .burst_size(burst_size.max(1))
        .key_extractor(key_extractor)
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|v| !matches!(v.trim().to_lowercase().as_str(), "false" | "0" | "no" | "off"))
}
