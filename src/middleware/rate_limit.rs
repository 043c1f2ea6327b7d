//! Per-IP rate limiting with `tower_governor`.
//!
//! Two buckets are kept per client: a general one covering every `/api`
//! route and a stricter one stacked on top for `/api/auth`. Clients are keyed
//! by the socket peer unless `trust_proxy_headers` is set, in which case the
//! forwarding headers written by the reverse proxy are used.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::Response;
use axum::response::IntoResponse;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor};
use tower_governor::{GovernorError, GovernorLayer};
use tracing::{debug, error, warn};

use academy_config::RateLimitConfig;
use academy_core::AppError;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests from this IP, please try again later.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    General,
    Auth,
}

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::General => "general",
            Bucket::Auth => "auth",
        }
    }

    fn builder<K: KeyExtractor>(
        self,
        config: &RateLimitConfig,
        key_extractor: K,
    ) -> GovernorConfigBuilder<K, ::governor::middleware::NoOpMiddleware> {
        match self {
            Bucket::General => config.general_governor_builder(key_extractor),
            Bucket::Auth => config.auth_governor_builder(key_extractor),
        }
    }
}

/// Maps governor rejections onto the API error envelope.
pub fn rate_limit_error(err: GovernorError, bucket: Bucket) -> Response<Body> {
    match err {
        GovernorError::TooManyRequests { wait_time, .. } => {
            warn!(bucket = bucket.as_str(), retry_after_secs = wait_time, "Rate limit exceeded");
            AppError::too_many_requests(RATE_LIMIT_MESSAGE).into_response()
        }
        GovernorError::UnableToExtractKey => {
            error!(bucket = bucket.as_str(), "Unable to determine client address for rate limiting");
            AppError::internal_error("Unable to determine client address").into_response()
        }
        other => {
            error!(bucket = bucket.as_str(), error = ?other, "Rate limiter failed");
            AppError::internal_error("Rate limiter failed").into_response()
        }
    }
}

/// Wraps `router` with the bucket's governor layer. A no-op when limiting is
/// disabled.
///
/// # Panics
///
/// Panics if governor rejects the quota, which the clamped config values rule
/// out.
pub fn with_rate_limit<S>(router: Router<S>, config: &RateLimitConfig, bucket: Bucket) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    if !config.enabled {
        return router;
    }

    if config.trust_proxy_headers {
        let governor = Arc::new(
            bucket
                .builder(config, SmartIpKeyExtractor)
                .finish()
                .expect("Failed to build rate limiter config"),
        );
        let limiter = governor.limiter().clone();
        spawn_cleanup(bucket, config.cleanup_interval(), move || {
            limiter.retain_recent();
            limiter.len()
        });
        router.layer(
            GovernorLayer::new(governor)
                .error_handler(move |err| rate_limit_error(err, bucket)),
        )
    } else {
        let governor = Arc::new(
            bucket
                .builder(config, PeerIpKeyExtractor)
                .finish()
                .expect("Failed to build rate limiter config"),
        );
        let limiter = governor.limiter().clone();
        spawn_cleanup(bucket, config.cleanup_interval(), move || {
            limiter.retain_recent();
            limiter.len()
        });
        router.layer(
            GovernorLayer::new(governor)
                .error_handler(move |err| rate_limit_error(err, bucket)),
        )
    }
}

/// Periodically drops buckets of clients that have gone quiet.
fn spawn_cleanup<F>(bucket: Bucket, interval: Duration, prune: F)
where
    F: Fn() -> usize + Send + 'static,
{
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        warn!(bucket = bucket.as_str(), "No runtime; idle rate limit buckets will not be pruned");
        return;
    };

    handle.spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let clients = prune();
            debug!(bucket = bucket.as_str(), clients, "Pruned idle rate limit buckets");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_bucket_names() {
        assert_eq!(Bucket::General.as_str(), "general");
        assert_eq!(Bucket::Auth.as_str(), "auth");
    }

    #[test]
    fn test_missing_peer_address_is_server_error() {
        let response = rate_limit_error(GovernorError::UnableToExtractKey, Bucket::Auth);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_disabled_config_leaves_router_untouched() {
        let router: Router = Router::new();
        let _ = with_rate_limit(router, &RateLimitConfig::disabled(), Bucket::General);
    }
}
