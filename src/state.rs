use academy_config::{CorsConfig, JwtConfig, RateLimitConfig, ServerConfig};
use sqlx::PgPool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub server_config: ServerConfig,
}

impl AppState {
    pub fn new(
        db: PgPool,
        jwt_config: JwtConfig,
        cors_config: CorsConfig,
        rate_limit_config: RateLimitConfig,
        server_config: ServerConfig,
    ) -> Self {
        Self {
            db,
            jwt_config,
            cors_config,
            rate_limit_config,
            server_config,
        }
    }

    /// State with every setting read from the environment.
    pub fn from_env(db: PgPool) -> Self {
        Self::new(
            db,
            JwtConfig::from_env(),
            CorsConfig::from_env(),
            RateLimitConfig::from_env(),
            ServerConfig::from_env(),
        )
    }
}
