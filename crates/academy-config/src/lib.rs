//! # Academy Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`server`]: bind address, ports and environment name
//! - [`database`]: connection string, pool size, startup migrations
//! - [`jwt`]: token signing secret and lifetime
//! - [`cors`]: allowed browser origins
//! - [`rate_limit`]: per-IP request quotas
//!
//! ```ignore
//! use academy_config::{JwtConfig, CorsConfig, RateLimitConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod database;
pub mod jwt;
pub mod rate_limit;
pub mod server;

pub use cors::CorsConfig;
pub use database::DatabaseConfig;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
