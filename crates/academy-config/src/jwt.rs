use std::env;

/// Seven days, matching the admin session length.
pub const DEFAULT_TOKEN_EXPIRY_SECS: i64 = 604_800;

const DEVELOPMENT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_token_expiry: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEVELOPMENT_SECRET.to_string()),
            access_token_expiry: env::var("JWT_EXPIRY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TOKEN_EXPIRY_SECS),
        }
    }

    /// True when tokens would be signed with the built-in development secret.
    pub fn is_default_secret(&self) -> bool {
        self.secret == DEVELOPMENT_SECRET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_detection() {
        let config = JwtConfig {
            secret: DEVELOPMENT_SECRET.to_string(),
            access_token_expiry: DEFAULT_TOKEN_EXPIRY_SECS,
        };
        assert!(config.is_default_secret());

        let config = JwtConfig {
            secret: "rotated".to_string(),
            ..config
        };
        assert!(!config.is_default_secret());
    }
}
