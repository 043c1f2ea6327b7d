use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use tracing::debug;
use uuid::Uuid;

use academy_auth::{Claims, verify_token};
use academy_core::AppError;
use academy_models::{AdminProfile, AdminRole};

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

pub const MISSING_TOKEN_MESSAGE: &str = "Access denied. No token provided.";
pub const INACTIVE_ADMIN_MESSAGE: &str = "Invalid token or admin account is inactive";

/// Extractor that validates the bearer token and loads the admin it was
/// issued for. Rejects tokens of deleted or deactivated admins.
///
/// The result is cached in the request extensions, so stacking extractors
/// that depend on it costs a single lookup.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
    pub admin: AdminProfile,
}

impl AuthUser {
    pub fn admin_id(&self) -> Uuid {
        self.admin.id
    }

    pub fn role(&self) -> AdminRole {
        self.admin.role
    }

    pub fn email(&self) -> &str {
        &self.admin.email
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AppError::unauthorized(MISSING_TOKEN_MESSAGE)
                    } else {
                        AppError::unauthorized("Invalid token")
                    }
                })?;

        let claims = verify_token(bearer.token(), &state.jwt_config)?;
        let admin_id = claims
            .admin_id()
            .ok_or_else(|| AppError::unauthorized("Invalid token"))?;

        let admin = AuthService::find_admin_by_id(&state.db, admin_id)
            .await?
            .filter(|admin| admin.is_active)
            .ok_or_else(|| {
                debug!(admin.id = %admin_id, "Token presented for missing or inactive admin");
                AppError::unauthorized(INACTIVE_ADMIN_MESSAGE)
            })?;

        let auth_user = AuthUser {
            claims,
            admin: admin.into(),
        };
        parts.extensions.insert(auth_user.clone());

        Ok(auth_user)
    }
}
