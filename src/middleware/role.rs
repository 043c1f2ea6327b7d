use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use academy_core::AppError;
use academy_models::AdminRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Roles allowed to manage registrations, classes and teachers.
pub const ADMIN_ROLES: &[AdminRole] = &[AdminRole::Admin, AdminRole::SuperAdmin];

/// Check if the authenticated admin holds any of the given roles.
pub fn has_any_role(auth_user: &AuthUser, roles: &[AdminRole]) -> bool {
    roles.contains(&auth_user.role())
}

pub fn check_any_role(auth_user: &AuthUser, roles: &[AdminRole]) -> Result<(), AppError> {
    if has_any_role(auth_user, roles) {
        return Ok(());
    }

    warn!(
        admin.id = %auth_user.admin_id(),
        admin.role = %auth_user.role(),
        "Admin lacks required role"
    );
    Err(AppError::forbidden(format!(
        "Role {} is not authorized to access this resource",
        auth_user.role()
    )))
}

/// Authenticated admin holding one of [`ADMIN_ROLES`].
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_any_role(&auth_user, ADMIN_ROLES)?;
        Ok(AdminUser(auth_user))
    }
}
