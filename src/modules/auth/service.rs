use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use academy_auth::create_access_token;
use academy_config::JwtConfig;
use academy_core::{AppError, verify_password};

use crate::metrics;

use super::model::{Admin, AdminProfile, LoginRequest, LoginResponse, UpdateProfileDto};

const ADMIN_COLUMNS: &str =
    "id, username, email, password, role, is_active, created_at, updated_at";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config, dto), fields(db.table = "admins"))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<LoginResponse, AppError> {
        let email = dto.email.trim().to_lowercase();

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE LOWER(email) = $1"
        ))
        .bind(&email)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching admin for login");
            AppError::from(e)
        })?;

        let Some(admin) = admin.filter(|admin| admin.is_active) else {
            debug!("Login attempt for unknown or inactive admin");
            metrics::track_login_failure("unknown_admin");
            return Err(AppError::unauthorized("Invalid email or password"));
        };

        if !verify_password(&dto.password, &admin.password)? {
            warn!(admin.id = %admin.id, "Login attempt with wrong password");
            metrics::track_login_failure("invalid_password");
            return Err(AppError::unauthorized("Invalid email or password"));
        }

        let token = create_access_token(admin.id, &admin.email, admin.role.as_str(), jwt_config)?;

        metrics::track_login_success(admin.role.as_str());
        metrics::track_jwt_issued();
        info!(admin.id = %admin.id, admin.role = %admin.role, "Admin logged in");

        Ok(LoginResponse {
            admin: admin.into(),
            token,
        })
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "admins"))]
    pub async fn find_admin_by_id(db: &PgPool, admin_id: Uuid) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>(&format!(
            "SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"
        ))
        .bind(admin_id)
        .fetch_optional(db)
        .await?;

        Ok(admin)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "admins"))]
    pub async fn update_profile(
        db: &PgPool,
        admin_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<AdminProfile, AppError> {
        let username = dto.username.map(|u| u.trim().to_string());
        let email = dto.email.map(|e| e.trim().to_lowercase());

        let admin = sqlx::query_as::<_, Admin>(&format!(
            "UPDATE admins
             SET username = COALESCE($1, username),
                 email = COALESCE($2, email),
                 updated_at = NOW()
             WHERE id = $3
             RETURNING {ADMIN_COLUMNS}"
        ))
        .bind(&username)
        .bind(&email)
        .bind(admin_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                warn!(admin.id = %admin_id, "Profile update collides with another admin");
                return AppError::conflict(anyhow::anyhow!("Username or email already in use"));
            }
            error!(error = %e, admin.id = %admin_id, "Database error updating profile");
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Admin not found")))?;

        info!(admin.id = %admin.id, "Profile updated");

        Ok(admin.into())
    }
}
