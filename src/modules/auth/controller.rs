use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::instrument;

use academy_core::response::ErrorResponse;
use academy_core::{ApiResponse, AppError};

use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{AdminProfile, LoginRequest, LoginResponse, UpdateProfileDto};
use super::service::AuthService;

pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// Login and receive a JWT
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful; also sets the `auth_token` cookie", body = ApiResponse<LoginResponse>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, jar, dto))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), AppError> {
    let response = AuthService::login(&state.db, &state.jwt_config, dto).await?;
    let jar = jar.add(auth_cookie(&state, response.token.clone()));
    Ok((jar, Json(ApiResponse::with_message("Login successful", response))))
}

/// Browser copy of the login token. Lives as long as the token itself.
fn auth_cookie(state: &AppState, token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .http_only(true)
        .secure(state.server_config.is_production())
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(time::Duration::seconds(state.jwt_config.access_token_expiry))
        .build()
}

/// Current admin profile
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Admin profile", body = ApiResponse<AdminProfile>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(auth_user), fields(admin.id = %auth_user.admin_id()))]
pub async fn get_profile(auth_user: AuthUser) -> Json<ApiResponse<AdminProfile>> {
    Json(ApiResponse::data(auth_user.admin))
}

/// Update username or email of the current admin
#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<AdminProfile>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 409, description = "Username or email already in use", body = ErrorResponse)
    ),
    tag = "Authentication",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, auth_user, dto), fields(admin.id = %auth_user.admin_id()))]
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ValidatedJson(dto): ValidatedJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<AdminProfile>>, AppError> {
    let profile = AuthService::update_profile(&state.db, auth_user.admin_id(), dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Profile updated successfully",
        profile,
    )))
}
