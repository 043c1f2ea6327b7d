use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use academy_core::response::ErrorResponse;
use academy_core::{ApiResponse, AppError, PaginatedResponse};

use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    CreateRegistrationDto, INVALID_STATUS_MESSAGE, RegistrationCreated, RegistrationQuery,
    RegistrationStatus, RegistrationWithDetails, Student, UpdateClassAssignmentDto,
    UpdateStatusDto,
};
use super::service::RegistrationService;

/// Submit a registration for a student
#[utoipa::path(
    post,
    path = "/api/registrations",
    request_body = CreateRegistrationDto,
    responses(
        (status = 201, description = "Registration submitted", body = ApiResponse<RegistrationCreated>),
        (status = 400, description = "Validation error, ineligible age or full class", body = ErrorResponse),
        (status = 404, description = "Selected class is not found", body = ErrorResponse),
        (status = 429, description = "Too many requests", body = ErrorResponse)
    ),
    tag = "Registrations"
)]
#[instrument(skip(state, dto))]
pub async fn create_registration(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateRegistrationDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegistrationCreated>>), AppError> {
    let created = RegistrationService::create_registration(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Registration created successfully",
            created,
        )),
    ))
}

/// List registrations with filters, search, sorting and pagination
#[utoipa::path(
    get,
    path = "/api/registrations",
    params(RegistrationQuery),
    responses(
        (status = 200, description = "Paginated registrations", body = PaginatedResponse<RegistrationWithDetails>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, query))]
pub async fn get_registrations(
    State(state): State<AppState>,
    _admin: AdminUser,
    query: Result<Query<RegistrationQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<RegistrationWithDetails>>, AppError> {
    let Query(query) = query
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let registrations = RegistrationService::get_registrations(&state.db, query).await?;
    Ok(Json(registrations))
}

/// Registration details
#[utoipa::path(
    get,
    path = "/api/registrations/{id}",
    params(("id" = Uuid, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Registration details", body = ApiResponse<RegistrationWithDetails>),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse)
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn get_registration(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RegistrationWithDetails>>, AppError> {
    let registration = RegistrationService::get_registration_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::data(registration)))
}

/// Approve, reject or reset a registration
#[utoipa::path(
    patch,
    path = "/api/registrations/{id}/status",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Student>),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Registration not found", body = ErrorResponse),
        (status = 409, description = "Class is full", body = ErrorResponse)
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin.id = %admin.0.admin_id()))]
pub async fn update_status(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateStatusDto>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let status: RegistrationStatus = dto
        .status
        .parse()
        .map_err(|_| AppError::bad_request(anyhow::anyhow!(INVALID_STATUS_MESSAGE)))?;

    let student = RegistrationService::update_status(&state.db, id, status).await?;
    Ok(Json(ApiResponse::with_message(
        format!("Registration {} successfully", status),
        student,
    )))
}

/// Assign a registration to another class, or clear the assignment
#[utoipa::path(
    patch,
    path = "/api/registrations/{id}/class",
    params(("id" = Uuid, Path, description = "Student ID")),
    request_body = UpdateClassAssignmentDto,
    responses(
        (status = 200, description = "Class assignment updated", body = ApiResponse<Student>),
        (status = 400, description = "Student age outside the class range", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Registration or class not found", body = ErrorResponse),
        (status = 409, description = "Class is full", body = ErrorResponse)
    ),
    tag = "Registrations",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, admin, dto), fields(admin.id = %admin.0.admin_id()))]
pub async fn update_class(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassAssignmentDto>,
) -> Result<Json<ApiResponse<Student>>, AppError> {
    let student = RegistrationService::update_class(&state.db, id, dto.class_id).await?;
    Ok(Json(ApiResponse::with_message(
        "Class assignment updated successfully",
        student,
    )))
}
