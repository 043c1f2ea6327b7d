use axum::{
    Json,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use academy_core::response::ErrorResponse;
use academy_core::{ApiResponse, AppError, MessageResponse};

use crate::middleware::role::AdminUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    Class, ClassCreated, ClassFilterParams, ClassWithTeacher, CreateClassDto, UpdateClassDto,
};
use super::service::ClassService;

/// List classes, optionally only those accepting a given age
#[utoipa::path(
    get,
    path = "/api/classes",
    params(ClassFilterParams),
    responses(
        (status = 200, description = "Classes with teacher and available spots", body = ApiResponse<Vec<ClassWithTeacher>>),
        (status = 400, description = "Invalid query", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state, filters))]
pub async fn get_classes(
    State(state): State<AppState>,
    filters: Result<Query<ClassFilterParams>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<ClassWithTeacher>>>, AppError> {
    let Query(filters) = filters
        .map_err(|e| AppError::bad_request(anyhow::anyhow!("Invalid query parameters: {}", e)))?;

    let classes = ClassService::get_classes(&state.db, filters.age).await?;
    Ok(Json(ApiResponse::data(classes)))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ApiResponse<ClassWithTeacher>),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ClassWithTeacher>>, AppError> {
    let class = ClassService::get_class_by_id(&state.db, id).await?;
    Ok(Json(ApiResponse::data(class)))
}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = ApiResponse<ClassCreated>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn create_class(
    State(state): State<AppState>,
    _admin: AdminUser,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<ApiResponse<ClassCreated>>), AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Class created successfully",
            ClassCreated { class_id: class.id },
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = ApiResponse<Class>),
        (status = 400, description = "Validation error or capacity below enrollment", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class or teacher not found", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin, dto))]
pub async fn update_class(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<ApiResponse<Class>>, AppError> {
    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(Json(ApiResponse::with_message(
        "Class updated successfully",
        class,
    )))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = Uuid, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse),
        (status = 409, description = "Students are still assigned", body = ErrorResponse)
    ),
    tag = "Classes",
    security(("bearer_auth" = []))
)]
#[instrument(skip(state, _admin))]
pub async fn delete_class(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    ClassService::delete_class(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Class deleted successfully")))
}
