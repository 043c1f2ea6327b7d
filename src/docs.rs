use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use academy_core::response::ErrorResponse;
use academy_core::{MessageResponse, PaginationMeta};
use academy_models::admins::{AdminProfile, AdminRole, UpdateProfileDto};
use academy_models::auth::{LoginRequest, LoginResponse};
use academy_models::classes::{
    Class, ClassSummary, ClassWithTeacher, CreateClassDto, UpdateClassDto,
};
use academy_models::parents::{Parent, ParentDto};
use academy_models::registrations::{
    CreateRegistrationDto, RegistrationCreated, RegistrationStatus, RegistrationWithDetails,
    Student, StudentDto, UpdateClassAssignmentDto, UpdateStatusDto,
};
use academy_models::teachers::{
    CreateTeacherDto, Teacher, TeacherDetails, TeacherSummary, TeacherWithClassCount,
    UpdateTeacherDto,
};

use crate::modules::classes::model::ClassCreated;
use crate::modules::health::controller::HealthResponse;
use crate::modules::teachers::model::TeacherCreated;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::controller::health_check,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::update_profile,
        crate::modules::registrations::controller::create_registration,
        crate::modules::registrations::controller::get_registrations,
        crate::modules::registrations::controller::get_registration,
        crate::modules::registrations::controller::update_status,
        crate::modules::registrations::controller::update_class,
        crate::modules::classes::controller::get_classes,
        crate::modules::classes::controller::get_class,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::update_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::teachers::controller::get_teachers,
        crate::modules::teachers::controller::get_teacher,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::update_teacher,
        crate::modules::teachers::controller::delete_teacher,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            MessageResponse,
            PaginationMeta,
            AdminProfile,
            AdminRole,
            UpdateProfileDto,
            LoginRequest,
            LoginResponse,
            Parent,
            ParentDto,
            Student,
            StudentDto,
            RegistrationStatus,
            CreateRegistrationDto,
            RegistrationCreated,
            RegistrationWithDetails,
            UpdateStatusDto,
            UpdateClassAssignmentDto,
            Class,
            ClassSummary,
            ClassWithTeacher,
            ClassCreated,
            CreateClassDto,
            UpdateClassDto,
            Teacher,
            TeacherSummary,
            TeacherWithClassCount,
            TeacherDetails,
            TeacherCreated,
            CreateTeacherDto,
            UpdateTeacherDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Authentication", description = "Administrator login and profile"),
        (name = "Registrations", description = "Student registration intake and review"),
        (name = "Classes", description = "Age-bracketed classes and capacity"),
        (name = "Teachers", description = "Teachers leading classes"),
    ),
    info(
        title = "Academy Registration API",
        version = "0.1.0",
        description = "Student registration and class management for a children's academy"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
