use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use academy_core::serde::deserialize_trimmed;

use crate::admins::AdminProfile;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Valid email is required"))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub admin: AdminProfile,
    pub token: String,
}
