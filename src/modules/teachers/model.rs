pub use academy_models::classes::Class;
pub use academy_models::teachers::{
    CreateTeacherDto, Teacher, TeacherDetails, TeacherWithClassCount, UpdateTeacherDto,
};

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCreated {
    pub teacher_id: Uuid,
}
