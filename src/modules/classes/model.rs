pub use academy_models::classes::{
    Class, ClassFilterParams, ClassRow, ClassWithTeacher, CreateClassDto, DEFAULT_MAX_STUDENTS,
    UpdateClassDto, check_age_range, check_time_window,
};

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassCreated {
    pub class_id: Uuid,
}
