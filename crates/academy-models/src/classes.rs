//! Age-bracketed classes with a capacity and a live enrollment counter.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use academy_core::serde::{
    deserialize_optional_i64, deserialize_optional_trimmed, deserialize_some, deserialize_trimmed,
};

use crate::teachers::TeacherSummary;
use crate::validation::{TIME_REGEX, parse_hh_mm};

pub const DEFAULT_MAX_STUDENTS: i32 = 20;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(value_type = String, example = "11:00:00")]
    pub end_time: NaiveTime,
    pub age_min: i32,
    pub age_max: i32,
    pub teacher_id: Option<Uuid>,
    pub max_students: i32,
    /// Approved students currently assigned.
    pub current_students: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn accepts_age(&self, age: i32) -> bool {
        (self.age_min..=self.age_max).contains(&age)
    }

    pub fn is_full(&self) -> bool {
        self.current_students >= self.max_students
    }

    pub fn available_spots(&self) -> i32 {
        (self.max_students - self.current_students).max(0)
    }
}

/// `classes` joined with `teachers`, teacher columns prefixed with `teacher_`.
#[derive(Debug, Clone, FromRow)]
pub struct ClassRow {
    #[sqlx(flatten)]
    pub class: Class,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub teacher_phone: Option<String>,
    pub teacher_specialization: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassWithTeacher {
    #[serde(flatten)]
    pub class: Class,
    pub available_spots: i32,
    pub teacher: Option<TeacherSummary>,
}

impl From<ClassRow> for ClassWithTeacher {
    fn from(row: ClassRow) -> Self {
        let teacher = match (row.class.teacher_id, row.teacher_name, row.teacher_email) {
            (Some(id), Some(name), Some(email)) => Some(TeacherSummary {
                id,
                name,
                email,
                phone: row.teacher_phone.unwrap_or_default(),
                specialization: row.teacher_specialization.unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            available_spots: row.class.available_spots(),
            class: row.class,
            teacher,
        }
    }
}

/// Short class description embedded in registration responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSummary {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String)]
    pub start_time: NaiveTime,
    #[schema(value_type = String)]
    pub end_time: NaiveTime,
    pub age_min: i32,
    pub age_max: i32,
    pub max_students: i32,
    pub current_students: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_create_class"))]
pub struct CreateClassDto {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Class name must be between 2 and 100 characters"
    ))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub name: String,
    #[validate(regex(path = *TIME_REGEX, message = "Start time must be in HH:MM format"))]
    #[schema(example = "09:00")]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub start_time: String,
    #[validate(regex(path = *TIME_REGEX, message = "End time must be in HH:MM format"))]
    #[schema(example = "11:00")]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub end_time: String,
    #[validate(range(min = 5, max = 14, message = "Minimum age must be between 5 and 14"))]
    pub age_min: i32,
    #[validate(range(min = 5, max = 14, message = "Maximum age must be between 5 and 14"))]
    pub age_max: i32,
    #[validate(range(min = 1, max = 20, message = "Max students must be between 1 and 20"))]
    pub max_students: Option<i32>,
    pub teacher_id: Option<Uuid>,
}

/// Partial update. `teacherId: null` removes the teacher.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_class"))]
pub struct UpdateClassDto {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Class name must be between 2 and 100 characters"
    ))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub name: Option<String>,
    #[validate(regex(path = *TIME_REGEX, message = "Start time must be in HH:MM format"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub start_time: Option<String>,
    #[validate(regex(path = *TIME_REGEX, message = "End time must be in HH:MM format"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub end_time: Option<String>,
    #[validate(range(min = 5, max = 14, message = "Minimum age must be between 5 and 14"))]
    pub age_min: Option<i32>,
    #[validate(range(min = 5, max = 14, message = "Maximum age must be between 5 and 14"))]
    pub age_max: Option<i32>,
    #[validate(range(min = 1, max = 20, message = "Max students must be between 1 and 20"))]
    pub max_students: Option<i32>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<Uuid>)]
    pub teacher_id: Option<Option<Uuid>>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClassFilterParams {
    /// Only classes whose age range contains this age
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub age: Option<i64>,
}

pub fn check_age_range(age_min: i32, age_max: i32) -> Result<(), ValidationError> {
    if age_min > age_max {
        return Err(ValidationError::new("age_range")
            .with_message("Minimum age cannot be greater than maximum age".into()));
    }
    Ok(())
}

/// Unparsable times pass; the `HH:MM` field rule reports them.
pub fn check_time_window(start_time: &str, end_time: &str) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (parse_hh_mm(start_time), parse_hh_mm(end_time))
        && start >= end
    {
        return Err(ValidationError::new("time_window")
            .with_message("End time must be after start time".into()));
    }
    Ok(())
}

fn validate_create_class(dto: &CreateClassDto) -> Result<(), ValidationError> {
    check_age_range(dto.age_min, dto.age_max)?;
    check_time_window(&dto.start_time, &dto.end_time)
}

fn validate_update_class(dto: &UpdateClassDto) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (dto.age_min, dto.age_max) {
        check_age_range(min, max)?;
    }
    if let (Some(start), Some(end)) = (&dto.start_time, &dto.end_time) {
        check_time_window(start, end)?;
    }
    Ok(())
}
