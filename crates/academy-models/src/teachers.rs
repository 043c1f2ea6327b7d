//! Teachers and their class assignments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use academy_core::serde::{deserialize_optional_trimmed, deserialize_trimmed};

use crate::classes::Class;
use crate::validation::PHONE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List entry: a teacher and how many classes they lead.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherWithClassCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub teacher: Teacher,
    pub class_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDetails {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub classes: Vec<Class>,
}

/// Teacher fields embedded in class and registration responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub specialization: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherDto {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Teacher name must be between 2 and 100 characters"
    ))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub name: String,
    #[validate(email(message = "Valid email is required"))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub email: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Valid phone number is required"))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub phone: String,
    #[validate(length(max = 200, message = "Specialization must be at most 200 characters"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub specialization: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherDto {
    #[validate(length(
        min = 2,
        max = 100,
        message = "Teacher name must be between 2 and 100 characters"
    ))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub name: Option<String>,
    #[validate(email(message = "Valid email is required"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub email: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Valid phone number is required"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub phone: Option<String>,
    #[validate(length(max = 200, message = "Specialization must be at most 200 characters"))]
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    pub specialization: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_teacher_validation() {
        let dto = CreateTeacherDto {
            name: "Omar Said".to_string(),
            email: "omar@quranschool.com".to_string(),
            phone: "+1234567892".to_string(),
            specialization: Some("Islamic Studies & Hadith".to_string()),
        };
        assert!(dto.validate().is_ok());

        let bad = CreateTeacherDto {
            name: "O".to_string(),
            email: "omar".to_string(),
            phone: "phone".to_string(),
            specialization: Some("x".repeat(201)),
        };
        let errors = bad.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 4);
    }

    #[test]
    fn test_details_flatten_teacher_fields() {
        let now = Utc::now();
        let details = TeacherDetails {
            teacher: Teacher {
                id: Uuid::new_v4(),
                name: "Aisha Selma".to_string(),
                email: "aisha@quranschool.com".to_string(),
                phone: "+1234567893".to_string(),
                specialization: "Quran Memorization".to_string(),
                created_at: now,
                updated_at: now,
            },
            classes: vec![],
        };
        let json = serde_json::to_value(details).unwrap();
        assert_eq!(json["name"], "Aisha Selma");
        assert!(json["classes"].as_array().unwrap().is_empty());
    }
}
