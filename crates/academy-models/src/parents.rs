//! Parents (guardians) of registered students.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use academy_core::serde::{deserialize_blank_as_none, deserialize_trimmed};

use crate::validation::PHONE_REGEX;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub id: Uuid,
    pub father_first_name: String,
    pub father_last_name: String,
    pub father_phone: String,
    pub father_email: String,
    pub mother_first_name: Option<String>,
    pub mother_last_name: Option<String>,
    pub mother_phone: Option<String>,
    pub mother_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parent section of a registration form. The father's email identifies the
/// family; submitting it again updates the stored contact details.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParentDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Father first name must be between 2 and 50 characters"
    ))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub father_first_name: String,
    #[validate(length(
        min = 2,
        max = 50,
        message = "Father last name must be between 2 and 50 characters"
    ))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub father_last_name: String,
    #[validate(regex(path = *PHONE_REGEX, message = "Valid father phone number is required"))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub father_phone: String,
    #[validate(email(message = "Valid father email is required"))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub father_email: String,
    #[validate(length(max = 20, message = "Mother first name must be at most 20 characters"))]
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub mother_first_name: Option<String>,
    #[validate(length(max = 50, message = "Mother last name must be at most 50 characters"))]
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub mother_last_name: Option<String>,
    #[validate(regex(path = *PHONE_REGEX, message = "Valid mother phone number is required"))]
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub mother_phone: Option<String>,
    #[validate(email(message = "Valid mother email is required"))]
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub mother_email: Option<String>,
}

impl ParentDto {
    /// Lowercases emails. Deserialization already trims, this also covers
    /// values built in code.
    pub fn normalized(self) -> Self {
        fn blank_to_none(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            father_first_name: self.father_first_name.trim().to_string(),
            father_last_name: self.father_last_name.trim().to_string(),
            father_phone: self.father_phone.trim().to_string(),
            father_email: self.father_email.trim().to_lowercase(),
            mother_first_name: blank_to_none(self.mother_first_name),
            mother_last_name: blank_to_none(self.mother_last_name),
            mother_phone: blank_to_none(self.mother_phone),
            mother_email: blank_to_none(self.mother_email).map(|e| e.to_lowercase()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_parent() -> ParentDto {
        ParentDto {
            father_first_name: "Yusuf".to_string(),
            father_last_name: "Haddad".to_string(),
            father_phone: "+15551234567".to_string(),
            father_email: "yusuf@example.com".to_string(),
            mother_first_name: None,
            mother_last_name: None,
            mother_phone: None,
            mother_email: None,
        }
    }

    #[test]
    fn test_valid_parent() {
        assert!(valid_parent().validate().is_ok());
    }

    #[test]
    fn test_invalid_father_fields() {
        let dto = ParentDto {
            father_first_name: "Y".to_string(),
            father_phone: "012".to_string(),
            father_email: "not-an-email".to_string(),
            ..valid_parent()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("father_first_name"));
        assert!(fields.contains_key("father_phone"));
        assert!(fields.contains_key("father_email"));
        assert!(!fields.contains_key("father_last_name"));
    }

    #[test]
    fn test_mother_fields_checked_only_when_present() {
        let dto = ParentDto {
            mother_first_name: Some("A name that is far too long".to_string()),
            mother_email: Some("bad".to_string()),
            ..valid_parent()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("mother_first_name"));
        assert!(errors.field_errors().contains_key("mother_email"));
    }

    #[test]
    fn test_blank_and_padded_names_are_trimmed_before_validation() {
        let dto: ParentDto = serde_json::from_value(serde_json::json!({
            "fatherFirstName": "   ",
            "fatherLastName": " X ",
            "fatherPhone": " +15551234567 ",
            "fatherEmail": " yusuf@example.com ",
            "motherFirstName": "  ",
        }))
        .unwrap();

        assert_eq!(dto.father_first_name, "");
        assert_eq!(dto.father_phone, "+15551234567");
        assert_eq!(dto.mother_first_name, None);

        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("father_first_name"));
        assert!(fields.contains_key("father_last_name"));
        assert!(!fields.contains_key("father_phone"));
        assert!(!fields.contains_key("father_email"));
    }

    #[test]
    fn test_normalized() {
        let dto = ParentDto {
            father_email: "  Yusuf@Example.COM ".to_string(),
            mother_first_name: Some("   ".to_string()),
            mother_email: Some("Maryam@Example.com".to_string()),
            ..valid_parent()
        }
        .normalized();

        assert_eq!(dto.father_email, "yusuf@example.com");
        assert_eq!(dto.mother_first_name, None);
        assert_eq!(dto.mother_email.as_deref(), Some("maryam@example.com"));
    }
}
