//! Student registrations: the student row plus its review status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use academy_core::PaginationParams;
use academy_core::serde::{deserialize_optional_i64, deserialize_optional_uuid, deserialize_trimmed};

use crate::classes::ClassSummary;
use crate::parents::{Parent, ParentDto};
use crate::teachers::TeacherSummary;
use crate::validation::validate_student_birth_date;

pub const INVALID_STATUS_MESSAGE: &str = "Invalid Status, Must be pending, approved, or rejected";

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "registration_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    /// Change to the assigned class's enrollment counter when a registration
    /// moves from `self` to `next`. Only approved students occupy a seat.
    pub fn enrollment_delta(self, next: RegistrationStatus) -> i32 {
        match (
            self == RegistrationStatus::Approved,
            next == RegistrationStatus::Approved,
        ) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0,
        }
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RegistrationStatus::Pending),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            _ => Err(INVALID_STATUS_MESSAGE.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    /// Age in whole years when last assigned to a class.
    pub age: i32,
    pub class_id: Option<Uuid>,
    pub registration_status: RegistrationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentDto {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Student first name must be between 2 and 50 characters"
    ))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub first_name: String,
    #[validate(length(
        min = 2,
        max = 50,
        message = "Student last name must be between 2 and 50 characters"
    ))]
    #[serde(deserialize_with = "deserialize_trimmed")]
    pub last_name: String,
    #[validate(custom(function = "validate_student_birth_date"))]
    #[schema(value_type = String, format = Date, example = "2016-04-12")]
    pub date_of_birth: NaiveDate,
    pub class_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateRegistrationDto {
    #[validate(nested)]
    pub parent: ParentDto,
    #[validate(nested)]
    pub student: StudentDto,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCreated {
    pub parent_id: Uuid,
    pub student_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusDto {
    #[schema(example = "approved")]
    pub status: String,
}

/// `classId: null` (or omitting it) unassigns the student.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassAssignmentDto {
    #[serde(default)]
    pub class_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    CreatedAt,
    FirstName,
    LastName,
}

/// `createdAt | firstName | lastName`, prefixed with `-` for descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationSort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for RegistrationSort {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            descending: true,
        }
    }
}

impl RegistrationSort {
    /// Unknown fields fall back to newest first.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };

        let field = match name {
            "createdAt" | "created_at" => SortField::CreatedAt,
            "firstName" | "first_name" => SortField::FirstName,
            "lastName" | "last_name" => SortField::LastName,
            _ => return Self::default(),
        };

        Self { field, descending }
    }

    /// `ORDER BY` clause body. Only ever built from fixed strings.
    pub fn order_by(&self) -> &'static str {
        match (self.field, self.descending) {
            (SortField::CreatedAt, true) => "s.created_at DESC, s.id DESC",
            (SortField::CreatedAt, false) => "s.created_at ASC, s.id ASC",
            (SortField::FirstName, true) => "s.first_name DESC, s.id DESC",
            (SortField::FirstName, false) => "s.first_name ASC, s.id ASC",
            (SortField::LastName, true) => "s.last_name DESC, s.id DESC",
            (SortField::LastName, false) => "s.last_name ASC, s.id ASC",
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RegistrationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// `createdAt`, `firstName` or `lastName`; prefix with `-` for descending
    pub sort: Option<String>,
    /// Case-insensitive match on student and father names and father email
    pub search: Option<String>,
    /// `pending`, `approved`, `rejected` or `all`
    pub status: Option<String>,
    /// Class UUID or `all`
    #[serde(default, rename = "classId", deserialize_with = "deserialize_optional_uuid")]
    #[param(value_type = Option<String>)]
    pub class_id: Option<Uuid>,
}

impl RegistrationQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            page: self.page,
        }
    }

    pub fn sort(&self) -> RegistrationSort {
        RegistrationSort::parse(self.sort.as_deref())
    }

    /// `None` means no filter; empty and `all` are treated the same.
    pub fn status_filter(&self) -> Result<Option<RegistrationStatus>, String> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Flat result of the registration listing join.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationRow {
    #[sqlx(flatten)]
    pub student: Student,
    pub father_first_name: String,
    pub father_last_name: String,
    pub father_phone: String,
    pub father_email: String,
    pub mother_first_name: Option<String>,
    pub mother_last_name: Option<String>,
    pub mother_phone: Option<String>,
    pub mother_email: Option<String>,
    pub parent_created_at: DateTime<Utc>,
    pub parent_updated_at: DateTime<Utc>,
    pub class_name: Option<String>,
    pub class_start_time: Option<NaiveTime>,
    pub class_end_time: Option<NaiveTime>,
    pub class_age_min: Option<i32>,
    pub class_age_max: Option<i32>,
    pub class_max_students: Option<i32>,
    pub class_current_students: Option<i32>,
    pub teacher_id: Option<Uuid>,
    pub teacher_name: Option<String>,
    pub teacher_email: Option<String>,
    pub teacher_phone: Option<String>,
    pub teacher_specialization: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationWithDetails {
    #[serde(flatten)]
    pub student: Student,
    pub parent: Parent,
    pub class: Option<ClassSummary>,
    pub teacher: Option<TeacherSummary>,
}

impl From<RegistrationRow> for RegistrationWithDetails {
    fn from(row: RegistrationRow) -> Self {
        let parent = Parent {
            id: row.student.parent_id,
            father_first_name: row.father_first_name,
            father_last_name: row.father_last_name,
            father_phone: row.father_phone,
            father_email: row.father_email,
            mother_first_name: row.mother_first_name,
            mother_last_name: row.mother_last_name,
            mother_phone: row.mother_phone,
            mother_email: row.mother_email,
            created_at: row.parent_created_at,
            updated_at: row.parent_updated_at,
        };

        // Class columns are NOT NULL, so a matched join always has a name.
        let class = match (row.student.class_id, row.class_name) {
            (Some(id), Some(name)) => Some(ClassSummary {
                id,
                name,
                start_time: row.class_start_time.unwrap_or_default(),
                end_time: row.class_end_time.unwrap_or_default(),
                age_min: row.class_age_min.unwrap_or_default(),
                age_max: row.class_age_max.unwrap_or_default(),
                max_students: row.class_max_students.unwrap_or_default(),
                current_students: row.class_current_students.unwrap_or_default(),
            }),
            _ => None,
        };

        let teacher = match (row.teacher_id, row.teacher_name, row.teacher_email) {
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
            student: row.student,
            parent,
            class,
            teacher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    #[test]
    fn test_enrollment_delta() {
        use RegistrationStatus::*;

        assert_eq!(Pending.enrollment_delta(Approved), 1);
        assert_eq!(Rejected.enrollment_delta(Approved), 1);
        assert_eq!(Approved.enrollment_delta(Rejected), -1);
        assert_eq!(Approved.enrollment_delta(Pending), -1);
        assert_eq!(Approved.enrollment_delta(Approved), 0);
        assert_eq!(Pending.enrollment_delta(Rejected), 0);
        assert_eq!(Rejected.enrollment_delta(Pending), 0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("approved".parse::<RegistrationStatus>(), Ok(RegistrationStatus::Approved));
        assert_eq!(" Rejected ".parse::<RegistrationStatus>(), Ok(RegistrationStatus::Rejected));
        assert_eq!(
            "archived".parse::<RegistrationStatus>(),
            Err(INVALID_STATUS_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!(RegistrationSort::parse(None), RegistrationSort::default());
        assert_eq!(
            RegistrationSort::parse(Some("firstName")),
            RegistrationSort {
                field: SortField::FirstName,
                descending: false
            }
        );
        assert_eq!(
            RegistrationSort::parse(Some("-lastName")).order_by(),
            "s.last_name DESC, s.id DESC"
        );
        assert_eq!(
            RegistrationSort::parse(Some("age; DROP TABLE students")),
            RegistrationSort::default()
        );
        assert_eq!(
            RegistrationSort::default().order_by(),
            "s.created_at DESC, s.id DESC"
        );
    }

    #[test]
    fn test_query_filters() {
        let query = RegistrationQuery {
            status: Some("all".to_string()),
            search: Some("   ".to_string()),
            ..RegistrationQuery::default()
        };
        assert_eq!(query.status_filter(), Ok(None));
        assert_eq!(query.search_term(), None);
        assert_eq!(query.pagination().page(), 1);

        let query = RegistrationQuery {
            status: Some("pending".to_string()),
            page: Some(3),
            limit: Some(5),
            ..RegistrationQuery::default()
        };
        assert_eq!(query.status_filter(), Ok(Some(RegistrationStatus::Pending)));
        assert_eq!(query.pagination().offset(), 10);

        let bad = RegistrationQuery {
            status: Some("done".to_string()),
            ..RegistrationQuery::default()
        };
        assert!(bad.status_filter().is_err());
    }

    fn registration(date_of_birth: NaiveDate) -> CreateRegistrationDto {
        CreateRegistrationDto {
            parent: ParentDto {
                father_first_name: "Yusuf".to_string(),
                father_last_name: "Haddad".to_string(),
                father_phone: "+15551234567".to_string(),
                father_email: "yusuf@example.com".to_string(),
                mother_first_name: None,
                mother_last_name: None,
                mother_phone: None,
                mother_email: None,
            },
            student: StudentDto {
                first_name: "Adam".to_string(),
                last_name: "Haddad".to_string(),
                date_of_birth,
                class_id: Uuid::new_v4(),
            },
        }
    }

    #[test]
    fn test_registration_validation_is_nested() {
        let today = academy_core::age::today();
        let eight = today.checked_sub_months(Months::new(12 * 8)).unwrap();
        assert!(registration(eight).validate().is_ok());

        let three = today.checked_sub_months(Months::new(12 * 3)).unwrap();
        let errors = registration(three).validate().unwrap_err();
        let fields = academy_core::errors::collect_field_errors(&errors);
        assert_eq!(
            fields.get("student.dateOfBirth").map(String::as_str),
            Some("Student must be between 5 and 14 years old")
        );
    }
}
