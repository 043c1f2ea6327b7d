//! Seed records for reference and generated data.

use chrono::NaiveDate;
use uuid::Uuid;

use academy_models::AdminRole;

pub struct TeacherSeed {
    pub name: &'static str,
    pub email: &'static str,
    pub phone: &'static str,
    pub specialization: &'static str,
}

pub struct ClassSeed {
    pub name: &'static str,
    pub start_time: &'static str,
    pub end_time: &'static str,
    pub age_min: i32,
    pub age_max: i32,
    /// Index into the reference teacher list.
    pub teacher: usize,
    pub max_students: i32,
}

pub struct AdminSeed {
    pub username: &'static str,
    pub email: &'static str,
    pub role: AdminRole,
}

/// Class fields needed to place a generated student.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SeedClass {
    pub id: Uuid,
    pub age_min: i32,
    pub age_max: i32,
}

pub struct ParentSeed {
    pub father_first_name: String,
    pub father_last_name: String,
    pub father_phone: String,
    pub father_email: String,
    pub mother_first_name: Option<String>,
    pub mother_last_name: Option<String>,
    pub mother_phone: Option<String>,
    pub mother_email: Option<String>,
}

pub struct StudentSeed {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub age: i32,
    pub class_id: Uuid,
}

pub struct RegistrationSeed {
    pub parent: ParentSeed,
    pub student: StudentSeed,
}
