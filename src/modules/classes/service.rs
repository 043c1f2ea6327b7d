use chrono::NaiveTime;
use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;
use validator::{ValidationError, ValidationErrors};

use academy_core::AppError;
use academy_db::{is_check_violation, is_foreign_key_violation};
use academy_models::validation::parse_hh_mm;

use crate::metrics;

use super::model::{
    Class, ClassRow, ClassWithTeacher, CreateClassDto, DEFAULT_MAX_STUDENTS, UpdateClassDto,
    check_age_range, check_time_window,
};

const CLASS_COLUMNS: &str = "id, name, start_time, end_time, age_min, age_max, teacher_id, \
     max_students, current_students, created_at, updated_at";

const CLASS_WITH_TEACHER_SELECT: &str = r#"
    SELECT c.id, c.name, c.start_time, c.end_time, c.age_min, c.age_max, c.teacher_id,
           c.max_students, c.current_students, c.created_at, c.updated_at,
           t.name AS teacher_name, t.email AS teacher_email, t.phone AS teacher_phone,
           t.specialization AS teacher_specialization
    FROM classes c
    LEFT JOIN teachers t ON t.id = c.teacher_id"#;

fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    parse_hh_mm(raw)
        .ok_or_else(|| AppError::bad_request(anyhow::anyhow!("Time must be in HH:MM format")))
}

fn schedule_error(err: ValidationError) -> AppError {
    let mut errors = ValidationErrors::new();
    errors.add("__all__", err);
    AppError::from_validation_errors(&errors)
}

pub struct ClassService;

impl ClassService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classes"))]
    pub async fn get_classes(
        db: &PgPool,
        age: Option<i64>,
    ) -> Result<Vec<ClassWithTeacher>, AppError> {
        let rows = match age {
            Some(age) => {
                let age = i32::try_from(age)
                    .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid age")))?;
                sqlx::query_as::<_, ClassRow>(&format!(
                    "{CLASS_WITH_TEACHER_SELECT}
                     WHERE c.age_min <= $1 AND c.age_max >= $1
                     ORDER BY c.start_time, c.name"
                ))
                .bind(age)
                .fetch_all(db)
                .await
            }
            None => {
                sqlx::query_as::<_, ClassRow>(&format!(
                    "{CLASS_WITH_TEACHER_SELECT} ORDER BY c.start_time, c.name"
                ))
                .fetch_all(db)
                .await
            }
        }
        .map_err(|e| {
            error!(error = %e, "Database error fetching classes");
            AppError::from(e)
        })?;

        debug!(returned = %rows.len(), "Classes fetched");

        Ok(rows.into_iter().map(ClassWithTeacher::from).collect())
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "classes"))]
    pub async fn get_class_by_id(db: &PgPool, class_id: Uuid) -> Result<ClassWithTeacher, AppError> {
        let row = sqlx::query_as::<_, ClassRow>(&format!(
            "{CLASS_WITH_TEACHER_SELECT} WHERE c.id = $1"
        ))
        .bind(class_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        Ok(row.into())
    }

    async fn ensure_teacher_exists(db: &PgPool, teacher_id: Uuid) -> Result<(), AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM teachers WHERE id = $1)",
        )
        .bind(teacher_id)
        .fetch_one(db)
        .await?;

        if !exists {
            debug!(teacher.id = %teacher_id, "Referenced teacher does not exist");
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }
        Ok(())
    }

    #[instrument(skip(db, dto), fields(class.name = %dto.name, db.operation = "INSERT", db.table = "classes"))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let start_time = parse_time(&dto.start_time)?;
        let end_time = parse_time(&dto.end_time)?;

        if let Some(teacher_id) = dto.teacher_id {
            Self::ensure_teacher_exists(db, teacher_id).await?;
        }

        let class = sqlx::query_as::<_, Class>(&format!(
            "INSERT INTO classes (name, start_time, end_time, age_min, age_max, teacher_id, max_students)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(start_time)
        .bind(end_time)
        .bind(dto.age_min)
        .bind(dto.age_max)
        .bind(dto.teacher_id)
        .bind(dto.max_students.unwrap_or(DEFAULT_MAX_STUDENTS))
        .fetch_one(db)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                return AppError::not_found(anyhow::anyhow!("Teacher not found"));
            }
            error!(error = %e, "Database error creating class");
            AppError::from(e)
        })?;

        metrics::track_class_created();
        info!(class.id = %class.id, class.name = %class.name, "Class created");

        Ok(class)
    }

    /// Partial update. Range and time-window rules are re-checked against
    /// the merged values.
    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "classes"))]
    pub async fn update_class(
        db: &PgPool,
        class_id: Uuid,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let existing = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
        ))
        .bind(class_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        let start_time = match &dto.start_time {
            Some(raw) => parse_time(raw)?,
            None => existing.start_time,
        };
        let end_time = match &dto.end_time {
            Some(raw) => parse_time(raw)?,
            None => existing.end_time,
        };
        let age_min = dto.age_min.unwrap_or(existing.age_min);
        let age_max = dto.age_max.unwrap_or(existing.age_max);
        let max_students = dto.max_students.unwrap_or(existing.max_students);
        let teacher_id = dto.teacher_id.unwrap_or(existing.teacher_id);

        check_age_range(age_min, age_max).map_err(schedule_error)?;
        check_time_window(
            &start_time.format("%H:%M").to_string(),
            &end_time.format("%H:%M").to_string(),
        )
        .map_err(schedule_error)?;

        if max_students < existing.current_students {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Max students cannot be less than current enrollment ({})",
                existing.current_students
            )));
        }

        if let Some(teacher_id) = teacher_id
            && existing.teacher_id != Some(teacher_id)
        {
            Self::ensure_teacher_exists(db, teacher_id).await?;
        }

        let class = sqlx::query_as::<_, Class>(&format!(
            "UPDATE classes
             SET name = $1, start_time = $2, end_time = $3, age_min = $4, age_max = $5,
                 teacher_id = $6, max_students = $7, updated_at = NOW()
             WHERE id = $8
             RETURNING {CLASS_COLUMNS}"
        ))
        .bind(dto.name.as_deref().map(str::trim).unwrap_or(&existing.name))
        .bind(start_time)
        .bind(end_time)
        .bind(age_min)
        .bind(age_max)
        .bind(teacher_id)
        .bind(max_students)
        .bind(class_id)
        .fetch_optional(db)
        .await
        .map_err(|e| {
            if is_check_violation(&e) {
                // current_students moved past the new capacity concurrently
                warn!(class.id = %class_id, "Class update violates capacity constraint");
                return AppError::bad_request(anyhow::anyhow!(
                    "Max students cannot be less than current enrollment"
                ));
            }
            error!(error = %e, class.id = %class_id, "Database error updating class");
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

        info!(class.id = %class.id, "Class updated");

        Ok(class)
    }

    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "classes"))]
    pub async fn delete_class(db: &PgPool, class_id: Uuid) -> Result<(), AppError> {
        let assigned = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE class_id = $1",
        )
        .bind(class_id)
        .fetch_one(db)
        .await?;

        if assigned > 0 {
            debug!(class.id = %class_id, assigned = %assigned, "Refusing to delete class with students");
            return Err(AppError::conflict(anyhow::anyhow!(
                "Cannot delete class with assigned students"
            )));
        }

        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(class_id)
            .execute(db)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    return AppError::conflict(anyhow::anyhow!(
                        "Cannot delete class with assigned students"
                    ));
                }
                error!(error = %e, class.id = %class_id, "Database error deleting class");
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Class not found")));
        }

        info!(class.id = %class_id, "Class deleted");

        Ok(())
    }
}
