use sqlx::PgPool;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use academy_core::AppError;
use academy_db::is_unique_violation;

use crate::metrics;

use super::model::{
    Class, CreateTeacherDto, Teacher, TeacherDetails, TeacherWithClassCount, UpdateTeacherDto,
};

const TEACHER_COLUMNS: &str = "id, name, email, phone, specialization, created_at, updated_at";

fn map_teacher_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        warn!("Teacher email already in use");
        return AppError::conflict(anyhow::anyhow!("Teacher with this email already exists"));
    }
    error!(error = %e, "Database error saving teacher");
    AppError::from(e)
}

pub struct TeacherService;

impl TeacherService {
    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "teachers"))]
    pub async fn get_teachers(db: &PgPool) -> Result<Vec<TeacherWithClassCount>, AppError> {
        let teachers = sqlx::query_as::<_, TeacherWithClassCount>(
            r#"
            SELECT t.id, t.name, t.email, t.phone, t.specialization, t.created_at, t.updated_at,
                   COUNT(c.id) AS class_count
            FROM teachers t
            LEFT JOIN classes c ON c.teacher_id = t.id
            GROUP BY t.id
            ORDER BY t.name
            "#,
        )
        .fetch_all(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error fetching teachers");
            AppError::from(e)
        })?;

        debug!(returned = %teachers.len(), "Teachers fetched");

        Ok(teachers)
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "teachers"))]
    pub async fn get_teacher_by_id(db: &PgPool, teacher_id: Uuid) -> Result<TeacherDetails, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(teacher_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        let classes = sqlx::query_as::<_, Class>(
            "SELECT id, name, start_time, end_time, age_min, age_max, teacher_id,
                    max_students, current_students, created_at, updated_at
             FROM classes WHERE teacher_id = $1
             ORDER BY start_time, name",
        )
        .bind(teacher_id)
        .fetch_all(db)
        .await?;

        Ok(TeacherDetails { teacher, classes })
    }

    #[instrument(skip(db, dto), fields(db.operation = "INSERT", db.table = "teachers"))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "INSERT INTO teachers (name, email, phone, specialization)
             VALUES ($1, $2, $3, $4)
             RETURNING {TEACHER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(dto.email.trim().to_lowercase())
        .bind(dto.phone.trim())
        .bind(dto.specialization.as_deref().map(str::trim).unwrap_or_default())
        .fetch_one(db)
        .await
        .map_err(map_teacher_write_error)?;

        metrics::track_teacher_created();
        info!(teacher.id = %teacher.id, "Teacher created");

        Ok(teacher)
    }

    #[instrument(skip(db, dto), fields(db.operation = "UPDATE", db.table = "teachers"))]
    pub async fn update_teacher(
        db: &PgPool,
        teacher_id: Uuid,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "UPDATE teachers
             SET name = COALESCE($1, name),
                 email = COALESCE($2, email),
                 phone = COALESCE($3, phone),
                 specialization = COALESCE($4, specialization),
                 updated_at = NOW()
             WHERE id = $5
             RETURNING {TEACHER_COLUMNS}"
        ))
        .bind(dto.name.as_deref().map(str::trim))
        .bind(dto.email.as_deref().map(|e| e.trim().to_lowercase()))
        .bind(dto.phone.as_deref().map(str::trim))
        .bind(dto.specialization.as_deref().map(str::trim))
        .bind(teacher_id)
        .fetch_optional(db)
        .await
        .map_err(map_teacher_write_error)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Teacher not found")))?;

        info!(teacher.id = %teacher.id, "Teacher updated");

        Ok(teacher)
    }

    /// Classes led by the teacher keep running without one.
    #[instrument(skip(db), fields(db.operation = "DELETE", db.table = "teachers"))]
    pub async fn delete_teacher(db: &PgPool, teacher_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(teacher_id)
            .execute(db)
            .await
            .map_err(|e| {
                error!(error = %e, teacher.id = %teacher_id, "Database error deleting teacher");
                AppError::from(e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("Teacher not found")));
        }

        info!(teacher.id = %teacher_id, "Teacher deleted");

        Ok(())
    }
}
