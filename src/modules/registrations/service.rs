use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use academy_core::age::{age_today, calculate_age, today};
use academy_core::{AppError, PaginatedResponse, PaginationMeta};
use academy_db::constraint_name;
use academy_models::validation::escape_like;

use crate::metrics;

use super::model::{
    Class, CreateRegistrationDto, INVALID_STATUS_MESSAGE, ParentDto, RegistrationCreated,
    RegistrationQuery, RegistrationRow, RegistrationStatus, RegistrationWithDetails, Student,
};

const STUDENT_COLUMNS: &str = "id, parent_id, first_name, last_name, date_of_birth, age, class_id, \
     registration_status, created_at, updated_at";

const CLASS_COLUMNS: &str = "id, name, start_time, end_time, age_min, age_max, teacher_id, \
     max_students, current_students, created_at, updated_at";

const REGISTRATION_SELECT: &str = r#"
    SELECT s.id, s.parent_id, s.first_name, s.last_name, s.date_of_birth, s.age, s.class_id,
           s.registration_status, s.created_at, s.updated_at,
           p.father_first_name, p.father_last_name, p.father_phone, p.father_email,
           p.mother_first_name, p.mother_last_name, p.mother_phone, p.mother_email,
           p.created_at AS parent_created_at, p.updated_at AS parent_updated_at,
           c.name AS class_name, c.start_time AS class_start_time, c.end_time AS class_end_time,
           c.age_min AS class_age_min, c.age_max AS class_age_max,
           c.max_students AS class_max_students, c.current_students AS class_current_students,
           t.id AS teacher_id, t.name AS teacher_name, t.email AS teacher_email,
           t.phone AS teacher_phone, t.specialization AS teacher_specialization
    FROM students s
    INNER JOIN parents p ON p.id = s.parent_id
    LEFT JOIN classes c ON c.id = s.class_id
    LEFT JOIN teachers t ON t.id = c.teacher_id"#;

const REGISTRATION_FROM: &str =
    "FROM students s INNER JOIN parents p ON p.id = s.parent_id";

/// Listing filters, bound in declaration order as `$1..$n`.
#[derive(Debug, Default)]
struct RegistrationFilter {
    status: Option<RegistrationStatus>,
    class_id: Option<Uuid>,
    search: Option<String>,
}

impl RegistrationFilter {
    fn where_clause(&self) -> String {
        let mut clauses = Vec::new();
        let mut index = 0;

        if self.status.is_some() {
            index += 1;
            clauses.push(format!("s.registration_status = ${index}"));
        }
        if self.class_id.is_some() {
            index += 1;
            clauses.push(format!("s.class_id = ${index}"));
        }
        if self.search.is_some() {
            index += 1;
            clauses.push(format!(
                "(s.first_name ILIKE ${index} OR s.last_name ILIKE ${index} \
                 OR p.father_first_name ILIKE ${index} OR p.father_last_name ILIKE ${index} \
                 OR p.father_email ILIKE ${index})"
            ));
        }

        if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        }
    }
}

pub struct RegistrationService;

impl RegistrationService {
    /// Stores the parent (reusing the record keyed by father email) and a
    /// pending student. Eligibility is checked against the requested class.
    #[instrument(skip(db, dto), fields(class.id = %dto.student.class_id, db.table = "students"))]
    pub async fn create_registration(
        db: &PgPool,
        dto: CreateRegistrationDto,
    ) -> Result<RegistrationCreated, AppError> {
        let parent = dto.parent.normalized();
        let student = dto.student;

        let mut tx = db.begin().await?;

        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1 FOR SHARE"
        ))
        .bind(student.class_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            debug!(class.id = %student.class_id, "Registration for unknown class");
            AppError::not_found(anyhow::anyhow!("Selected class is not found"))
        })?;

        let age = calculate_age(student.date_of_birth, today());
        if !class.accepts_age(age) {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Student age ({}) is not appropriate for the class",
                age
            )));
        }
        if class.is_full() {
            return Err(AppError::bad_request(anyhow::anyhow!("Selected class is full")));
        }

        let parent_id = Self::upsert_parent(&mut tx, &parent).await?;

        let student_id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO students (parent_id, first_name, last_name, date_of_birth, age, class_id, registration_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(parent_id)
        .bind(student.first_name.trim())
        .bind(student.last_name.trim())
        .bind(student.date_of_birth)
        .bind(age)
        .bind(class.id)
        .bind(RegistrationStatus::Pending)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Database error inserting student");
            AppError::from(e)
        })?;

        tx.commit().await?;

        metrics::track_registration_created();
        info!(parent.id = %parent_id, student.id = %student_id, "Registration submitted");

        Ok(RegistrationCreated {
            parent_id,
            student_id,
        })
    }

    async fn upsert_parent(
        tx: &mut Transaction<'_, Postgres>,
        parent: &ParentDto,
    ) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO parents (father_first_name, father_last_name, father_phone, father_email,
                                  mother_first_name, mother_last_name, mother_phone, mother_email)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (father_email) DO UPDATE SET
                 father_first_name = EXCLUDED.father_first_name,
                 father_last_name = EXCLUDED.father_last_name,
                 father_phone = EXCLUDED.father_phone,
                 mother_first_name = COALESCE(EXCLUDED.mother_first_name, parents.mother_first_name),
                 mother_last_name = COALESCE(EXCLUDED.mother_last_name, parents.mother_last_name),
                 mother_phone = COALESCE(EXCLUDED.mother_phone, parents.mother_phone),
                 mother_email = COALESCE(EXCLUDED.mother_email, parents.mother_email),
                 updated_at = NOW()
             RETURNING id",
        )
        .bind(&parent.father_first_name)
        .bind(&parent.father_last_name)
        .bind(&parent.father_phone)
        .bind(&parent.father_email)
        .bind(&parent.mother_first_name)
        .bind(&parent.mother_last_name)
        .bind(&parent.mother_phone)
        .bind(&parent.mother_email)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if constraint_name(&e) == Some("parents_mother_email_key") {
                warn!("Mother email already registered to another parent");
                return AppError::conflict(anyhow::anyhow!(
                    "Mother email is already registered to another parent"
                ));
            }
            error!(error = %e, "Database error saving parent");
            AppError::from(e)
        })
    }

    #[instrument(skip(db, query), fields(db.operation = "SELECT", db.table = "students"))]
    pub async fn get_registrations(
        db: &PgPool,
        query: RegistrationQuery,
    ) -> Result<PaginatedResponse<RegistrationWithDetails>, AppError> {
        let status = query.status_filter().map_err(|_| {
            AppError::bad_request(anyhow::anyhow!(INVALID_STATUS_MESSAGE))
        })?;

        let filter = RegistrationFilter {
            status,
            class_id: query.class_id,
            search: query.search_term().map(|s| format!("%{}%", escape_like(s))),
        };
        let pagination = query.pagination();
        let limit = pagination.limit();
        let offset = pagination.offset();
        let where_clause = filter.where_clause();

        debug!(
            limit = %limit,
            offset = %offset,
            filter.status = ?filter.status,
            filter.class_id = ?filter.class_id,
            filter.search = ?filter.search,
            "Fetching registrations"
        );

        let count_query = format!("SELECT COUNT(*) {REGISTRATION_FROM}{where_clause}");
        let mut count_sql = sqlx::query_scalar::<_, i64>(&count_query);
        if let Some(status) = filter.status {
            count_sql = count_sql.bind(status);
        }
        if let Some(class_id) = filter.class_id {
            count_sql = count_sql.bind(class_id);
        }
        if let Some(search) = &filter.search {
            count_sql = count_sql.bind(search);
        }
        let total = count_sql.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting registrations");
            AppError::from(e)
        })?;

        let data_query = format!(
            "{REGISTRATION_SELECT}{where_clause} ORDER BY {} LIMIT {} OFFSET {}",
            query.sort().order_by(),
            limit,
            offset
        );
        let mut data_sql = sqlx::query_as::<_, RegistrationRow>(&data_query);
        if let Some(status) = filter.status {
            data_sql = data_sql.bind(status);
        }
        if let Some(class_id) = filter.class_id {
            data_sql = data_sql.bind(class_id);
        }
        if let Some(search) = &filter.search {
            data_sql = data_sql.bind(search);
        }
        let rows = data_sql.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching registrations");
            AppError::from(e)
        })?;

        debug!(total = %total, returned = %rows.len(), "Registrations fetched");

        Ok(PaginatedResponse::new(
            rows.into_iter().map(RegistrationWithDetails::from).collect(),
            PaginationMeta::new(&pagination, total),
        ))
    }

    #[instrument(skip(db), fields(db.operation = "SELECT", db.table = "students"))]
    pub async fn get_registration_by_id(
        db: &PgPool,
        student_id: Uuid,
    ) -> Result<RegistrationWithDetails, AppError> {
        let row = sqlx::query_as::<_, RegistrationRow>(&format!(
            "{REGISTRATION_SELECT} WHERE s.id = $1"
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))?;

        Ok(row.into())
    }

    /// Changes the review status, keeping the class counter equal to the
    /// number of approved students assigned to it.
    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "students"))]
    pub async fn update_status(
        db: &PgPool,
        student_id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let student = Self::lock_student(&mut tx, student_id).await?;
        let delta = student.registration_status.enrollment_delta(status);

        if delta != 0
            && let Some(class_id) = student.class_id
        {
            Self::adjust_enrollment(&mut tx, class_id, delta).await?;
        }

        let updated = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET registration_status = $1, updated_at = NOW()
             WHERE id = $2
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(status)
        .bind(student_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        metrics::track_registration_status_changed(status.as_str());
        info!(
            student.id = %student_id,
            from = %student.registration_status,
            to = %status,
            "Registration status changed"
        );

        Ok(updated)
    }

    /// Moves a student to another class, or clears the assignment when
    /// `class_id` is `None`. Approved students carry their seat with them.
    #[instrument(skip(db), fields(db.operation = "UPDATE", db.table = "students"))]
    pub async fn update_class(
        db: &PgPool,
        student_id: Uuid,
        class_id: Option<Uuid>,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await?;

        let student = Self::lock_student(&mut tx, student_id).await?;
        let approved = student.registration_status == RegistrationStatus::Approved;
        let age = age_today(student.date_of_birth);

        if let Some(new_class_id) = class_id
            && student.class_id != Some(new_class_id)
        {
            // Class rows are always locked in id order.
            let mut lock_ids = vec![new_class_id];
            if approved && let Some(old_class_id) = student.class_id {
                lock_ids.push(old_class_id);
            }
            let class = sqlx::query_as::<_, Class>(&format!(
                "SELECT {CLASS_COLUMNS} FROM classes WHERE id = ANY($1) ORDER BY id FOR UPDATE"
            ))
            .bind(&lock_ids)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .find(|class| class.id == new_class_id)
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class not found")))?;

            if !class.accepts_age(age) {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Student age ({}) is not appropriate for the class",
                    age
                )));
            }
            if class.is_full() {
                return Err(AppError::conflict(anyhow::anyhow!("Class is full")));
            }

            if approved {
                if let Some(old_class_id) = student.class_id {
                    Self::adjust_enrollment(&mut tx, old_class_id, -1).await?;
                }
                Self::adjust_enrollment(&mut tx, new_class_id, 1).await?;
            }
        } else if class_id.is_none()
            && approved
            && let Some(old_class_id) = student.class_id
        {
            Self::adjust_enrollment(&mut tx, old_class_id, -1).await?;
        }

        let updated = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET class_id = $1, age = $2, updated_at = NOW()
             WHERE id = $3
             RETURNING {STUDENT_COLUMNS}"
        ))
        .bind(class_id)
        .bind(age)
        .bind(student_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            student.id = %student_id,
            from = ?student.class_id,
            to = ?class_id,
            "Class assignment updated"
        );

        Ok(updated)
    }

    async fn lock_student(
        tx: &mut Transaction<'_, Postgres>,
        student_id: Uuid,
    ) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 FOR UPDATE"
        ))
        .bind(student_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Registration not found")))
    }

    /// Applies a +1/-1 change to `current_students`. Increments are guarded
    /// by capacity; decrements never go below zero.
    async fn adjust_enrollment(
        tx: &mut Transaction<'_, Postgres>,
        class_id: Uuid,
        delta: i32,
    ) -> Result<(), AppError> {
        if delta > 0 {
            let result = sqlx::query(
                "UPDATE classes SET current_students = current_students + 1, updated_at = NOW()
                 WHERE id = $1 AND current_students < max_students",
            )
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                debug!(class.id = %class_id, "Enrollment refused, class is full");
                return Err(AppError::conflict(anyhow::anyhow!("Class is full")));
            }
        } else if delta < 0 {
            let result = sqlx::query(
                "UPDATE classes SET current_students = current_students - 1, updated_at = NOW()
                 WHERE id = $1 AND current_students > 0",
            )
            .bind(class_id)
            .execute(&mut **tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(class.id = %class_id, "Enrollment counter already at zero");
            }
        }

        Ok(())
    }
}
