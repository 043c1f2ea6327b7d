//! Admin account creation.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use academy_core::hash_password;
use academy_core::errors::collect_field_errors;
use academy_models::admins::CreateAdminDto;

/// Validates and inserts an admin. Fails if the username or email is taken.
pub async fn create_admin(
    db: &PgPool,
    dto: CreateAdminDto,
) -> Result<Uuid, Box<dyn std::error::Error>> {
    if let Err(errors) = dto.validate() {
        let messages: Vec<String> = collect_field_errors(&errors)
            .into_iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        return Err(messages.join(", ").into());
    }

    let hashed_password = hash_password(&dto.password).map_err(|e| e.error.to_string())?;

    let admin_id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO admins (username, email, password, role)
         VALUES ($1, $2, $3, $4)
         ON CONFLICT DO NOTHING
         RETURNING id",
    )
    .bind(dto.username.trim())
    .bind(dto.email.trim().to_lowercase())
    .bind(&hashed_password)
    .bind(dto.role)
    .fetch_optional(db)
    .await?;

    admin_id.ok_or_else(|| "Admin with this username or email already exists".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use academy_models::AdminRole;

    fn dto(username: &str, email: &str, password: &str) -> CreateAdminDto {
        CreateAdminDto {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: AdminRole::Admin,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_admin_then_duplicate(pool: PgPool) {
        let id = create_admin(&pool, dto("clerk", "Clerk@Example.com", "secret123"))
            .await
            .unwrap();

        let email: String = sqlx::query_scalar("SELECT email FROM admins WHERE id = $1")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(email, "clerk@example.com");

        let err = create_admin(&pool, dto("clerk", "other@example.com", "secret123"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn test_create_admin_rejects_short_password(pool: PgPool) {
        let err = create_admin(&pool, dto("clerk", "clerk@example.com", "123"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("password: Password must be at least 6 characters"));
    }
}
