//! Development data: reference teachers, classes and admins, plus generated
//! registrations.

pub mod models;
pub mod reference;
pub mod registrations;

use sqlx::PgPool;

pub use reference::seed_reference;
pub use registrations::seed_registrations_only;

/// Removes registrations, teachers, classes and the reference admins.
/// Admins created with `create-admin` are kept.
pub async fn clear_all(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let mut tx = db.begin().await?;

    let students = sqlx::query("DELETE FROM students").execute(&mut *tx).await?;
    let parents = sqlx::query("DELETE FROM parents").execute(&mut *tx).await?;
    let classes = sqlx::query("DELETE FROM classes").execute(&mut *tx).await?;
    let teachers = sqlx::query("DELETE FROM teachers").execute(&mut *tx).await?;

    let seeded_emails: Vec<&str> = reference::ADMINS.iter().map(|a| a.email).collect();
    let admins = sqlx::query("DELETE FROM admins WHERE email = ANY($1)")
        .bind(&seeded_emails)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    println!(
        "   ✓ Removed {} students, {} parents, {} classes, {} teachers, {} admins",
        students.rows_affected(),
        parents.rows_affected(),
        classes.rows_affected(),
        teachers.rows_affected(),
        admins.rows_affected()
    );

    Ok(())
}
