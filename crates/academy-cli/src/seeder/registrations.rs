//! Fake parents and pending students spread across the existing classes.

use std::time::Instant;

use chrono::{Days, Months, NaiveDate};
use fake::Fake;
use fake::faker::boolean::en::Boolean;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use academy_core::age::{calculate_age, today};

use super::models::{ParentSeed, RegistrationSeed, SeedClass, StudentSeed};

/// Rows per multi-value INSERT. Parents bind 8 parameters each.
const BATCH_SIZE: usize = 500;

/// Builds a registration whose student fits the age range of `class`.
pub fn generate_registration(
    index: usize,
    run: &str,
    class: &SeedClass,
    today: NaiveDate,
) -> RegistrationSeed {
    let father_first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let has_mother: bool = Boolean(50).fake();
    let (mother_first_name, mother_last_name, mother_phone, mother_email) = if has_mother {
        let first: String = FirstName().fake();
        (
            Some(first.clone()),
            Some(last_name.clone()),
            Some(format!("+1556{:07}", index % 10_000_000)),
            Some(format!(
                "{}.{}.{}.{}@example.com",
                first.to_lowercase(),
                last_name.to_lowercase(),
                run,
                index
            )),
        )
    } else {
        (None, None, None, None)
    };

    let parent = ParentSeed {
        father_email: format!(
            "{}.{}.{}.{}@example.com",
            father_first_name.to_lowercase(),
            last_name.to_lowercase(),
            run,
            index
        ),
        father_first_name,
        father_last_name: last_name.clone(),
        father_phone: format!("+1555{:07}", index % 10_000_000),
        mother_first_name,
        mother_last_name,
        mother_phone,
        mother_email,
    };

    let age: i32 = (class.age_min..=class.age_max).fake();
    let date_of_birth = birth_date_for_age(age, (1..300u64).fake(), today);

    let student = StudentSeed {
        first_name: FirstName().fake(),
        last_name,
        date_of_birth,
        age: calculate_age(date_of_birth, today),
        class_id: class.id,
    };

    RegistrationSeed { parent, student }
}

/// A birth date exactly `age` years and `days_before` days before `today`.
pub fn birth_date_for_age(age: i32, days_before: u64, today: NaiveDate) -> NaiveDate {
    let months = Months::new(age.max(0) as u32 * 12);
    today
        .checked_sub_months(months)
        .and_then(|d| d.checked_sub_days(Days::new(days_before.min(360))))
        .unwrap_or(today)
}

pub fn generate_registrations(
    count: usize,
    classes: &[SeedClass],
    today: NaiveDate,
) -> Vec<RegistrationSeed> {
    if classes.is_empty() {
        return Vec::new();
    }

    let run = Uuid::new_v4().simple().to_string()[..8].to_string();

    (0..count)
        .into_par_iter()
        .map(|i| generate_registration(i, &run, &classes[i % classes.len()], today))
        .collect()
}

async fn insert_parents_chunk(
    tx: &mut Transaction<'_, Postgres>,
    chunk: &[RegistrationSeed],
) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    let mut query = String::from(
        "INSERT INTO parents (father_first_name, father_last_name, father_phone, father_email, \
         mother_first_name, mother_last_name, mother_phone, mother_email) VALUES ",
    );

    for i in 0..chunk.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let base = i * 8;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${}, ${}, ${})",
            base + 1,
            base + 2,
            base + 3,
            base + 4,
            base + 5,
            base + 6,
            base + 7,
            base + 8
        ));
    }
    query.push_str(" RETURNING id");

    let mut q = sqlx::query_scalar::<_, Uuid>(&query);
    for seed in chunk {
        let parent = &seed.parent;
        q = q
            .bind(&parent.father_first_name)
            .bind(&parent.father_last_name)
            .bind(&parent.father_phone)
            .bind(&parent.father_email)
            .bind(&parent.mother_first_name)
            .bind(&parent.mother_last_name)
            .bind(&parent.mother_phone)
            .bind(&parent.mother_email);
    }

    Ok(q.fetch_all(&mut **tx).await?)
}

async fn insert_students_chunk(
    tx: &mut Transaction<'_, Postgres>,
    chunk: &[RegistrationSeed],
    parent_ids: &[Uuid],
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut query = String::from(
        "INSERT INTO students (parent_id, first_name, last_name, date_of_birth, age, class_id) VALUES ",
    );

    for i in 0..chunk.len() {
        if i > 0 {
            query.push_str(", ");
        }
        let base = i * 6;
        query.push_str(&format!(
            "(${}, ${}, ${}, ${}, ${}, ${})",
            base + 1,
            base + 2,
            base + 3,
            base + 4,
            base + 5,
            base + 6
        ));
    }

    let mut q = sqlx::query(&query);
    for (seed, parent_id) in chunk.iter().zip(parent_ids) {
        let student = &seed.student;
        q = q
            .bind(parent_id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(student.date_of_birth)
            .bind(student.age)
            .bind(student.class_id);
    }

    Ok(q.execute(&mut **tx).await?.rows_affected())
}

/// Inserts `count` pending registrations in a single transaction.
pub async fn seed_registrations_only(
    db: &PgPool,
    count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let classes = sqlx::query_as::<_, SeedClass>(
        "SELECT id, age_min, age_max FROM classes ORDER BY name",
    )
    .fetch_all(db)
    .await?;

    if classes.is_empty() {
        return Err("No classes found. Run `seed` first.".into());
    }

    println!("📝 Generating {} registrations across {} classes...", count, classes.len());
    let registrations = generate_registrations(count, &classes, today());

    let mut tx = db.begin().await?;
    let mut inserted = 0;
    for chunk in registrations.chunks(BATCH_SIZE) {
        let parent_ids = insert_parents_chunk(&mut tx, chunk).await?;
        if parent_ids.len() != chunk.len() {
            return Err("Parent insert returned an unexpected number of rows".into());
        }
        inserted += insert_students_chunk(&mut tx, chunk, &parent_ids).await?;
    }
    tx.commit().await?;

    println!("   ✓ {} pending registrations in {:?}", inserted, start_time.elapsed());

    Ok(())
}
