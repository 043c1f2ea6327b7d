//! Fixed teachers, classes and admins for a fresh database.

use std::time::Instant;

use sqlx::PgPool;
use uuid::Uuid;

use academy_models::AdminRole;
use academy_models::validation::parse_hh_mm;

use super::models::{AdminSeed, ClassSeed, TeacherSeed};

/// Password of the seeded admin accounts.
pub const SEED_ADMIN_PASSWORD: &str = "admin123";

pub const TEACHERS: &[TeacherSeed] = &[
    TeacherSeed {
        name: "Ahmed Mahmoud",
        email: "ahmed.mahmoud@academy.example",
        phone: "+1234567890",
        specialization: "Recitation",
    },
    TeacherSeed {
        name: "Fatima Al-Zahra",
        email: "fatima.zahra@academy.example",
        phone: "+1234567891",
        specialization: "Language & Grammar",
    },
    TeacherSeed {
        name: "Omar Said",
        email: "omar.said@academy.example",
        phone: "+1234567892",
        specialization: "History & Studies",
    },
    TeacherSeed {
        name: "Aisha Selma",
        email: "aisha.selma@academy.example",
        phone: "+1234567893",
        specialization: "Memorization",
    },
];

pub const CLASSES: &[ClassSeed] = &[
    ClassSeed { name: "Beginners (5-6 years)", start_time: "09:00", end_time: "11:00", age_min: 5, age_max: 6, teacher: 0, max_students: 15 },
    ClassSeed { name: "Young Learners Morning (5-7 years)", start_time: "09:00", end_time: "11:00", age_min: 5, age_max: 7, teacher: 1, max_students: 20 },
    ClassSeed { name: "Young Learners Midday (5-7 years)", start_time: "11:15", end_time: "13:15", age_min: 5, age_max: 7, teacher: 0, max_students: 20 },
    ClassSeed { name: "Elementary Morning (7-10 years)", start_time: "09:00", end_time: "11:00", age_min: 7, age_max: 10, teacher: 2, max_students: 25 },
    ClassSeed { name: "Elementary Midday (7-10 years)", start_time: "11:15", end_time: "13:15", age_min: 7, age_max: 10, teacher: 1, max_students: 25 },
    ClassSeed { name: "Elementary Afternoon (7-10 years)", start_time: "13:30", end_time: "15:30", age_min: 7, age_max: 10, teacher: 3, max_students: 25 },
    ClassSeed { name: "Intermediate Morning (10-12 years)", start_time: "09:00", end_time: "11:00", age_min: 10, age_max: 12, teacher: 0, max_students: 20 },
    ClassSeed { name: "Intermediate Afternoon (10-12 years)", start_time: "13:30", end_time: "15:30", age_min: 10, age_max: 12, teacher: 2, max_students: 20 },
    ClassSeed { name: "Advanced Morning (12-14 years)", start_time: "09:00", end_time: "11:00", age_min: 12, age_max: 14, teacher: 1, max_students: 18 },
    ClassSeed { name: "Advanced Afternoon (12-14 years)", start_time: "13:30", end_time: "15:30", age_min: 12, age_max: 14, teacher: 3, max_students: 18 },
];

pub const ADMINS: &[AdminSeed] = &[
    AdminSeed {
        username: "admin",
        email: "admin@academy.example",
        role: AdminRole::SuperAdmin,
    },
    AdminSeed {
        username: "newAdmin",
        email: "newadmin@academy.example",
        role: AdminRole::Admin,
    },
];

/// Inserts the reference teachers, returning their ids in list order.
/// Existing teachers (matched by email) are reused.
pub async fn seed_teachers(db: &PgPool) -> Result<Vec<Uuid>, Box<dyn std::error::Error>> {
    println!("👩‍🏫 Seeding {} teachers...", TEACHERS.len());

    let mut ids = Vec::with_capacity(TEACHERS.len());
    for teacher in TEACHERS {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO teachers (name, email, phone, specialization)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (email) DO UPDATE SET updated_at = teachers.updated_at
             RETURNING id",
        )
        .bind(teacher.name)
        .bind(teacher.email)
        .bind(teacher.phone)
        .bind(teacher.specialization)
        .fetch_one(db)
        .await?;
        ids.push(id);
    }

    Ok(ids)
}

/// Inserts reference classes that do not exist yet (matched by name).
pub async fn seed_classes(
    db: &PgPool,
    teacher_ids: &[Uuid],
) -> Result<u64, Box<dyn std::error::Error>> {
    println!("🏫 Seeding {} classes...", CLASSES.len());

    let mut inserted = 0;
    for class in CLASSES {
        let start_time = parse_hh_mm(class.start_time)
            .ok_or_else(|| format!("Invalid start time for {}", class.name))?;
        let end_time = parse_hh_mm(class.end_time)
            .ok_or_else(|| format!("Invalid end time for {}", class.name))?;

        let result = sqlx::query(
            "INSERT INTO classes (name, start_time, end_time, age_min, age_max, teacher_id, max_students)
             SELECT $1, $2, $3, $4, $5, $6, $7
             WHERE NOT EXISTS (SELECT 1 FROM classes WHERE name = $1)",
        )
        .bind(class.name)
        .bind(start_time)
        .bind(end_time)
        .bind(class.age_min)
        .bind(class.age_max)
        .bind(teacher_ids.get(class.teacher).copied())
        .bind(class.max_students)
        .execute(db)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

pub async fn seed_admins(
    db: &PgPool,
    password_hash: &str,
) -> Result<u64, Box<dyn std::error::Error>> {
    println!("🔐 Seeding {} admins...", ADMINS.len());

    let mut inserted = 0;
    for admin in ADMINS {
        let result = sqlx::query(
            "INSERT INTO admins (username, email, password, role)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT DO NOTHING",
        )
        .bind(admin.username)
        .bind(admin.email)
        .bind(password_hash)
        .bind(admin.role)
        .execute(db)
        .await?;
        inserted += result.rows_affected();
    }

    Ok(inserted)
}

/// Seeds teachers, classes and admins.
pub async fn seed_reference(db: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let start_time = Instant::now();

    let password_hash = bcrypt::hash(SEED_ADMIN_PASSWORD, bcrypt::DEFAULT_COST)?;

    let teacher_ids = seed_teachers(db).await?;
    let classes = seed_classes(db, &teacher_ids).await?;
    let admins = seed_admins(db, &password_hash).await?;

    println!(
        "   ✓ {} teachers, {} new classes, {} new admins in {:?}",
        teacher_ids.len(),
        classes,
        admins,
        start_time.elapsed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_classes_are_consistent() {
        for class in CLASSES {
            assert!(class.age_min <= class.age_max, "{}", class.name);
            assert!(class.teacher < TEACHERS.len(), "{}", class.name);
            assert!(class.max_students > 0, "{}", class.name);

            let start = parse_hh_mm(class.start_time).unwrap();
            let end = parse_hh_mm(class.end_time).unwrap();
            assert!(start < end, "{}", class.name);
        }
    }

    #[test]
    fn test_reference_classes_cover_every_age() {
        for age in 5..=14 {
            assert!(
                CLASSES.iter().any(|c| (c.age_min..=c.age_max).contains(&age)),
                "no class for age {age}"
            );
        }
    }
}
