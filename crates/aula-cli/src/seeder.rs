//! Database seeding.
//!
//! Everything `seed_all` inserts is recognizable afterwards: accounts use the
//! `example.com` domain and course codes start with `SEED-`. `clear_all`
//! removes exactly that data and keeps administrator accounts.

pub mod courses;
pub mod models;
pub mod users;

use std::time::Instant;

use aula_core::hash_password;
use sqlx::{PgPool, Postgres, QueryBuilder};

pub use models::SeedConfig;

use crate::CliError;
use models::{SEED_COURSE_PREFIX, SEED_EMAIL_DOMAIN};

/// Password shared by every generated account.
pub const SEED_PASSWORD: &str = "password123";

/// Spreads students over groups, `per_student` groups each, without exceeding
/// `capacity` per group. Returns `(student_id, group_id)` pairs.
pub fn plan_enrollments(
    student_ids: &[i32],
    group_ids: &[i32],
    per_student: usize,
    capacity: i32,
) -> Vec<(i32, i32)> {
    if group_ids.is_empty() || capacity <= 0 {
        return Vec::new();
    }

    let per_student = per_student.min(group_ids.len());
    let mut filled = vec![0i32; group_ids.len()];
    let mut pairs = Vec::with_capacity(student_ids.len() * per_student);

    for (s_idx, &student_id) in student_ids.iter().enumerate() {
        let mut taken = 0;
        for step in 0..group_ids.len() {
            if taken == per_student {
                break;
            }
            let g_idx = (s_idx + step) % group_ids.len();
            if filled[g_idx] < capacity {
                filled[g_idx] += 1;
                pairs.push((student_id, group_ids[g_idx]));
                taken += 1;
            }
        }
    }

    pairs
}

/// Seeds courses, groups, teachers, students and enrollments in one transaction.
pub async fn seed_all(db: &PgPool, config: &SeedConfig) -> Result<(), CliError> {
    let start_time = Instant::now();
    println!("🌱 Seeding database...");

    let password_hash = hash_password(SEED_PASSWORD)
        .map_err(|e| format!("Failed to hash password: {}", e.message))?;

    let course_seeds = courses::generate_courses(config.courses);
    let teacher_seeds = users::generate_teachers(config.teachers, &password_hash);
    let student_seeds = users::generate_students(config.students, &password_hash);

    let mut tx = db.begin().await?;

    let course_ids = courses::insert_courses(&mut tx, &course_seeds).await?;
    println!("   ✓ {} courses", course_ids.len());

    let teacher_refs: Vec<_> = teacher_seeds.iter().collect();
    let teacher_ids = users::insert_users(&mut tx, &teacher_refs).await?;
    println!("   ✓ {} teachers", teacher_ids.len());

    let group_ids = courses::insert_groups(
        &mut tx,
        &course_ids,
        &teacher_ids,
        config.groups_per_course,
        config.group_capacity,
        &config.period,
    )
    .await?;
    println!("   ✓ {} groups", group_ids.len());

    let student_ids = users::insert_students(&mut tx, &student_seeds).await?;
    println!("   ✓ {} students", student_ids.len());

    let pairs = plan_enrollments(
        &student_ids,
        &group_ids,
        config.enrollments_per_student,
        config.group_capacity,
    );
    for chunk in pairs.chunks(5000) {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO enrollments (student_id, group_id) ");
        builder.push_values(chunk, |mut b, (student_id, group_id)| {
            b.push_bind(*student_id).push_bind(*group_id);
        });
        builder.build().execute(&mut *tx).await?;
    }
    println!("   ✓ {} enrollments", pairs.len());

    tx.commit().await?;

    println!("✅ Seeding completed in {:?}", start_time.elapsed());
    println!("   Seeded accounts use the password \"{}\"", SEED_PASSWORD);

    Ok(())
}

/// Removes seeded data. Administrator accounts are never deleted.
pub async fn clear_all(db: &PgPool) -> Result<(), CliError> {
    let start_time = Instant::now();
    println!("🗑️  Clearing seeded data...");

    let mut tx = db.begin().await?;

    // Cascades to groups, enrollments, attendance, evaluations and grades.
    let courses = sqlx::query("DELETE FROM courses WHERE code LIKE $1")
        .bind(format!("{}%", SEED_COURSE_PREFIX))
        .execute(&mut *tx)
        .await?
        .rows_affected();

    // Cascades to student profiles.
    let users = sqlx::query("DELETE FROM users WHERE email LIKE $1 AND role <> 'admin'")
        .bind(format!("%@{}", SEED_EMAIL_DOMAIN))
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;

    println!(
        "✅ Deleted {} courses and {} users in {:?}",
        courses,
        users,
        start_time.elapsed()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_enrollments_respects_capacity() {
        let students: Vec<i32> = (1..=10).collect();
        let groups = [100, 200];

        let pairs = plan_enrollments(&students, &groups, 2, 4);

        for group in groups {
            let count = pairs.iter().filter(|(_, g)| *g == group).count();
            assert!(count <= 4);
        }
        assert_eq!(pairs.len(), 8);
    }

    #[test]
    fn test_plan_enrollments_no_duplicates_per_student() {
        let students: Vec<i32> = (1..=5).collect();
        let groups = [1, 2, 3];

        let pairs = plan_enrollments(&students, &groups, 5, 100);

        assert_eq!(pairs.len(), 15);
        for student in students {
            let mut seen: Vec<i32> = pairs
                .iter()
                .filter(|(s, _)| *s == student)
                .map(|(_, g)| *g)
                .collect();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 3);
        }
    }

    #[test]
    fn test_plan_enrollments_without_groups() {
        assert!(plan_enrollments(&[1, 2], &[], 3, 10).is_empty());
    }
}
