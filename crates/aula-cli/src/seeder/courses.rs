//! Course and group generation.

use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rayon::prelude::*;
use sqlx::{Postgres, QueryBuilder, Transaction};

use super::models::{CourseSeed, SEED_COURSE_PREFIX};
use crate::CliError;

const SUBJECTS: &[&str] = &[
    "Calculus",
    "Linear Algebra",
    "Physics",
    "Chemistry",
    "Programming",
    "Data Structures",
    "Statistics",
    "Databases",
    "Networks",
    "Operating Systems",
];

pub fn generate_courses(count: usize) -> Vec<CourseSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let subject = SUBJECTS[idx % SUBJECTS.len()];
            let level = idx / SUBJECTS.len() + 1;

            CourseSeed {
                code: format!("{}{:03}", SEED_COURSE_PREFIX, idx + 1),
                name: format!("{} {}", subject, level),
                description: Sentence(4..10).fake(),
                credits: (2..6).fake::<i32>(),
            }
        })
        .collect()
}

pub async fn insert_courses(
    tx: &mut Transaction<'_, Postgres>,
    courses: &[CourseSeed],
) -> Result<Vec<i32>, CliError> {
    if courses.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO courses (code, name, description, credits) ");
    builder.push_values(courses, |mut b, course| {
        b.push_bind(&course.code)
            .push_bind(&course.name)
            .push_bind(&course.description)
            .push_bind(course.credits);
    });
    builder.push(" RETURNING id");

    let ids = builder.build_query_scalar::<i32>().fetch_all(&mut **tx).await?;
    Ok(ids)
}

/// Inserts `per_course` groups for each course, assigning teachers round-robin.
pub async fn insert_groups(
    tx: &mut Transaction<'_, Postgres>,
    course_ids: &[i32],
    teacher_ids: &[i32],
    per_course: usize,
    capacity: i32,
    period: &str,
) -> Result<Vec<i32>, CliError> {
    let rows: Vec<(i32, Option<i32>, String)> = course_ids
        .iter()
        .flat_map(|&course_id| (0..per_course).map(move |n| (course_id, n)))
        .enumerate()
        .map(|(idx, (course_id, n))| {
            let teacher = if teacher_ids.is_empty() {
                None
            } else {
                Some(teacher_ids[idx % teacher_ids.len()])
            };
            (course_id, teacher, format!("G{}", n + 1))
        })
        .collect();

    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO course_groups (course_id, teacher_id, name, period, capacity) ",
    );
    builder.push_values(&rows, |mut b, (course_id, teacher_id, name)| {
        b.push_bind(*course_id)
            .push_bind(*teacher_id)
            .push_bind(name)
            .push_bind(period)
            .push_bind(capacity);
    });
    builder.push(" RETURNING id");

    let ids = builder.build_query_scalar::<i32>().fetch_all(&mut **tx).await?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_courses_uses_seed_prefix() {
        let courses = generate_courses(12);
        assert_eq!(courses.len(), 12);
        assert!(courses.iter().all(|c| c.code.starts_with(SEED_COURSE_PREFIX)));
        assert!(courses.iter().all(|c| (2..6).contains(&c.credits)));
        assert_eq!(courses[0].code, "SEED-001");
        assert_eq!(courses[10].name, "Calculus 2");
    }
}
