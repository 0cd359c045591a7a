//! Teacher and student generation.

use chrono::NaiveDate;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{Postgres, QueryBuilder, Transaction};

use super::models::{SEED_EMAIL_DOMAIN, StudentSeed, UserSeed};
use crate::CliError;

// Keeps each INSERT under the Postgres bind parameter limit.
const BATCH_SIZE: usize = 1000;

fn generate_user(role: &'static str, idx: usize, password_hash: &str) -> UserSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();

    let email = format!(
        "{}.{}+{}{}@{}",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        role,
        idx,
        SEED_EMAIL_DOMAIN
    );

    UserSeed {
        first_name,
        last_name,
        email,
        password_hash: password_hash.to_string(),
        role,
    }
}

pub fn generate_teachers(count: usize, password_hash: &str) -> Vec<UserSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| generate_user("docente", idx, password_hash))
        .collect()
}

pub fn generate_students(count: usize, password_hash: &str) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let year: i32 = (1995..2007).fake();
            let month: u32 = (1..13).fake();
            let day: u32 = (1..29).fake();

            StudentSeed {
                user: generate_user("estudiante", idx, password_hash),
                student_code: format!("S{:06}", idx + 1),
                birth_date: NaiveDate::from_ymd_opt(year, month, day),
            }
        })
        .collect()
}

pub async fn insert_users(
    tx: &mut Transaction<'_, Postgres>,
    users: &[&UserSeed],
) -> Result<Vec<i32>, CliError> {
    let mut ids = Vec::with_capacity(users.len());

    for chunk in users.chunks(BATCH_SIZE) {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO users (first_name, last_name, email, password, role) ",
        );
        builder.push_values(chunk, |mut b, user| {
            b.push_bind(&user.first_name)
                .push_bind(&user.last_name)
                .push_bind(&user.email)
                .push_bind(&user.password_hash)
                .push_bind(user.role);
        });
        builder.push(" RETURNING id");

        ids.extend(builder.build_query_scalar::<i32>().fetch_all(&mut **tx).await?);
    }

    Ok(ids)
}

/// Inserts the student users and their profiles; returns student ids.
pub async fn insert_students(
    tx: &mut Transaction<'_, Postgres>,
    students: &[StudentSeed],
) -> Result<Vec<i32>, CliError> {
    let users: Vec<&UserSeed> = students.iter().map(|s| &s.user).collect();
    let user_ids = insert_users(tx, &users).await?;

    let rows: Vec<(i32, &StudentSeed)> = user_ids.into_iter().zip(students.iter()).collect();
    let mut ids = Vec::with_capacity(rows.len());

    for chunk in rows.chunks(BATCH_SIZE) {
        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO students (user_id, student_code, birth_date) ");
        builder.push_values(chunk, |mut b, (user_id, student)| {
            b.push_bind(*user_id)
                .push_bind(&student.student_code)
                .push_bind(student.birth_date);
        });
        builder.push(" RETURNING id");

        ids.extend(builder.build_query_scalar::<i32>().fetch_all(&mut **tx).await?);
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_accounts_use_seed_domain() {
        let teachers = generate_teachers(3, "hash");
        assert!(teachers.iter().all(|t| t.role == "docente"));
        assert!(teachers.iter().all(|t| t.email.ends_with("@example.com")));

        let students = generate_students(5, "hash");
        assert_eq!(students.len(), 5);
        assert!(students.iter().all(|s| s.user.role == "estudiante"));
        assert!(students.iter().all(|s| s.birth_date.is_some()));
    }
}
