//! Seed records and the seeding configuration.

use chrono::NaiveDate;

/// Domain used for every generated account; `clear-seed` relies on it.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// Prefix of generated course codes; `clear-seed` relies on it.
pub const SEED_COURSE_PREFIX: &str = "SEED-";

pub struct CourseSeed {
    pub code: String,
    pub name: String,
    pub description: String,
    pub credits: i32,
}

pub struct UserSeed {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: &'static str,
}

pub struct StudentSeed {
    pub user: UserSeed,
    pub student_code: String,
    pub birth_date: Option<NaiveDate>,
}

#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub courses: usize,
    pub groups_per_course: usize,
    pub teachers: usize,
    pub students: usize,
    /// Groups each student is enrolled in (bounded by group capacity)
    pub enrollments_per_student: usize,
    pub group_capacity: i32,
    pub period: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            courses: 8,
            groups_per_course: 2,
            teachers: 6,
            students: 120,
            enrollments_per_student: 3,
            group_capacity: 40,
            period: "2025-1".to_string(),
        }
    }
}

impl SeedConfig {
    pub fn new(courses: usize) -> Self {
        Self {
            courses,
            ..Default::default()
        }
    }

    pub fn total_groups(&self) -> usize {
        self.courses * self.groups_per_course
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_groups() {
        let config = SeedConfig {
            groups_per_course: 3,
            ..SeedConfig::new(4)
        };
        assert_eq!(config.total_groups(), 12);
    }
}
