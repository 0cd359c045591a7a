pub mod attendance;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod evaluations;
pub mod grades;
pub mod groups;
pub mod health;
pub mod rankings;
pub mod students;
