//! # Aula Models
//!
//! Database entities, request DTOs and filter parameters for every resource
//! exposed by the Aula API.
//!
//! # Modules
//!
//! - [`auth`]: login request/response and the profile of the caller
//! - [`users`]: user accounts
//! - [`students`]: student profiles (owned by a user account)
//! - [`courses`]: course catalog
//! - [`groups`]: course sections taught in a period
//! - [`enrollments`]: student ↔ group membership
//! - [`attendance`]: per-session attendance records
//! - [`evaluations`]: weighted assessments of a group
//! - [`grades`]: scores of a student on an evaluation
//! - [`rankings`]: weighted-average standings of a group

pub mod attendance;
pub mod auth;
pub mod courses;
pub mod enrollments;
pub mod evaluations;
pub mod grades;
pub mod groups;
pub mod rankings;
pub mod students;
pub mod users;

pub use attendance::{
    AttendanceFilterParams, AttendanceRecord, AttendanceStatus, CreateAttendanceDto,
    UpdateAttendanceDto,
};
pub use auth::{LoginRequest, LoginResponse, MeResponse};
pub use courses::{Course, CreateCourseDto, UpdateCourseDto};
pub use enrollments::{
    CreateEnrollmentDto, Enrollment, EnrollmentFilterParams, EnrollmentStatus,
    UpdateEnrollmentDto,
};
pub use evaluations::{CreateEvaluationDto, Evaluation, EvaluationFilterParams, UpdateEvaluationDto};
pub use grades::{CreateGradeDto, Grade, GradeFilterParams, UpdateGradeDto};
pub use groups::{CreateGroupDto, Group, GroupFilterParams, UpdateGroupDto};
pub use rankings::{GroupRanking, RankingEntry, RankingRow, rank};
pub use students::{CreateStudentDto, Student, StudentFilterParams, UpdateStudentDto};
pub use users::{User, UserWithPassword};
