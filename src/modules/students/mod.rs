//! Student profiles.
//!
//! Listing and writes are restricted by role. Reading one student, and its
//! enrollments, grades and attendance, goes through the owner-or-staff check:
//! an `estudiante` may only read the profile linked to their own account.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
