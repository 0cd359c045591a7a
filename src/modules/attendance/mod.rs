//! Attendance per enrollment and session date. Staff only.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
