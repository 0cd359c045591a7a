//! Liveness, readiness and detailed health.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
