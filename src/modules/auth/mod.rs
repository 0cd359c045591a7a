//! Login and the caller's profile.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
