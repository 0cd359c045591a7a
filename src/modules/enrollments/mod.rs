//! Student ↔ group membership, bounded by the group's capacity.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
