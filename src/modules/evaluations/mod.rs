//! Weighted evaluations of a group. The weights of a group sum to at most 100.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
