//! Read-only group standings.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
