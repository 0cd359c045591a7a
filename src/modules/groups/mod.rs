//! Groups (sections) of a course taught in a period, with a seat capacity.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
