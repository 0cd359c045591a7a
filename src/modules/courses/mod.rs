//! Course catalog. Readable by every role, writable by admins.

pub mod controller;
pub mod repository;
pub mod router;
pub mod service;
