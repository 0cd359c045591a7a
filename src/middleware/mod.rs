//! Request middleware and extractors.
//!
//! # Modules
//!
//! - [`auth`]: bearer token authentication layer and the [`AuthUser`](auth::AuthUser) extractor
//! - [`role`]: role gate layers and `RequireAdmin` / `RequireStaff` extractors
//! - [`ownership`]: owner-or-role access to a single resource
//! - [`error`]: route fallback and panic handler producing the error envelope
//! - [`rate_limit`]: per-client rate limiting
//!
//! # Request Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::authenticate`] verifies the token and attaches the principal
//! 3. Role layers or extractors check the principal's role
//! 4. Handlers serving one resource by id apply [`ownership::authorize_owner_or_roles`]
//! 5. Any failure is an `AppError`, rendered once by its `IntoResponse` impl

pub mod auth;
pub mod error;
pub mod ownership;
pub mod rate_limit;
pub mod role;
