//! # Aula Core
//!
//! Foundational types shared by every Aula crate:
//!
//! - [`errors`]: [`AppError`], [`ErrorCode`] and the JSON error envelope
//! - [`pagination`]: pagination query parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`response`]: the success envelope returned by resource endpoints
//!
//! # Example
//!
//! ```ignore
//! use aula_core::{AppError, ApiResponse};
//!
//! async fn handler() -> Result<Json<ApiResponse<Course>>, AppError> {
//!     let course = repo.find_by_id(id).await?
//!         .ok_or_else(|| AppError::not_found("Course not found"))?;
//!     Ok(Json(ApiResponse::ok(course)))
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod response;

pub use errors::{AppError, ErrorBody, ErrorCode, ErrorResponse};
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
pub use response::{ApiResponse, MessageResponse};
