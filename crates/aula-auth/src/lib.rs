//! # Aula Auth
//!
//! The authenticated principal and the JWT utilities that produce it.
//!
//! - [`claims`]: [`Claims`] (the principal decoded from a token) and [`Rol`]
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use aula_auth::{Rol, create_access_token, verify_token};
//! use aula_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(42, "ana@aula.edu", Rol::Estudiante, &config)?;
//!
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.usuario_id, 42);
//! ```

pub mod claims;
pub mod jwt;

pub use claims::{Claims, Rol};
pub use jwt::{create_access_token, verify_token};
