//! Role gate.
//!
//! Two ways to restrict a route to a set of roles:
//!
//! 1. Layer functions for whole routers, used after [`authenticate`]:
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/", post(create_course))
//!     .route_layer(middleware::from_fn(require_admin))
//! ```
//!
//! 2. Extractors generated by [`require_roles!`](crate::require_roles) for a
//!    single handler:
//!
//! ```rust,ignore
//! async fn create_grade(RequireStaff(auth_user): RequireStaff, ...) { ... }
//! ```
//!
//! Both fail with `AUTH_TOKEN_REQUIRED` when no principal is attached and with
//! `FORBIDDEN` when the principal's role is not allowed. Tokens carrying an
//! unknown role never pass a gate.
//!
//! [`authenticate`]: crate::middleware::auth::authenticate

use axum::{extract::Request, middleware::Next, response::Response};

use aula_auth::{Claims, Rol};
use aula_core::AppError;

use crate::metrics::track_authorization_denied;
use crate::middleware::auth::AuthUser;

pub const ADMIN_ONLY: &[Rol] = &[Rol::Admin];
pub const STAFF: &[Rol] = &[Rol::Admin, Rol::Docente];
pub const ANY_ROLE: &[Rol] = &Rol::ALL;

/// Checks that a principal is present and holds one of `allowed`.
pub fn check_any_role(principal: Option<&Claims>, allowed: &[Rol]) -> Result<(), AppError> {
    let claims = principal.ok_or_else(AppError::token_required)?;

    if claims.has_any_role(allowed) {
        return Ok(());
    }

    let required = allowed
        .iter()
        .map(Rol::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::forbidden(format!(
        "Access denied. Required roles: {}",
        required
    )))
}

/// Layer body shared by [`require_admin`] and [`require_staff`].
pub async fn require_roles(
    req: Request,
    next: Next,
    allowed: &'static [Rol],
) -> Result<Response, AppError> {
    let principal = req.extensions().get::<AuthUser>().map(AuthUser::claims);

    if let Err(err) = check_any_role(principal, allowed) {
        track_authorization_denied("role");
        return Err(err);
    }

    Ok(next.run(req).await)
}

pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(req, next, ADMIN_ONLY).await
}

/// Admins and teachers.
pub async fn require_staff(req: Request, next: Next) -> Result<Response, AppError> {
    require_roles(req, next, STAFF).await
}

/// Generates an extractor that authenticates the request and then applies the
/// role gate.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, $roles:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = aula_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user =
                    $crate::middleware::auth::AuthUser::from_request_parts(parts, state).await?;

                if let Err(err) =
                    $crate::middleware::role::check_any_role(Some(auth_user.claims()), $roles)
                {
                    $crate::metrics::track_authorization_denied("role");
                    return Err(err);
                }

                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(RequireAdmin, ADMIN_ONLY);
require_roles!(RequireStaff, STAFF);

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::ErrorCode;

    fn claims(rol: &str) -> Claims {
        Claims {
            usuario_id: 1,
            rol: rol.to_string(),
            email: "user@aula.edu".to_string(),
            exp: 9999999999,
            iat: 0,
        }
    }

    #[test]
    fn test_missing_principal_requires_token() {
        let err = check_any_role(None, STAFF).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthTokenRequired);
    }

    #[test]
    fn test_role_not_allowed_is_forbidden() {
        let err = check_any_role(Some(&claims("estudiante")), STAFF).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(err.message.contains("admin, docente"));
    }

    #[test]
    fn test_allowed_roles_pass() {
        assert!(check_any_role(Some(&claims("admin")), ADMIN_ONLY).is_ok());
        assert!(check_any_role(Some(&claims("docente")), STAFF).is_ok());
        assert!(check_any_role(Some(&claims("estudiante")), ANY_ROLE).is_ok());
    }

    #[test]
    fn test_unknown_role_is_forbidden_everywhere() {
        let err = check_any_role(Some(&claims("root")), ANY_ROLE).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_empty_allow_list_rejects_everyone() {
        let err = check_any_role(Some(&claims("admin")), &[]).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }
}
