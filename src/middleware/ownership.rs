//! Owner-or-role access to a single resource.
//!
//! Privileged roles get unconditional access. An `estudiante` gets access only
//! when the resource, fetched by id, belongs to their own user id. Every other
//! outcome (failed lookup, missing resource, another owner, unknown role) is
//! `FORBIDDEN`, the same code the role gate uses.
//!
//! The fetched resource is handed back in [`Access::Owner`] so handlers do not
//! look it up a second time:
//!
//! ```rust,ignore
//! let access = authorize_owner_or_roles(Some(auth_user.claims()), STAFF, || {
//!     state.students.find_by_id(id)
//! })
//! .await?;
//! let student = access.into_resource(|| state.students.get_by_id(id)).await?;
//! ```

use std::future::Future;

use aula_auth::{Claims, Rol};
use aula_core::AppError;
use aula_models::Student;

use crate::metrics::track_authorization_denied;

/// A resource that belongs to a user account.
pub trait Owned {
    /// Id of the owning user.
    fn owner_id(&self) -> i32;
}

impl Owned for Student {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

/// Outcome of a successful ownership check.
#[derive(Debug)]
pub enum Access<T> {
    /// The principal holds a privileged role; nothing was fetched.
    Privileged,
    /// The principal owns the resource, which was fetched for the check.
    Owner(T),
}

impl<T> Access<T> {
    pub fn is_privileged(&self) -> bool {
        matches!(self, Access::Privileged)
    }

    /// Returns the resource, fetching it only if the check did not already.
    pub async fn into_resource<F, Fut>(self, fetch: F) -> Result<T, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        match self {
            Access::Owner(resource) => Ok(resource),
            Access::Privileged => fetch().await,
        }
    }
}

fn denied() -> AppError {
    track_authorization_denied("ownership");
    AppError::forbidden("You do not have access to this resource")
}

/// Authorizes access to a resource owned by a user.
///
/// `fetch` loads the resource by id and is only called for `estudiante`
/// principals.
pub async fn authorize_owner_or_roles<T, F, Fut>(
    principal: Option<&Claims>,
    privileged: &[Rol],
    fetch: F,
) -> Result<Access<T>, AppError>
where
    T: Owned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Option<T>, AppError>>,
{
    let claims = principal.ok_or_else(AppError::token_required)?;

    if claims.has_any_role(privileged) {
        return Ok(Access::Privileged);
    }

    if claims.role() != Some(Rol::Estudiante) {
        return Err(denied());
    }

    match fetch().await {
        Ok(Some(resource)) if resource.owner_id() == claims.usuario_id => {
            Ok(Access::Owner(resource))
        }
        Ok(_) => Err(denied()),
        Err(err) => {
            tracing::warn!(error = %err, "Ownership lookup failed");
            Err(denied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::role::STAFF;
    use aula_core::ErrorCode;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Debug, PartialEq)]
    struct Profile {
        id: i32,
        user_id: i32,
    }

    impl Owned for Profile {
        fn owner_id(&self) -> i32 {
            self.user_id
        }
    }

    fn claims(usuario_id: i32, rol: &str) -> Claims {
        Claims {
            usuario_id,
            rol: rol.to_string(),
            email: "user@aula.edu".to_string(),
            exp: 9999999999,
            iat: 0,
        }
    }

    async fn found(user_id: i32) -> Result<Option<Profile>, AppError> {
        Ok(Some(Profile { id: 5, user_id }))
    }

    #[tokio::test]
    async fn test_privileged_roles_skip_the_lookup() {
        let fetched = AtomicBool::new(false);

        for rol in ["admin", "docente"] {
            let access = authorize_owner_or_roles(Some(&claims(1, rol)), STAFF, || async {
                fetched.store(true, Ordering::SeqCst);
                found(99).await
            })
            .await
            .unwrap();
            assert!(access.is_privileged());
        }

        assert!(!fetched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_student_owner_gets_resource() {
        let access = authorize_owner_or_roles(Some(&claims(42, "estudiante")), STAFF, || found(42))
            .await
            .unwrap();

        match access {
            Access::Owner(profile) => assert_eq!(profile, Profile { id: 5, user_id: 42 }),
            Access::Privileged => panic!("expected owner access"),
        }
    }

    #[tokio::test]
    async fn test_student_other_owner_is_forbidden() {
        let err = authorize_owner_or_roles(Some(&claims(42, "estudiante")), STAFF, || found(43))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_missing_resource_is_forbidden() {
        let err = authorize_owner_or_roles(Some(&claims(42, "estudiante")), STAFF, || async {
            Ok::<Option<Profile>, AppError>(None)
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_lookup_failure_is_forbidden() {
        let err = authorize_owner_or_roles(Some(&claims(42, "estudiante")), STAFF, || async {
            Err::<Option<Profile>, AppError>(AppError::internal_error("connection refused"))
        })
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_unknown_role_is_forbidden() {
        let err = authorize_owner_or_roles(Some(&claims(42, "guest")), STAFF, || found(42))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_missing_principal_requires_token() {
        let err = authorize_owner_or_roles(None, STAFF, || found(42))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthTokenRequired);
    }

    #[tokio::test]
    async fn test_into_resource_fetches_only_when_privileged() {
        let owned = Access::Owner(Profile { id: 1, user_id: 2 });
        let profile = owned
            .into_resource(|| async { Err(AppError::not_found("unexpected")) })
            .await
            .unwrap();
        assert_eq!(profile.id, 1);

        let privileged: Access<Profile> = Access::Privileged;
        let err = privileged
            .into_resource(|| async { Err(AppError::not_found("Student not found")) })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
