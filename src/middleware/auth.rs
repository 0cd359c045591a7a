//! Bearer token authentication.
//!
//! [`authenticate`] is a layer that turns the `Authorization` header into an
//! [`AuthUser`] attached to the request extensions:
//!
//! 1. no header: `AUTH_TOKEN_REQUIRED`
//! 2. anything other than exactly `Bearer <token>`: `AUTH_TOKEN_INVALID`
//! 3. the token is verified by the auth service (bad signature, expired or
//!    malformed tokens are `AUTH_TOKEN_INVALID`)
//!
//! Handlers take [`AuthUser`] as an extractor. It reuses the principal attached
//! by the layer and runs the same checks itself when the layer did not run.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};

use aula_auth::{Claims, Rol};
use aula_core::AppError;

use crate::state::AppState;

pub const BEARER_SCHEME: &str = "Bearer";

/// The authenticated principal of the current request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn usuario_id(&self) -> i32 {
        self.0.usuario_id
    }

    /// `None` when the token carries a role this build does not know.
    pub fn role(&self) -> Option<Rol> {
        self.0.role()
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn claims(&self) -> &Claims {
        &self.0
    }
}

/// Returns the token of a well-formed `Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(AppError::token_required)?;

    let value = value
        .to_str()
        .map_err(|_| AppError::token_invalid("Invalid authorization header format"))?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if *scheme == BEARER_SCHEME && !token.is_empty() => Ok(*token),
        _ => Err(AppError::token_invalid(
            "Invalid authorization header format, expected 'Bearer <token>'",
        )),
    }
}

fn principal_from_headers(headers: &HeaderMap, state: &AppState) -> Result<AuthUser, AppError> {
    let token = bearer_token(headers)?;
    let claims = state.auth.verify_token(token)?;
    Ok(AuthUser(claims))
}

/// Authentication layer for protected routers.
///
/// ```ignore
/// Router::new()
///     .nest("/courses", init_courses_router())
///     .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
/// ```
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = principal_from_headers(req.headers(), &state)?;

    tracing::Span::current().record("usuario_id", auth_user.usuario_id());
    req.extensions_mut().insert(auth_user);

    Ok(next.run(req).await)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth_user) = parts.extensions.get::<AuthUser>() {
            return Ok(auth_user.clone());
        }

        principal_from_headers(&parts.headers, state)
    }
}
