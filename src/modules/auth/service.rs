use std::sync::Arc;

use aula_auth::{Claims, Rol, create_access_token, verify_token};
use aula_config::JwtConfig;
use aula_core::{AppError, verify_password};
use aula_models::{LoginRequest, LoginResponse, MeResponse, User};
use tracing::{instrument, warn};

use super::repository::UserRepository;
use crate::metrics::{track_jwt_issued, track_login_failure, track_login_success};

pub const TOKEN_TYPE: &str = "Bearer";

/// Issues and verifies access tokens.
#[derive(Debug)]
pub struct AuthService {
    users: Arc<UserRepository>,
    jwt: Arc<JwtConfig>,
}

impl AuthService {
    pub fn new(users: Arc<UserRepository>, jwt: Arc<JwtConfig>) -> Self {
        Self { users, jwt }
    }

    /// Verifies a bearer token and returns its principal.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AppError> {
        verify_token(token, &self.jwt)
    }

    #[instrument(skip(self, dto), fields(email = %dto.email))]
    pub async fn login(&self, dto: LoginRequest) -> Result<LoginResponse, AppError> {
        let Some(row) = self.users.find_with_password(&dto.email).await? else {
            track_login_failure("unknown_email");
            return Err(AppError::invalid_credentials());
        };

        if !verify_password(&dto.password, &row.password)? {
            track_login_failure("wrong_password");
            return Err(AppError::invalid_credentials());
        }

        let role: Rol = row.role.parse().map_err(|e: String| {
            warn!(usuario_id = row.id, role = %row.role, "User has an unknown role");
            AppError::internal_error(e)
        })?;

        let access_token = create_access_token(row.id, &row.email, role, &self.jwt)?;
        track_jwt_issued();
        track_login_success(role.as_str());

        Ok(LoginResponse {
            access_token,
            token_type: TOKEN_TYPE.to_string(),
            expires_in: self.jwt.access_token_expiry,
            user: User::from(row),
        })
    }

    #[instrument(skip(self, claims), fields(usuario_id = claims.usuario_id))]
    pub async fn me(&self, claims: Claims) -> Result<MeResponse, AppError> {
        let user = self.users.find_by_id(claims.usuario_id).await?;
        Ok(MeResponse {
            principal: claims,
            user,
        })
    }
}
