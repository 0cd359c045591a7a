//! Access token creation and verification.
//!
//! Tokens are HS256-signed with [`JwtConfig::secret`] and expire after
//! [`JwtConfig::access_token_expiry`] seconds. Verification failures of any
//! kind (bad signature, expired, malformed) surface as `AUTH_TOKEN_INVALID`.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use aula_config::JwtConfig;
use aula_core::AppError;

use crate::claims::{Claims, Rol};

/// Creates a signed access token for `usuario_id` with the given role.
pub fn create_access_token(
    usuario_id: i32,
    email: &str,
    rol: Rol,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + jwt_config.access_token_expiry.max(0) as usize;

    let claims = Claims {
        usuario_id,
        rol: rol.as_str().to_string(),
        email: email.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies signature and expiry and returns the embedded principal.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::token_invalid("Token has expired"),
        _ => AppError::token_invalid("Invalid or expired token"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aula_core::ErrorCode;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key-at-least-32-characters-long".to_string(),
            access_token_expiry: 3600,
        }
    }

    #[test]
    fn test_create_and_verify_token() {
        let config = get_test_jwt_config();

        let token = create_access_token(42, "ana@aula.edu", Rol::Estudiante, &config).unwrap();
        let claims = verify_token(&token, &config).unwrap();

        assert_eq!(claims.usuario_id, 42);
        assert_eq!(claims.email, "ana@aula.edu");
        assert_eq!(claims.role(), Some(Rol::Estudiante));
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_verify_token_garbage() {
        let err = verify_token("invalid-token", &get_test_jwt_config()).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthTokenInvalid);
    }

    #[test]
    fn test_verify_token_wrong_secret() {
        let config = get_test_jwt_config();
        let token = create_access_token(1, "admin@aula.edu", Rol::Admin, &config).unwrap();

        let wrong_config = JwtConfig {
            secret: "different-secret-key-at-least-32-characters".to_string(),
            access_token_expiry: 3600,
        };

        let err = verify_token(&token, &wrong_config).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthTokenInvalid);
    }

    #[test]
    fn test_verify_expired_token() {
        let config = get_test_jwt_config();
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            usuario_id: 3,
            rol: "docente".to_string(),
            email: "d@aula.edu".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthTokenInvalid);
        assert_eq!(err.message, "Token has expired");
    }
}
