//! The principal carried by access tokens.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Roles known to the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Docente,
    Estudiante,
}

impl Rol {
    pub const ALL: [Rol; 3] = [Rol::Admin, Rol::Docente, Rol::Estudiante];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rol::Admin => "admin",
            Rol::Docente => "docente",
            Rol::Estudiante => "estudiante",
        }
    }
}

impl fmt::Display for Rol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Rol::Admin),
            "docente" => Ok(Rol::Docente),
            "estudiante" => Ok(Rol::Estudiante),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// JWT claims for access tokens.
///
/// `rol` is kept as the raw string from the token: a token signed with a role
/// this build does not know still authenticates, but it matches no role gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// Id of the authenticated user
    #[serde(rename = "usuarioId")]
    pub usuario_id: i32,
    /// Role name (`admin`, `docente` or `estudiante`)
    pub rol: String,
    pub email: String,
    /// Expiration (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// The parsed role, or `None` for a role this build does not know.
    pub fn role(&self) -> Option<Rol> {
        self.rol.parse().ok()
    }

    pub fn has_role(&self, role: Rol) -> bool {
        self.role() == Some(role)
    }

    pub fn has_any_role(&self, roles: &[Rol]) -> bool {
        self.role().is_some_and(|r| roles.contains(&r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(rol: &str) -> Claims {
        Claims {
            usuario_id: 7,
            rol: rol.to_string(),
            email: "user@aula.edu".to_string(),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_claims_use_camel_case_user_id() {
        let json = serde_json::to_value(claims("admin")).unwrap();
        assert_eq!(json["usuarioId"], 7);
        assert_eq!(json["rol"], "admin");
        assert!(json.get("usuario_id").is_none());
    }

    #[test]
    fn test_claims_deserialize() {
        let json = r#"{"usuarioId":12,"rol":"docente","email":"d@aula.edu","exp":9999999999,"iat":1}"#;
        let claims: Claims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.usuario_id, 12);
        assert_eq!(claims.role(), Some(Rol::Docente));
    }

    #[test]
    fn test_unknown_role_matches_nothing() {
        let claims = claims("superuser");
        assert_eq!(claims.role(), None);
        assert!(!claims.has_any_role(&Rol::ALL));
    }

    #[test]
    fn test_role_round_trip_through_str() {
        for role in Rol::ALL {
            assert_eq!(role.as_str().parse::<Rol>().unwrap(), role);
        }
        assert!("Admin".parse::<Rol>().is_err());
    }
}
