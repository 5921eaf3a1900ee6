use crate::error::ApiError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use log::debug;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Claims kept from a validated bearer token
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StaffClaims {
    pub sub: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Staff,
    Admin,
}

impl Role {
    /// Admin carries every staff permission
    fn implies(self, required: Role) -> bool {
        self == required || self == Role::Admin
    }
}

impl StaffClaims {
    pub fn has_role(&self, required: Role) -> bool {
        self.roles
            .iter()
            .filter_map(|role| role.parse::<Role>().ok())
            .any(|role| role.implies(required))
    }
}

/// Rejects the request unless the token's claims carry `role`
pub async fn require_role(
    State(role): State<Role>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = request
        .extensions()
        .get::<StaffClaims>()
        .ok_or(ApiError::Unauthenticated)?;

    if !claims.has_role(role) {
        debug!(
            "Subject {} lacks the {role} role",
            claims.sub.as_deref().unwrap_or("<unknown>")
        );
        return Err(ApiError::MissingRole(role));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod test {
    use super::*;

    fn claims(roles: &[&str]) -> StaffClaims {
        StaffClaims {
            sub: Some("registrar".to_string()),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_admin_implies_staff() {
        assert!(claims(&["admin"]).has_role(Role::Staff));
        assert!(claims(&["Staff"]).has_role(Role::Staff));
        assert!(!claims(&["staff"]).has_role(Role::Admin));
        assert!(!claims(&["student", "viewer"]).has_role(Role::Staff));
    }

    #[test]
    fn test_roles_default_to_empty() {
        let claims: StaffClaims = serde_json::from_str(r#"{"sub":"abc"}"#).unwrap();
        assert!(claims.roles.is_empty());
        assert!(!claims.has_role(Role::Staff));
    }
}
