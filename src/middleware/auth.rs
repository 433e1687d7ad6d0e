use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use uuid::Uuid;

use crate::modules::rbac::model::AdminRole;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{Claims, PrincipalKind, verify_token};

/// Extractor that validates the bearer token and exposes the principal's
/// claims. Both parent and admin tokens pass; handlers that need one kind
/// use the helpers or the narrower extractors below.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.0.kind == PrincipalKind::Admin
    }

    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token"))
    }

    pub fn admin_role(&self) -> Result<AdminRole, AppError> {
        self.0
            .role
            .ok_or_else(|| AppError::forbidden("Administrator privileges required"))
    }

    pub fn household_token(&self) -> Result<&str, AppError> {
        self.0
            .household_token
            .as_deref()
            .ok_or_else(|| AppError::forbidden("Parent account required"))
    }

    /// Acting-principal label recorded in event logs and audit entries,
    /// e.g. `parent:<id>` or `admin:<id>`.
    pub fn principal_label(&self) -> String {
        match self.0.kind {
            PrincipalKind::Parent => format!("parent:{}", self.0.sub),
            PrincipalKind::Admin => format!("admin:{}", self.0.sub),
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}

/// Extractor for admin-only routes. Rejects parent tokens.
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub id: Uuid,
    pub role: AdminRole,
    pub claims: Claims,
}

impl AdminUser {
    pub fn principal_label(&self) -> String {
        format!("admin:{}", self.id)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;

        if !auth_user.is_admin() {
            return Err(AppError::forbidden(
                "Access denied. Administrator privileges required.",
            ));
        }

        Ok(AdminUser {
            id: auth_user.user_id()?,
            role: auth_user.admin_role()?,
            claims: auth_user.0,
        })
    }
}

/// Extractor for routes restricted to super admins (permission mutators).
#[derive(Debug, Clone)]
pub struct SuperAdminUser(pub AdminUser);

impl FromRequestParts<AppState> for SuperAdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let admin = AdminUser::from_request_parts(parts, state).await?;

        if admin.role != AdminRole::SuperAdmin {
            return Err(AppError::forbidden(
                "Access denied. Only super administrators can access this resource.",
            ));
        }

        Ok(SuperAdminUser(admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parent_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            kind: PrincipalKind::Parent,
            role: None,
            household_token: Some("hh-123".to_string()),
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    fn admin_claims(role: AdminRole) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            kind: PrincipalKind::Admin,
            role: Some(role),
            household_token: None,
            exp: 9999999999,
            iat: 1234567890,
        }
    }

    #[test]
    fn test_parent_is_not_admin() {
        let user = AuthUser(parent_claims());
        assert!(!user.is_admin());
        assert!(user.admin_role().is_err());
        assert_eq!(user.household_token().unwrap(), "hh-123");
    }

    #[test]
    fn test_admin_role_resolution() {
        let user = AuthUser(admin_claims(AdminRole::JuniorAdmin));
        assert!(user.is_admin());
        assert_eq!(user.admin_role().unwrap(), AdminRole::JuniorAdmin);
        assert!(user.household_token().is_err());
    }

    #[test]
    fn test_principal_label() {
        let claims = parent_claims();
        let sub = claims.sub.clone();
        let user = AuthUser(claims);
        assert_eq!(user.principal_label(), format!("parent:{}", sub));

        let claims = admin_claims(AdminRole::SuperAdmin);
        let sub = claims.sub.clone();
        let user = AuthUser(claims);
        assert_eq!(user.principal_label(), format!("admin:{}", sub));
    }
}
