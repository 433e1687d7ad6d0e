use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::jwt::JwtConfig;
use crate::modules::rbac::model::AdminRole;
use crate::utils::errors::AppError;

/// The class of principal a token was minted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    Parent,
    Admin,
}

/// Bearer token claims for both principal kinds.
///
/// Parent tokens carry a `household_token` and no role; admin tokens carry a
/// role and no household. Token issuance endpoints (signup/login) live in a
/// separate service; this backend only mints tokens for tests and verifies
/// them at the edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: PrincipalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<AdminRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub household_token: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

pub fn create_parent_token(
    user_id: Uuid,
    household_token: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        kind: PrincipalKind::Parent,
        role: None,
        household_token: Some(household_token.to_string()),
        exp: now + jwt_config.access_token_expiry as usize,
        iat: now,
    };

    sign(&claims, jwt_config)
}

pub fn create_admin_token(
    admin_id: Uuid,
    role: AdminRole,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: admin_id.to_string(),
        kind: PrincipalKind::Admin,
        role: Some(role),
        household_token: None,
        exp: now + jwt_config.access_token_expiry as usize,
        iat: now,
    };

    sign(&claims, jwt_config)
}

fn sign(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
