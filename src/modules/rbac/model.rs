//! RBAC data models: branches, admin roles, the permission catalog and the
//! per-admin override rows layered on top of role defaults.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::AppError;

/// A school division. The primary admin-visibility partition: every student
/// belongs to exactly one branch and every admin resolves to a set of
/// branches they may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Branch {
    Kinder,
    Junior,
    Middle,
    KinderSingle,
}

impl Branch {
    pub const ALL: [Branch; 4] = [
        Branch::Kinder,
        Branch::Junior,
        Branch::Middle,
        Branch::KinderSingle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Kinder => "kinder",
            Branch::Junior => "junior",
            Branch::Middle => "middle",
            Branch::KinderSingle => "kinder_single",
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kinder" => Ok(Branch::Kinder),
            "junior" => Ok(Branch::Junior),
            "middle" => Ok(Branch::Middle),
            "kinder_single" => Ok(Branch::KinderSingle),
            _ => Err(AppError::invalid_input(format!("Invalid branch: {}", s))),
        }
    }
}

/// Admin roles. `Admin` is the legacy undifferentiated role kept for
/// bootstrap accounts that predate branch scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    SuperAdmin,
    KinderAdmin,
    JuniorAdmin,
    MiddleAdmin,
    Admin,
}

impl AdminRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminRole::SuperAdmin => "super_admin",
            AdminRole::KinderAdmin => "kinder_admin",
            AdminRole::JuniorAdmin => "junior_admin",
            AdminRole::MiddleAdmin => "middle_admin",
            AdminRole::Admin => "admin",
        }
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(AdminRole::SuperAdmin),
            "kinder_admin" => Ok(AdminRole::KinderAdmin),
            "junior_admin" => Ok(AdminRole::JuniorAdmin),
            "middle_admin" => Ok(AdminRole::MiddleAdmin),
            "admin" => Ok(AdminRole::Admin),
            _ => Err(AppError::invalid_input(format!("Invalid role: {}", s))),
        }
    }
}

/// A permission catalog entry. Static reference data seeded at bootstrap.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Permission {
    pub code: String,
    pub description: String,
    pub category: String,
}

/// An admin account. Credentials live with the external token issuer; this
/// table only carries identity and role for authorization lookups.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AdminUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// DTO for replacing an admin's allowed-branch set.
///
/// The branches given here become the complete set; an empty list falls back
/// to the role default on the next resolution (there is no way to express
/// "intentionally zero branches").
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetBranchesDto {
    pub admin_user_id: Uuid,
    pub branches: Vec<Branch>,
}

/// DTO for a single per-admin permission override.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SetPermissionDto {
    pub admin_user_id: Uuid,
    #[validate(length(min = 1))]
    pub permission_code: String,
    pub value: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SetBranchesResponse {
    pub admin_user_id: Uuid,
    pub branches: Vec<Branch>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SetPermissionResponse {
    pub admin_user_id: Uuid,
    pub permission_code: String,
    pub value: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InitResponse {
    pub message: String,
    pub initialized: bool,
}
