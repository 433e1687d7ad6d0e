//! Student data models and listing DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::modules::rbac::model::Branch;
use crate::utils::pagination::{PaginationMeta, PaginationParams};

/// A student record. `branch` is the sole dimension of admin-visibility
/// partitioning; `household_token` is a weak back-reference to the owning
/// household, used for lookups only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub branch: String,
    pub household_token: String,
    pub program_type: String,
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct StudentListParams {
    /// Caller-requested branch. Applied after the access filter: a branch
    /// outside the admin's allowed set yields zero results.
    pub branch_filter: Option<Branch>,
    /// Free-text search on student name.
    pub search: Option<String>,
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: PaginationParams,
}

/// Listing response. `allowed_branches` and `user_permissions` echo the
/// caller's own access so a UI can self-configure its controls.
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentListResponse {
    pub data: Vec<Student>,
    pub meta: PaginationMeta,
    pub allowed_branches: Vec<Branch>,
    pub user_permissions: Vec<String>,
}
