use std::collections::HashMap;
use std::str::FromStr;

use serde_json::json;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::utils::audit;
use crate::utils::errors::AppError;

use super::model::{
    AdminRole, AdminUser, Branch, SetBranchesDto, SetBranchesResponse, SetPermissionDto,
    SetPermissionResponse,
};
use super::resolver;

/// Permission catalog seeded by `init_rbac`: (code, description, category).
const PERMISSION_CATALOG: &[(&str, &str, &str)] = &[
    ("students:read", "View student records", "students"),
    ("students:update", "Update student records", "students"),
    ("students:export", "Export student lists", "students"),
    ("events:trigger", "Trigger enrollment flow events", "enrollment"),
    ("flows:manage", "Manage enrollment flow definitions", "enrollment"),
    ("members:notify", "Send notifications to households", "members"),
    ("rbac:manage", "Manage admin permissions and branches", "admin"),
    ("audit:read", "Read the audit log", "admin"),
];

/// Default grants per role. Super admin gets the full catalog.
const BRANCH_ADMIN_DEFAULTS: &[&str] = &[
    "students:read",
    "students:update",
    "events:trigger",
    "members:notify",
];

const LEGACY_ADMIN_DEFAULTS: &[&str] = &["students:read", "students:update", "events:trigger"];

#[instrument(skip(db))]
pub async fn get_admin(db: &PgPool, admin_id: Uuid) -> Result<AdminUser, AppError> {
    sqlx::query_as::<_, AdminUser>(
        r#"SELECT id, username, email, role, created_at
        FROM admin_users WHERE id = $1"#,
    )
    .bind(admin_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("Admin user not found"))
}

/// Checks one admin+permission pair: override first, then role default, then
/// fail closed. The precedence itself is `resolver::effective_permission`.
#[instrument(skip(db))]
pub async fn has_permission(
    db: &PgPool,
    admin_id: Uuid,
    role: AdminRole,
    permission_code: &str,
) -> Result<bool, AppError> {
    let override_value: Option<bool> = sqlx::query_scalar(
        r#"SELECT value FROM admin_user_permissions
        WHERE admin_user_id = $1 AND permission_code = $2"#,
    )
    .bind(admin_id)
    .bind(permission_code)
    .fetch_optional(db)
    .await?;

    let role_default: Option<bool> = sqlx::query_scalar(
        r#"SELECT allowed FROM role_permissions
        WHERE role = $1 AND permission_code = $2"#,
    )
    .bind(role.as_str())
    .bind(permission_code)
    .fetch_optional(db)
    .await?;

    Ok(resolver::effective_permission(override_value, role_default))
}

/// Computes the full set of permission codes effective for an admin.
///
/// Returned sorted so UIs and tests see a stable order.
#[instrument(skip(db))]
pub async fn effective_permissions(
    db: &PgPool,
    admin_id: Uuid,
    role: AdminRole,
) -> Result<Vec<String>, AppError> {
    let defaults: Vec<(String, bool)> = sqlx::query_as(
        r#"SELECT permission_code, allowed FROM role_permissions WHERE role = $1"#,
    )
    .bind(role.as_str())
    .fetch_all(db)
    .await?;

    let overrides: Vec<(String, bool)> = sqlx::query_as(
        r#"SELECT permission_code, value FROM admin_user_permissions WHERE admin_user_id = $1"#,
    )
    .bind(admin_id)
    .fetch_all(db)
    .await?;

    let mut grants: HashMap<String, bool> = defaults.into_iter().collect();
    for (code, value) in overrides {
        grants.insert(code, value);
    }

    let mut codes: Vec<String> = grants
        .into_iter()
        .filter_map(|(code, allowed)| allowed.then_some(code))
        .collect();
    codes.sort();

    Ok(codes)
}

/// Resolves the branch set this admin may act on.
#[instrument(skip(db))]
pub async fn get_allowed_branches(
    db: &PgPool,
    admin_id: Uuid,
    role: AdminRole,
) -> Result<Vec<Branch>, AppError> {
    // Super admin short-circuits; stored rows cannot narrow it.
    if role == AdminRole::SuperAdmin {
        return Ok(Branch::ALL.to_vec());
    }

    let rows: Vec<String> = sqlx::query_scalar(
        r#"SELECT branch FROM admin_user_allowed_branches WHERE admin_user_id = $1"#,
    )
    .bind(admin_id)
    .fetch_all(db)
    .await?;

    let assigned = rows
        .iter()
        .map(|s| Branch::from_str(s))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(resolver::resolve_branches(role, assigned))
}

#[instrument(skip(db))]
pub async fn can_access_branch(
    db: &PgPool,
    admin_id: Uuid,
    role: AdminRole,
    branch: Branch,
) -> Result<bool, AppError> {
    if role == AdminRole::SuperAdmin {
        return Ok(true);
    }

    let allowed = get_allowed_branches(db, admin_id, role).await?;
    Ok(allowed.contains(&branch))
}

/// Replaces the target admin's allowed-branch set wholesale
/// (delete-all-then-insert; callers supply the complete desired state).
#[instrument(skip(db))]
pub async fn set_admin_branches(
    db: &PgPool,
    actor: &str,
    dto: SetBranchesDto,
) -> Result<SetBranchesResponse, AppError> {
    let admin = get_admin(db, dto.admin_user_id).await?;

    let mut tx = db.begin().await?;

    sqlx::query(r#"DELETE FROM admin_user_allowed_branches WHERE admin_user_id = $1"#)
        .bind(admin.id)
        .execute(&mut *tx)
        .await?;

    for branch in &dto.branches {
        sqlx::query(
            r#"INSERT INTO admin_user_allowed_branches (admin_user_id, branch)
            VALUES ($1, $2)"#,
        )
        .bind(admin.id)
        .bind(branch.as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    // Unconditional audit entry; no diffing against the previous set.
    audit::record(
        db,
        actor,
        "SET_ADMIN_BRANCHES",
        Some(&admin.id.to_string()),
        Some(json!({
            "branches": dto.branches.iter().map(|b| b.as_str()).collect::<Vec<_>>()
        })),
    )
    .await;

    Ok(SetBranchesResponse {
        admin_user_id: admin.id,
        branches: dto.branches,
    })
}

/// Sets or clears a single per-admin permission override.
#[instrument(skip(db))]
pub async fn set_admin_permission(
    db: &PgPool,
    actor: &str,
    dto: SetPermissionDto,
) -> Result<SetPermissionResponse, AppError> {
    let admin = get_admin(db, dto.admin_user_id).await?;

    let exists: Option<String> =
        sqlx::query_scalar(r#"SELECT code FROM permissions WHERE code = $1"#)
            .bind(&dto.permission_code)
            .fetch_optional(db)
            .await?;

    if exists.is_none() {
        return Err(AppError::not_found("Permission not found"));
    }

    sqlx::query(
        r#"INSERT INTO admin_user_permissions (admin_user_id, permission_code, value, granted_by)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (admin_user_id, permission_code)
        DO UPDATE SET value = EXCLUDED.value, granted_by = EXCLUDED.granted_by"#,
    )
    .bind(admin.id)
    .bind(&dto.permission_code)
    .bind(dto.value)
    .bind(actor)
    .execute(db)
    .await?;

    audit::record(
        db,
        actor,
        "SET_ADMIN_PERMISSION",
        Some(&admin.id.to_string()),
        Some(json!({
            "permission_code": dto.permission_code,
            "value": dto.value
        })),
    )
    .await;

    Ok(SetPermissionResponse {
        admin_user_id: admin.id,
        permission_code: dto.permission_code,
        value: dto.value,
    })
}

/// Idempotent bootstrap of the permission catalog and role defaults.
///
/// The check is a non-zero catalog count, not per-row: a partially seeded
/// catalog is never completed automatically.
#[instrument(skip(db))]
pub async fn init_rbac(db: &PgPool) -> Result<bool, AppError> {
    let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM permissions"#)
        .fetch_one(db)
        .await?;

    if count > 0 {
        return Ok(false);
    }

    let mut tx = db.begin().await?;

    for (code, description, category) in PERMISSION_CATALOG {
        sqlx::query(
            r#"INSERT INTO permissions (code, description, category)
            VALUES ($1, $2, $3)"#,
        )
        .bind(code)
        .bind(description)
        .bind(category)
        .execute(&mut *tx)
        .await?;
    }

    for (code, _, _) in PERMISSION_CATALOG {
        sqlx::query(
            r#"INSERT INTO role_permissions (role, permission_code, allowed)
            VALUES ($1, $2, TRUE)"#,
        )
        .bind(AdminRole::SuperAdmin.as_str())
        .bind(code)
        .execute(&mut *tx)
        .await?;
    }

    for role in [
        AdminRole::KinderAdmin,
        AdminRole::JuniorAdmin,
        AdminRole::MiddleAdmin,
    ] {
        for code in BRANCH_ADMIN_DEFAULTS {
            sqlx::query(
                r#"INSERT INTO role_permissions (role, permission_code, allowed)
                VALUES ($1, $2, TRUE)"#,
            )
            .bind(role.as_str())
            .bind(code)
            .execute(&mut *tx)
            .await?;
        }
    }

    for code in LEGACY_ADMIN_DEFAULTS {
        sqlx::query(
            r#"INSERT INTO role_permissions (role, permission_code, allowed)
            VALUES ($1, $2, TRUE)"#,
        )
        .bind(AdminRole::Admin.as_str())
        .bind(code)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(true)
}
