use axum::{Json, extract::State};
use tracing::instrument;
use validator::Validate;

use crate::middleware::auth::SuperAdminUser;
use crate::modules::rbac::model::{
    InitResponse, SetBranchesDto, SetBranchesResponse, SetPermissionDto, SetPermissionResponse,
};
use crate::modules::rbac::service;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/admin/init-rbac",
    responses(
        (status = 200, description = "Permission catalog bootstrapped (or already present)", body = InitResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn init_rbac(
    State(state): State<AppState>,
    _admin: SuperAdminUser,
) -> Result<Json<InitResponse>, AppError> {
    let initialized = service::init_rbac(&state.db).await?;

    let message = if initialized {
        "RBAC catalog initialized".to_string()
    } else {
        "RBAC catalog already initialized".to_string()
    };

    Ok(Json(InitResponse {
        message,
        initialized,
    }))
}

#[utoipa::path(
    post,
    path = "/api/admin/permissions/set-branches",
    request_body = SetBranchesDto,
    responses(
        (status = 200, description = "Branch set replaced", body = SetBranchesResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super Admin only"),
        (status = 404, description = "Admin user not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state, admin, dto))]
pub async fn set_admin_branches(
    State(state): State<AppState>,
    admin: SuperAdminUser,
    Json(dto): Json<SetBranchesDto>,
) -> Result<Json<SetBranchesResponse>, AppError> {
    dto.validate()
        .map_err(|e| AppError::invalid_input(format!("Validation failed: {}", e)))?;

    let response =
        service::set_admin_branches(&state.db, &admin.0.principal_label(), dto).await?;

    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/admin/permissions/set-permission",
    request_body = SetPermissionDto,
    responses(
        (status = 200, description = "Permission override stored", body = SetPermissionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super Admin only"),
        (status = 404, description = "Admin user or permission not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state, admin, dto))]
pub async fn set_admin_permission(
    State(state): State<AppState>,
    admin: SuperAdminUser,
    Json(dto): Json<SetPermissionDto>,
) -> Result<Json<SetPermissionResponse>, AppError> {
    dto.validate()
        .map_err(|e| AppError::invalid_input(format!("Validation failed: {}", e)))?;

    let response =
        service::set_admin_permission(&state.db, &admin.0.principal_label(), dto).await?;

    Ok(Json(response))
}
