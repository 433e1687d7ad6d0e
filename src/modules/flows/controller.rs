use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use crate::middleware::auth::{AdminUser, SuperAdminUser};
use crate::modules::flows::model::FlowDefinition;
use crate::modules::flows::service;
use crate::modules::rbac::model::InitResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/flows/{flow_key}",
    params(
        ("flow_key" = String, Path, description = "Flow key")
    ),
    responses(
        (status = 200, description = "Flow definition with ordered steps", body = FlowDefinition),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Flow not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Flows"
)]
#[instrument(skip(state))]
pub async fn get_flow(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(flow_key): Path<String>,
) -> Result<Json<FlowDefinition>, AppError> {
    let flow = service::get_flow(&state.db, &flow_key).await?;
    Ok(Json(flow))
}

#[utoipa::path(
    post,
    path = "/api/admin/init-flows",
    responses(
        (status = 200, description = "Flow catalog bootstrapped (or already present)", body = InitResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Super Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Admin"
)]
#[instrument(skip(state))]
pub async fn init_flows(
    State(state): State<AppState>,
    _admin: SuperAdminUser,
) -> Result<Json<InitResponse>, AppError> {
    let initialized = service::init_flows(&state.db).await?;

    let message = if initialized {
        "Flow catalog initialized".to_string()
    } else {
        "Flow catalog already initialized".to_string()
    };

    Ok(Json(InitResponse {
        message,
        initialized,
    }))
}
