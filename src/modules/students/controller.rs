use axum::{
    Json,
    extract::{Query, State},
};
use tracing::instrument;

use crate::middleware::auth::AdminUser;
use crate::modules::students::model::{StudentListParams, StudentListResponse};
use crate::modules::students::service;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/admin/students",
    params(
        StudentListParams
    ),
    responses(
        (status = 200, description = "Students visible to the caller, with their own access echoed back", body = StudentListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - admin token required")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, admin, params))]
pub async fn list_students(
    State(state): State<AppState>,
    admin: AdminUser,
    Query(params): Query<StudentListParams>,
) -> Result<Json<StudentListResponse>, AppError> {
    let response = service::list_students(&state.db, admin.id, admin.role, params).await?;
    Ok(Json(response))
}
