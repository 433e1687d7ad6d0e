use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::middleware::auth::{AdminUser, AuthUser};
use crate::modules::events::service as events_service;
use crate::modules::flows::service as flows_service;
use crate::modules::progress::model::{InitFlowDto, InitFlowResponse, ProgressDetailResponse};
use crate::modules::progress::service;
use crate::modules::students::service as students_service;
use crate::state::AppState;
use crate::utils::audit;
use crate::utils::errors::AppError;

const EVENT_HISTORY_LIMIT: i64 = 20;

#[utoipa::path(
    get,
    path = "/api/students/{id}/progress",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Progress summary and recent event history", body = ProgressDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student outside caller's scope"),
        (status = 404, description = "Student or progress not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Enrollment"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_student_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ProgressDetailResponse>, AppError> {
    let student = students_service::get_student(&state.db, id).await?;

    if auth_user.is_admin() {
        let admin_id = auth_user.user_id()?;
        let role = auth_user.admin_role()?;
        students_service::ensure_branch_access(&state.db, admin_id, role, &student).await?;
    } else {
        let household = auth_user.household_token()?;
        if student.household_token != household {
            return Err(AppError::forbidden(
                "Access denied. Student does not belong to your household.",
            ));
        }
    }

    let progress = service::get_progress(&state.db, student.id).await?;
    let flow = flows_service::get_flow(&state.db, &progress.flow_key).await?;
    let summary = service::compute_summary(&progress, &flow);
    let events = events_service::recent_events(&state.db, student.id, EVENT_HISTORY_LIMIT).await?;

    Ok(Json(ProgressDetailResponse { summary, events }))
}

#[utoipa::path(
    post,
    path = "/api/admin/students/{id}/init-flow",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    request_body = InitFlowDto,
    responses(
        (status = 200, description = "Progress record created", body = InitFlowResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student outside caller's branches"),
        (status = 404, description = "Student or flow not found"),
        (status = 409, description = "Progress already exists for this student")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Enrollment"
)]
#[instrument(skip(state, admin, dto))]
pub async fn init_student_flow(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(dto): Json<InitFlowDto>,
) -> Result<Json<InitFlowResponse>, AppError> {
    dto.validate()
        .map_err(|e| AppError::invalid_input(format!("Validation failed: {}", e)))?;

    let student = students_service::get_student(&state.db, id).await?;
    students_service::ensure_branch_access(&state.db, admin.id, admin.role, &student).await?;

    let response = service::init_progress(
        &state.db,
        student.id,
        &student.household_token,
        &dto.flow_key,
    )
    .await?;

    audit::record(
        &state.db,
        &admin.principal_label(),
        "INIT_FLOW",
        Some(&student.id.to_string()),
        Some(json!({ "flow_key": dto.flow_key })),
    )
    .await;

    Ok(Json(response))
}
