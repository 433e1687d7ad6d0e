use axum::{Json, extract::State};
use serde_json::json;
use tracing::instrument;
use validator::Validate;

use crate::middleware::auth::AuthUser;
use crate::modules::events::model::{TriggerEventDto, TriggerEventResponse};
use crate::modules::events::service;
use crate::modules::students::service as students_service;
use crate::state::AppState;
use crate::utils::audit;
use crate::utils::errors::AppError;

#[utoipa::path(
    post,
    path = "/api/flow-event",
    request_body = TriggerEventDto,
    responses(
        (status = 200, description = "Event recorded and transition applied", body = TriggerEventResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student outside caller's scope"),
        (status = 404, description = "Student or progress not found"),
        (status = 409, description = "Concurrent modification, retry"),
        (status = 422, description = "Validation failed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Enrollment"
)]
#[instrument(skip(state, auth_user, dto))]
pub async fn trigger_flow_event(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<TriggerEventDto>,
) -> Result<Json<TriggerEventResponse>, AppError> {
    dto.validate()
        .map_err(|e| AppError::invalid_input(format!("Validation failed: {}", e)))?;

    let student = students_service::get_student(&state.db, dto.student_id).await?;

    if auth_user.is_admin() {
        let admin_id = auth_user.user_id()?;
        let role = auth_user.admin_role()?;
        students_service::ensure_branch_access(&state.db, admin_id, role, &student).await?;

        audit::record(
            &state.db,
            &auth_user.principal_label(),
            &format!("TRIGGER_EVENT:{}", dto.event_type),
            Some(&student.id.to_string()),
            Some(json!({ "step_key": dto.step_key })),
        )
        .await;
    } else {
        // Parents may only act on students in their own household.
        let household = auth_user.household_token()?;
        if student.household_token != household {
            return Err(AppError::forbidden(
                "Access denied. Student does not belong to your household.",
            ));
        }
    }

    let response =
        service::trigger_event(&state.db, dto, &auth_user.principal_label()).await?;

    Ok(Json(response))
}
