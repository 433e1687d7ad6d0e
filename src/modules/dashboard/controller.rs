use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;
use uuid::Uuid;

use crate::middleware::auth::AuthUser;
use crate::modules::dashboard::model::StudentDashboard;
use crate::modules::dashboard::service;
use crate::modules::students::service as students_service;
use crate::state::AppState;
use crate::utils::errors::AppError;

#[utoipa::path(
    get,
    path = "/api/students/{id}/dashboard",
    params(
        ("id" = Uuid, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Dashboard cards for the student", body = StudentDashboard),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - student outside caller's scope"),
        (status = 404, description = "Student not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Dashboard"
)]
#[instrument(skip(state, auth_user))]
pub async fn get_student_dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentDashboard>, AppError> {
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

    let dashboard = service::get_dashboard(&state.db, &student).await?;

    Ok(Json(dashboard))
}
