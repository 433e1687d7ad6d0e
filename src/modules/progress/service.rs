use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::flows::model::FlowDefinition;
use crate::modules::flows::service as flows_service;
use crate::utils::errors::AppError;

use super::model::{EnrollmentProgress, InitFlowResponse, ProgressSummary};

/// Creates the progress record attaching a student to a flow.
///
/// `current_step` seeds to the lowest-order step. The one-record-per-student
/// rule is enforced by the unique index on `student_id`; a violation
/// surfaces as `AlreadyExists` rather than relying on a check-then-insert.
#[instrument(skip(db))]
pub async fn init_progress(
    db: &PgPool,
    student_id: Uuid,
    household_token: &str,
    flow_key: &str,
) -> Result<InitFlowResponse, AppError> {
    let flow = flows_service::get_active_flow(db, flow_key).await?;

    let current_step = flow
        .first_step()
        .map(|s| s.step_key.clone())
        .unwrap_or_default();

    let progress_id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO enrollment_progress (student_id, household_token, flow_key, current_step)
        VALUES ($1, $2, $3, $4)
        RETURNING id"#,
    )
    .bind(student_id)
    .bind(household_token)
    .bind(flow_key)
    .bind(&current_step)
    .fetch_one(db)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::already_exists(
                    "Enrollment progress already exists for this student",
                );
            }
        }
        AppError::from(e)
    })?;

    Ok(InitFlowResponse {
        progress_id,
        student_id,
        flow_key: flow_key.to_string(),
        current_step,
    })
}

#[instrument(skip(db))]
pub async fn get_progress(db: &PgPool, student_id: Uuid) -> Result<EnrollmentProgress, AppError> {
    sqlx::query_as::<_, EnrollmentProgress>(
        r#"SELECT id, student_id, household_token, flow_key, current_step, completed_steps,
            step_data, status, enrollment_status, version, created_at, updated_at
        FROM enrollment_progress WHERE student_id = $1"#,
    )
    .bind(student_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found("Enrollment progress not found"))
}

/// Derives the summary projection from a progress record and its flow.
pub fn compute_summary(progress: &EnrollmentProgress, flow: &FlowDefinition) -> ProgressSummary {
    let total_steps = flow.steps.len() as i64;
    let completed = progress.completed_steps.len() as i64;

    let progress_percentage = if total_steps == 0 {
        0
    } else {
        100 * completed / total_steps
    };

    let current_step = (!progress.current_step.is_empty()).then(|| progress.current_step.clone());

    let next_action = current_step.as_ref().and_then(|step_key| {
        if progress.completed_steps.iter().any(|s| s == step_key) {
            return None;
        }
        flow.steps
            .iter()
            .find(|s| &s.step_key == step_key)
            .map(|s| s.name.clone())
    });

    ProgressSummary {
        student_id: progress.student_id,
        flow_key: progress.flow_key.clone(),
        status: progress.status.clone(),
        enrollment_status: progress.enrollment_status.clone(),
        current_step,
        completed_steps: progress.completed_steps.clone(),
        total_steps,
        progress_percentage,
        next_action,
    }
}
