use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::flows::service as flows_service;
use crate::modules::progress::service as progress_service;
use crate::modules::students::service as students_service;
use crate::utils::errors::AppError;
use crate::utils::notify;

use super::model::{FlowEvent, TriggerEventDto, TriggerEventResponse};
use super::transition::{self, EventKind, ProgressUpdate};

/// Processes one flow event for a student.
///
/// The event-log append happens strictly before the progress mutation, and
/// is never rolled back if the mutation fails: the log records intent, the
/// progress record is the authority on confirmed state. The mutation itself
/// is guarded by an optimistic version check; a lost race is a `Conflict`.
#[instrument(skip(db, dto), fields(event_type = %dto.event_type, step_key = %dto.step_key))]
pub async fn trigger_event(
    db: &PgPool,
    dto: TriggerEventDto,
    triggered_by: &str,
) -> Result<TriggerEventResponse, AppError> {
    let student = students_service::get_student(db, dto.student_id).await?;
    let progress = progress_service::get_progress(db, student.id).await?;

    // Log first. Once student and progress resolve the append is
    // unconditional; anything that fails later leaves the row in place.
    let event_id: Uuid = sqlx::query_scalar(
        r#"INSERT INTO flow_events (student_id, household_token, event_type, step_key, event_data, triggered_by)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id"#,
    )
    .bind(student.id)
    .bind(&student.household_token)
    .bind(&dto.event_type)
    .bind(&dto.step_key)
    .bind(&dto.event_data)
    .bind(triggered_by)
    .fetch_one(db)
    .await?;

    let flow = flows_service::get_flow(db, &progress.flow_key).await?;

    let kind = EventKind::classify(&dto.event_type);
    let update = transition::apply_transition(&progress, &flow, kind, &dto.step_key, &dto.event_data);

    let applied = match update {
        Some(update) => {
            let flow_finished = update
                .status
                .map(|s| s == crate::modules::progress::model::ProgressStatus::Completed)
                .unwrap_or(false);

            persist_update(db, progress.id, progress.version, &update).await?;

            if flow_finished {
                notify::enqueue(
                    db.clone(),
                    student.household_token.clone(),
                    format!("{} has completed the {} enrollment flow.", student.name, flow.flow.name),
                );
            }

            true
        }
        None => false,
    };

    Ok(TriggerEventResponse {
        event_id,
        student_id: student.id,
        applied,
    })
}

async fn persist_update(
    db: &PgPool,
    progress_id: Uuid,
    expected_version: i64,
    update: &ProgressUpdate,
) -> Result<(), AppError> {
    let result = sqlx::query(
        r#"UPDATE enrollment_progress SET
            completed_steps = $1,
            step_data = $2,
            current_step = COALESCE($3, current_step),
            status = COALESCE($4, status),
            enrollment_status = COALESCE($5, enrollment_status),
            version = version + 1,
            updated_at = now()
        WHERE id = $6 AND version = $7"#,
    )
    .bind(&update.completed_steps)
    .bind(&update.step_data)
    .bind(update.current_step.as_deref())
    .bind(update.status.map(|s| s.as_str()))
    .bind(update.enrollment_status.as_deref())
    .bind(progress_id)
    .bind(expected_version)
    .execute(db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::conflict(
            "Enrollment progress was modified concurrently; retry the event",
        ));
    }

    Ok(())
}

/// Recent event history for a student, most recent first.
#[instrument(skip(db))]
pub async fn recent_events(
    db: &PgPool,
    student_id: Uuid,
    limit: i64,
) -> Result<Vec<FlowEvent>, AppError> {
    let events = sqlx::query_as::<_, FlowEvent>(
        r#"SELECT id, student_id, household_token, event_type, step_key, event_data, triggered_by, created_at
        FROM flow_events
        WHERE student_id = $1
        ORDER BY created_at DESC
        LIMIT $2"#,
    )
    .bind(student_id)
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(events)
}
