use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::modules::flows::service as flows_service;
use crate::modules::progress::service as progress_service;
use crate::modules::students::model::Student;
use crate::utils::errors::AppError;

use super::model::{
    BillingCard, ClassPlacement, ExamCard, ExamReservation, GuideCard, HomeworkCard, NoticeCard,
    PlacementCard, ProgressCard, StudentDashboard,
};

const GUIDES_STEP: &str = "guides";

/// Assembles every dashboard card for one student. Missing progress is not
/// an error here: a student without an enrollment flow still has a dashboard,
/// just with the flow-derived cards empty.
#[instrument(skip(db, student), fields(student_id = %student.id))]
pub async fn get_dashboard(db: &PgPool, student: &Student) -> Result<StudentDashboard, AppError> {
    let progress = match progress_service::get_progress(db, student.id).await {
        Ok(p) => Some(p),
        Err(AppError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };

    let flow = match &progress {
        Some(p) => Some(flows_service::get_flow(db, &p.flow_key).await?),
        None => None,
    };

    let progress_card = ProgressCard {
        shown: progress.is_some(),
        summary: progress
            .as_ref()
            .zip(flow.as_ref())
            .map(|(p, f)| progress_service::compute_summary(p, f)),
    };

    // Kinder regular admissions have no entrance exam, so the card would
    // only ever confuse parents there.
    let exam_shown = !(student.branch == "kinder" && student.program_type == "regular");
    let exam_card = ExamCard {
        shown: exam_shown,
        reservation: if exam_shown {
            latest_exam_reservation(db, student.id).await?
        } else {
            None
        },
    };

    let placement = active_placement(db, student.id).await?;
    let placement_card = PlacementCard {
        shown: placement.is_some(),
        placement,
    };

    let (billing_pending, billing_overdue) = billing_counts(db, student.id).await?;
    let billing_card = BillingCard {
        shown: true,
        pending_count: billing_pending,
        overdue_count: billing_overdue,
    };

    let (homework_pending, homework_overdue) = homework_counts(db, student.id).await?;
    let homework_card = HomeworkCard {
        shown: true,
        pending_count: homework_pending,
        overdue_count: homework_overdue,
    };

    let (unread, urgent_unread) =
        notice_counts(db, &student.branch, &student.household_token).await?;
    let notice_card = NoticeCard {
        shown: true,
        unread_count: unread,
        urgent_unread_count: urgent_unread,
    };

    let guides_in_flow = flow
        .as_ref()
        .is_some_and(|f| f.steps.iter().any(|s| s.step_key == GUIDES_STEP));
    let guide_card = GuideCard {
        shown: guides_in_flow,
        completed: guides_in_flow
            && progress
                .as_ref()
                .is_some_and(|p| p.completed_steps.iter().any(|s| s == GUIDES_STEP)),
    };

    Ok(StudentDashboard {
        student_id: student.id,
        progress: progress_card,
        exam: exam_card,
        placement: placement_card,
        billing: billing_card,
        homework: homework_card,
        notices: notice_card,
        guides: guide_card,
    })
}

async fn latest_exam_reservation(
    db: &PgPool,
    student_id: Uuid,
) -> Result<Option<ExamReservation>, AppError> {
    let reservation = sqlx::query_as::<_, ExamReservation>(
        r#"SELECT id, student_id, exam_date, status, score, created_at
        FROM exam_reservations
        WHERE student_id = $1
        ORDER BY created_at DESC
        LIMIT 1"#,
    )
    .bind(student_id)
    .fetch_optional(db)
    .await?;

    Ok(reservation)
}

async fn active_placement(
    db: &PgPool,
    student_id: Uuid,
) -> Result<Option<ClassPlacement>, AppError> {
    let placement = sqlx::query_as::<_, ClassPlacement>(
        r#"SELECT id, student_id, class_name, active, assigned_at
        FROM class_placements
        WHERE student_id = $1 AND active = TRUE
        ORDER BY assigned_at DESC
        LIMIT 1"#,
    )
    .bind(student_id)
    .fetch_optional(db)
    .await?;

    Ok(placement)
}

async fn billing_counts(db: &PgPool, student_id: Uuid) -> Result<(i64, i64), AppError> {
    let row: (i64, i64) = sqlx::query_as(
        r#"SELECT
            COUNT(*) FILTER (WHERE status = 'pending'),
            COUNT(*) FILTER (WHERE status = 'pending' AND due_date < CURRENT_DATE)
        FROM billing_items
        WHERE student_id = $1"#,
    )
    .bind(student_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

async fn homework_counts(db: &PgPool, student_id: Uuid) -> Result<(i64, i64), AppError> {
    let row: (i64, i64) = sqlx::query_as(
        r#"SELECT
            COUNT(*) FILTER (WHERE submitted = FALSE),
            COUNT(*) FILTER (WHERE submitted = FALSE AND due_date < CURRENT_DATE)
        FROM homework_assignments
        WHERE student_id = $1"#,
    )
    .bind(student_id)
    .fetch_one(db)
    .await?;

    Ok(row)
}

/// Notices target a branch (or everyone when `branch` is NULL); a read mark
/// is per household, not per student.
async fn notice_counts(
    db: &PgPool,
    branch: &str,
    household_token: &str,
) -> Result<(i64, i64), AppError> {
    let row: (i64, i64) = sqlx::query_as(
        r#"SELECT
            COUNT(*) FILTER (WHERE r.notice_id IS NULL),
            COUNT(*) FILTER (WHERE r.notice_id IS NULL AND n.urgent = TRUE)
        FROM notices n
        LEFT JOIN notice_reads r
            ON r.notice_id = n.id AND r.household_token = $2
        WHERE n.branch IS NULL OR n.branch = $1"#,
    )
    .bind(branch)
    .bind(household_token)
    .fetch_one(db)
    .await?;

    Ok(row)
}
