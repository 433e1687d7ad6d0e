//! Per-student dashboard cards. Pure read projection: each card decides its
//! own visibility from business rules; no transition logic lives here.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::modules::progress::model::ProgressSummary;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ExamReservation {
    pub id: Uuid,
    pub student_id: Uuid,
    pub exam_date: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub score: Option<i32>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassPlacement {
    pub id: Uuid,
    pub student_id: Uuid,
    pub class_name: String,
    pub active: bool,
    pub assigned_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressCard {
    pub shown: bool,
    pub summary: Option<ProgressSummary>,
}

/// Suppressed for the kinder+regular combination: no entrance exam applies
/// there.
#[derive(Debug, Serialize, ToSchema)]
pub struct ExamCard {
    pub shown: bool,
    pub reservation: Option<ExamReservation>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlacementCard {
    pub shown: bool,
    pub placement: Option<ClassPlacement>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BillingCard {
    pub shown: bool,
    pub pending_count: i64,
    pub overdue_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HomeworkCard {
    pub shown: bool,
    pub pending_count: i64,
    pub overdue_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NoticeCard {
    pub shown: bool,
    pub unread_count: i64,
    pub urgent_unread_count: i64,
}

/// Required-reading guide completion, derived from the flow's `guides` step.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuideCard {
    pub shown: bool,
    pub completed: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentDashboard {
    pub student_id: Uuid,
    pub progress: ProgressCard,
    pub exam: ExamCard,
    pub placement: PlacementCard,
    pub billing: BillingCard,
    pub homework: HomeworkCard,
    pub notices: NoticeCard,
    pub guides: GuideCard,
}
