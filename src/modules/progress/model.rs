//! Per-student enrollment progress: the mutable record the flow event
//! processor drives, plus the derived summary projection.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::modules::events::model::FlowEvent;
use crate::utils::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProgressStatus {
    InProgress,
    Completed,
    OnHold,
}

impl ProgressStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressStatus::InProgress => "in_progress",
            ProgressStatus::Completed => "completed",
            ProgressStatus::OnHold => "on_hold",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in_progress" => Ok(ProgressStatus::InProgress),
            "completed" => Ok(ProgressStatus::Completed),
            "on_hold" => Ok(ProgressStatus::OnHold),
            _ => Err(AppError::invalid_input(format!("Invalid status: {}", s))),
        }
    }
}

/// One record per student (1:1, enforced by a unique index). Mutated only by
/// the flow event processor; never deleted. `completed_steps` accumulates
/// monotonically, `version` backs the optimistic concurrency check.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EnrollmentProgress {
    pub id: Uuid,
    pub student_id: Uuid,
    pub household_token: String,
    pub flow_key: String,
    /// Step key within the referenced flow, or empty when unset.
    pub current_step: String,
    pub completed_steps: Vec<String>,
    pub step_data: serde_json::Value,
    pub status: String,
    /// Free-form business status, e.g. new -> payment_completed -> enrolled.
    pub enrollment_status: String,
    pub version: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Derived projection for progress displays.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProgressSummary {
    pub student_id: Uuid,
    pub flow_key: String,
    pub status: String,
    pub enrollment_status: String,
    pub current_step: Option<String>,
    pub completed_steps: Vec<String>,
    pub total_steps: i64,
    pub progress_percentage: i64,
    /// Display name of the current step, present only while the step is set
    /// and not yet completed.
    pub next_action: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct InitFlowDto {
    #[validate(length(min = 1))]
    pub flow_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InitFlowResponse {
    pub progress_id: Uuid,
    pub student_id: Uuid,
    pub flow_key: String,
    pub current_step: String,
}

/// Full progress view: summary plus recent event history (most recent
/// first, capped).
#[derive(Debug, Serialize, ToSchema)]
pub struct ProgressDetailResponse {
    pub summary: ProgressSummary,
    pub events: Vec<FlowEvent>,
}
