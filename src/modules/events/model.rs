//! Flow event records and trigger DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// An immutable event-log entry. Written strictly before the corresponding
/// progress mutation so the log can be replayed even if the mutation fails.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FlowEvent {
    pub id: Uuid,
    pub student_id: Uuid,
    pub household_token: String,
    pub event_type: String,
    pub step_key: String,
    pub event_data: serde_json::Value,
    pub triggered_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TriggerEventDto {
    pub student_id: Uuid,
    #[validate(length(min = 1))]
    pub event_type: String,
    #[validate(length(min = 1))]
    pub step_key: String,
    #[serde(default)]
    pub event_data: serde_json::Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TriggerEventResponse {
    pub event_id: Uuid,
    pub student_id: Uuid,
    pub applied: bool,
}
