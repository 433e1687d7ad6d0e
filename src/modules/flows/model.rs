//! Enrollment flow definitions: a named, ordered sequence of steps a student
//! progresses through. Immutable once referenced by a progress record.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// One unit of a flow. `step_key` is unique within its flow; `step_order`
/// values are strictly increasing and unique, but need not be contiguous.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Step {
    pub step_key: String,
    pub name: String,
    pub step_order: i32,
    pub required: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct FlowRecord {
    pub flow_key: String,
    pub name: String,
    pub branch: String,
    pub program_type: String,
    pub active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A flow with its steps, sorted ascending by `step_order`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FlowDefinition {
    #[serde(flatten)]
    pub flow: FlowRecord,
    pub steps: Vec<Step>,
}

impl FlowDefinition {
    /// Position of a step key in the ordered step list.
    pub fn step_position(&self, step_key: &str) -> Option<usize> {
        self.steps.iter().position(|s| s.step_key == step_key)
    }

    pub fn first_step(&self) -> Option<&Step> {
        self.steps.first()
    }
}
