//! The enrollment state-transition rule.
//!
//! Events are classified into a closed set of kinds, each with an explicit
//! handler; unrecognized event types are tolerated as observational (logged
//! but producing no field updates). Everything here is pure so the rule is
//! testable without a database.

use crate::modules::flows::model::FlowDefinition;
use crate::modules::progress::model::{EnrollmentProgress, ProgressStatus};

/// Step keys the payment handler acts on.
const PAYMENT_STEPS: [&str; 2] = ["entrance_payment", "tuition_payment"];

const PLACEMENT_STEP: &str = "placement";

/// Closed classification of incoming event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// `*.completed`: completes a step and advances the flow linearly.
    Completion,
    /// `payment.paid*`: completes a payment step without advancing.
    Payment,
    /// `class.assigned*`: completes the placement step.
    Placement,
    /// Anything else: recorded in the log, no state change.
    Observational,
}

impl EventKind {
    pub fn classify(event_type: &str) -> Self {
        if event_type.ends_with(".completed") {
            EventKind::Completion
        } else if event_type.starts_with("payment.paid") {
            EventKind::Payment
        } else if event_type.starts_with("class.assigned") {
            EventKind::Placement
        } else {
            EventKind::Observational
        }
    }
}

/// Field updates produced by a transition. `completed_steps` and `step_data`
/// are the full new values; the optional fields are only set when changed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    pub completed_steps: Vec<String>,
    pub step_data: serde_json::Value,
    pub current_step: Option<String>,
    pub status: Option<ProgressStatus>,
    pub enrollment_status: Option<String>,
}

/// Applies the transition rule for one event against the current progress.
///
/// Returns `None` when the event produces no field updates (observational
/// events, or pattern handlers whose step-key guard does not match).
pub fn apply_transition(
    progress: &EnrollmentProgress,
    flow: &FlowDefinition,
    kind: EventKind,
    step_key: &str,
    event_data: &serde_json::Value,
) -> Option<ProgressUpdate> {
    match kind {
        EventKind::Completion => Some(apply_completion(progress, flow, step_key, event_data)),
        EventKind::Payment => apply_payment(progress, step_key),
        EventKind::Placement => apply_placement(progress, step_key),
        EventKind::Observational => None,
    }
}

/// Set-semantics union; re-sending the same event is a no-op.
fn completed_with(progress: &EnrollmentProgress, step_key: &str) -> Vec<String> {
    let mut steps = progress.completed_steps.clone();
    if !steps.iter().any(|s| s == step_key) {
        steps.push(step_key.to_string());
    }
    steps
}

fn apply_completion(
    progress: &EnrollmentProgress,
    flow: &FlowDefinition,
    step_key: &str,
    event_data: &serde_json::Value,
) -> ProgressUpdate {
    let completed_steps = completed_with(progress, step_key);

    let mut step_data = progress.step_data.clone();
    if let Some(map) = step_data.as_object_mut() {
        map.insert(step_key.to_string(), event_data.clone());
    } else {
        step_data = serde_json::json!({ step_key: event_data });
    }

    let mut update = ProgressUpdate {
        completed_steps,
        step_data,
        current_step: None,
        status: None,
        enrollment_status: None,
    };

    // A step key not present in the flow is tolerated: the completion is
    // recorded but the advance is silently skipped.
    if let Some(position) = flow.step_position(step_key) {
        if position + 1 < flow.steps.len() {
            update.current_step = Some(flow.steps[position + 1].step_key.clone());
        } else {
            update.status = Some(ProgressStatus::Completed);
            update.enrollment_status = Some("enrolled".to_string());
        }
    }

    update
}

/// Payment completion is deliberately decoupled from step advancement: the
/// step is marked complete and the business status moves, but `current_step`
/// stays put until a separate `.completed` event arrives.
fn apply_payment(progress: &EnrollmentProgress, step_key: &str) -> Option<ProgressUpdate> {
    if !PAYMENT_STEPS.contains(&step_key) {
        return None;
    }

    let enrollment_status = match step_key {
        "entrance_payment" => "payment_completed",
        _ => "tuition_paid",
    };

    Some(ProgressUpdate {
        completed_steps: completed_with(progress, step_key),
        step_data: progress.step_data.clone(),
        current_step: None,
        status: None,
        enrollment_status: Some(enrollment_status.to_string()),
    })
}

fn apply_placement(progress: &EnrollmentProgress, step_key: &str) -> Option<ProgressUpdate> {
    if step_key != PLACEMENT_STEP {
        return None;
    }

    Some(ProgressUpdate {
        completed_steps: completed_with(progress, step_key),
        step_data: progress.step_data.clone(),
        current_step: None,
        status: None,
        enrollment_status: Some("enrolled".to_string()),
    })
}
