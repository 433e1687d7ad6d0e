use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::progress::controller::{get_student_progress, init_student_flow};
use crate::state::AppState;

/// Routes nested under `/api/students`.
pub fn init_progress_router() -> Router<AppState> {
    Router::new().route("/{id}/progress", get(get_student_progress))
}

/// Routes nested under `/api/admin/students`.
pub fn init_admin_progress_router() -> Router<AppState> {
    Router::new().route("/{id}/init-flow", post(init_student_flow))
}
