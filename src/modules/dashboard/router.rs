use axum::{Router, routing::get};

use crate::modules::dashboard::controller::get_student_dashboard;
use crate::state::AppState;

/// Routes nested under `/api/students`.
pub fn init_dashboard_router() -> Router<AppState> {
    Router::new().route("/{id}/dashboard", get(get_student_dashboard))
}
