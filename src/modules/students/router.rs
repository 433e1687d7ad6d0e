use axum::{Router, routing::get};

use crate::modules::students::controller::list_students;
use crate::state::AppState;

/// Routes nested under `/api/admin/students`.
pub fn init_students_router() -> Router<AppState> {
    Router::new().route("/", get(list_students))
}
