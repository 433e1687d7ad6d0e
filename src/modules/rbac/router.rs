use axum::{Router, routing::post};

use crate::modules::rbac::controller::{set_admin_branches, set_admin_permission};
use crate::state::AppState;

/// Routes nested under `/api/admin/permissions`.
pub fn init_permissions_router() -> Router<AppState> {
    Router::new()
        .route("/set-branches", post(set_admin_branches))
        .route("/set-permission", post(set_admin_permission))
}
