use axum::{Router, routing::get};

use crate::modules::flows::controller::get_flow;
use crate::state::AppState;

pub fn init_flows_router() -> Router<AppState> {
    Router::new().route("/{flow_key}", get(get_flow))
}
