use axum::{Router, routing::post};

use crate::modules::events::controller::trigger_flow_event;
use crate::state::AppState;

pub fn init_events_router() -> Router<AppState> {
    Router::new().route("/", post(trigger_flow_event))
}
