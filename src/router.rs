use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::dashboard::router::init_dashboard_router;
use crate::modules::events::router::init_events_router;
use crate::modules::flows::controller::init_flows;
use crate::modules::flows::router::init_flows_router;
use crate::modules::progress::router::{init_admin_progress_router, init_progress_router};
use crate::modules::rbac::controller::init_rbac;
use crate::modules::rbac::router::init_permissions_router;
use crate::modules::students::router::init_students_router;
use crate::state::AppState;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::json;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .route(
                    "/",
                    get(|| async { Json(json!({ "message": "Frage EDU API" })) }),
                )
                .nest("/flow-event", init_events_router())
                .nest(
                    "/students",
                    init_progress_router().merge(init_dashboard_router()),
                )
                .nest("/flows", init_flows_router())
                .nest(
                    "/admin/students",
                    init_students_router().merge(init_admin_progress_router()),
                )
                .nest("/admin/permissions", init_permissions_router())
                .route("/admin/init-flows", post(init_flows))
                .route("/admin/init-rbac", post(init_rbac)),
        )
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
