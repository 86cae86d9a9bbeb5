//! Route definitions for the factdesk API.

pub mod ask;
pub mod dashboard;
pub mod health;
pub mod message_groups;
pub mod topics;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, patch, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Largest accepted request body; answers and questions are short texts.
const MAX_BODY_BYTES: usize = 64 * 1024;

fn cors(frontend_url: &str) -> CorsLayer {
    let origin = match HeaderValue::from_str(frontend_url) {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, allowing any origin");
            AllowOrigin::any()
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Full application router with tracing, CORS, compression and a body limit.
pub fn build_router(state: AppState) -> Router {
    let topic_routes = Router::new()
        .route("/topics", get(topics::list))
        .route("/topics/count", get(topics::count))
        .route("/topics/{id}", get(topics::get_by_id))
        .route("/topics/{id}/status", put(topics::update_status))
        .route("/topics/{id}/approve", patch(topics::approve))
        .route("/topics/{id}/reject", patch(topics::reject))
        .route("/topics/{id}/message-group", get(topics::message_groups))
        .route("/topics/{id}/messages", get(topics::messages))
        .route(
            "/topics/{id}/answer",
            get(topics::get_answer).put(topics::update_answer),
        )
        .route("/topics/{id}/audit-logs", get(topics::audit_logs));

    let message_group_routes = Router::new()
        .route("/message-groups", get(message_groups::list))
        .route("/message-groups/count", get(message_groups::count))
        .route("/message-groups/{id}", get(message_groups::get_by_id))
        .route(
            "/message-groups/{id}/status",
            put(message_groups::update_status),
        );

    let ask_routes = Router::new()
        .route("/ask", post(ask::ask))
        .route("/ask/{id}", get(ask::get_by_id));

    let dashboard_routes = Router::new().route("/dashboard/stats", get(dashboard::stats));

    let api = topic_routes
        .merge(message_group_routes)
        .merge(ask_routes)
        .merge(dashboard_routes);
    let cors = cors(&state.config.frontend_url);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
