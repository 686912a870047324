use std::sync::Arc;

use axum::{
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::lines::LineStore;

pub mod lines;

/// Shared handler state: the line store behind its repository seam.
#[derive(Clone)]
pub struct ServerState {
    pub lines: Arc<LineStore>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(cors: CorsLayer, state: ServerState) -> Router {
    let public = Router::new().route("/health", get(health));

    let lines_routes = Router::new()
        .route("/lines", get(lines::list_lines).post(lines::create_line))
        .route(
            "/lines/:id",
            get(lines::get_line).put(lines::update_line).delete(lines::delete_line),
        );

    public
        .merge(lines_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
