//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use super::context::AppContext;
use super::handlers::index;
use crate::envelope::construct_response;

/// Create the API router.
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(construct_response(index)))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
