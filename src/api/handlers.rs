//! HTTP API handlers.
//!
//! Handlers return raw [`HandlerResult`]s; routes wrap them with
//! [`construct_response`](crate::envelope::construct_response).

use axum::http::StatusCode;
use serde_json::json;
use tracing::{debug, instrument};

use crate::envelope::{Envelope, HandlerResult, RequestInfo};

/// Health check.
#[utoipa::path(
    get,
    path = "/",
    tag = "General",
    responses(
        (status = 200, description = "Service is up", body = Envelope),
        (status = 500, description = "Handler produced a malformed result")
    )
)]
#[instrument(skip_all, fields(url = %request.url))]
pub async fn index(request: RequestInfo) -> HandlerResult {
    debug!("health check");
    HandlerResult::new(StatusCode::OK).with_data(json!({}))
}
