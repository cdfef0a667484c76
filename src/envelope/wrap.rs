//! Handler wrapping.
//!
//! `construct_response(h)` returns a new axum handler `h'` with
//! `h'(req) = normalize(h(req), req)`.

use std::future::Future;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{debug, error};

use super::{normalize, Envelope, RequestInfo};
use crate::error::ApiError;
use crate::metrics;

/// Wrap a handler that only needs the request descriptor.
pub fn construct_response<H, Fut, R>(
    handler: H,
) -> impl Fn(RequestInfo) -> BoxFuture<'static, Result<Envelope, ApiError>> + Clone + Send + Sync + 'static
where
    H: Fn(RequestInfo) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Serialize + Send + 'static,
{
    move |request: RequestInfo| {
        let handler = handler.clone();
        async move {
            let started = Instant::now();
            let result = handler(request.clone()).await;
            metrics::record_handler_latency(started, request.method.as_str());
            finish(&result, &request)
        }
        .boxed()
    }
}

/// Wrap a handler that takes the request descriptor plus one more extractor.
///
/// `T` is any axum extractor that works on request parts (`State`, `Path`,
/// `Query`, or a tuple of them).
pub fn construct_response_with<H, T, Fut, R>(
    handler: H,
) -> impl Fn(RequestInfo, T) -> BoxFuture<'static, Result<Envelope, ApiError>>
       + Clone
       + Send
       + Sync
       + 'static
where
    H: Fn(RequestInfo, T) -> Fut + Clone + Send + Sync + 'static,
    T: Send + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: Serialize + Send + 'static,
{
    move |request: RequestInfo, extra: T| {
        let handler = handler.clone();
        async move {
            let started = Instant::now();
            let result = handler(request.clone(), extra).await;
            metrics::record_handler_latency(started, request.method.as_str());
            finish(&result, &request)
        }
        .boxed()
    }
}

fn finish<R: Serialize>(result: &R, request: &RequestInfo) -> Result<Envelope, ApiError> {
    match normalize(result, request) {
        Ok(envelope) => {
            metrics::inc_envelopes_built();
            debug!(
                method = %envelope.method,
                url = %envelope.url,
                status = envelope.status_code,
                "envelope built"
            );
            Ok(envelope)
        }
        Err(e) => {
            metrics::inc_envelope_failures();
            error!(method = %request.method, url = %request.url, "malformed handler result: {}", e);
            Err(e.into())
        }
    }
}
