//! HTTP API module: the health-check route, its context, and the OpenAPI document.

pub mod context;
pub mod handlers;
pub mod routes;

use utoipa::OpenApi;

use crate::config::Config;
use crate::envelope::Envelope;

pub use context::AppContext;
pub use routes::create_router;

/// OpenAPI description of the service.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::index),
    components(schemas(Envelope)),
    tags((name = "General", description = "Service status"))
)]
pub struct ApiDoc;

/// OpenAPI document carrying the configured title, description and version.
pub fn openapi(config: &Config) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.app_title.clone();
    doc.info.description = Some(config.app_description.clone());
    doc.info.version = config.app_version.clone();
    doc
}

/// OpenAPI document rendered as pretty JSON.
pub fn openapi_json(config: &Config) -> crate::Result<String> {
    Ok(openapi(config).to_pretty_json()?)
}
