//! Small HTTP API that answers with uniform JSON envelopes.
//!
//! Every handler returns a raw result mapping (`message`, `status-code`,
//! optional `data`). Routes wrap handlers with
//! [`envelope::construct_response`], which adds the request method, the full
//! request URL and a timestamp:
//!
//! ```text
//! GET /  ->  {"message":"OK","method":"GET","status-code":200,
//!             "timestamp":"...","url":"http://host/","data":{}}
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`envelope`]: Handler results, envelopes and handler wrapping
//! - [`api`]: HTTP routes, application context, OpenAPI document
//! - [`metrics`]: Envelope counters and handler latency
//! - [`server`]: Binding, serving and graceful shutdown
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;

pub use config::Config;
pub use envelope::{construct_response, Envelope, HandlerResult};
pub use error::{ApiError, Result};
