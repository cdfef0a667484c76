//! Response envelopes.
//!
//! Handlers produce a [`HandlerResult`] (or any serializable mapping with the
//! same keys). [`normalize`] reads that mapping together with the inbound
//! request and builds the [`Envelope`] that is sent to clients:
//!
//! ```text
//! {
//!   "message": "OK",
//!   "method": "GET",
//!   "status-code": 200,
//!   "timestamp": "2024-05-01T12:30:00.123456",
//!   "url": "http://localhost:8000/",
//!   "data": {}
//! }
//! ```
//!
//! `data` appears only when the handler result carries it. The HTTP status
//! line is always `200 OK`; the handler's code travels in `status-code`.

pub mod request;
pub mod wrap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::EnvelopeError;

pub use request::RequestInfo;
pub use wrap::{construct_response, construct_response_with};

/// Key holding the human-readable message.
pub const MESSAGE_KEY: &str = "message";
/// Key holding the numeric status code.
pub const STATUS_CODE_KEY: &str = "status-code";
/// Key holding the optional payload.
pub const DATA_KEY: &str = "data";

/// Timestamp layout: ISO-8601 local time.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Same layout with microseconds, used when the fraction is non-zero.
const TIMESTAMP_FORMAT_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Raw result produced by a handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerResult {
    /// Human-readable message.
    pub message: String,
    /// HTTP status code.
    #[serde(rename = "status-code")]
    pub status_code: u16,
    /// Optional payload, copied verbatim into the envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl HandlerResult {
    /// Result whose message is the canonical reason phrase of `status`.
    pub fn new(status: StatusCode) -> Self {
        Self {
            message: status.canonical_reason().unwrap_or_default().to_string(),
            status_code: status.as_u16(),
            data: None,
        }
    }

    /// Result with an explicit message.
    pub fn with_message(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: status.as_u16(),
            data: None,
        }
    }

    /// Attach a payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

/// Normalized response body.
///
/// Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Envelope {
    /// Message taken from the handler result.
    #[schema(example = "OK")]
    pub message: String,
    /// HTTP method of the request.
    #[schema(example = "GET")]
    pub method: String,
    /// Status code taken from the handler result.
    #[serde(rename = "status-code")]
    #[schema(example = 200)]
    pub status_code: u16,
    /// ISO-8601 time at which the envelope was built.
    #[schema(example = "2024-05-01T12:30:00.123456")]
    pub timestamp: String,
    /// Full request URL.
    #[schema(example = "http://localhost:8000/")]
    pub url: String,
    /// Payload, present only when the handler supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
}

impl IntoResponse for Envelope {
    /// Always `200 OK`. Codes such as 1xx, 204 or 304 cannot carry a body, so
    /// the handler's code is reported only inside the envelope.
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Build an envelope from a handler result, stamped with the current time.
pub fn normalize<R>(result: &R, request: &RequestInfo) -> Result<Envelope, EnvelopeError>
where
    R: Serialize + ?Sized,
{
    normalize_at(result, request, Local::now())
}

/// Build an envelope from a handler result, stamped with `at`.
pub fn normalize_at<R>(
    result: &R,
    request: &RequestInfo,
    at: DateTime<Local>,
) -> Result<Envelope, EnvelopeError>
where
    R: Serialize + ?Sized,
{
    let mut fields = match serde_json::to_value(result)? {
        Value::Object(fields) => fields,
        other => {
            return Err(EnvelopeError::NotAMapping {
                found: json_kind(&other),
            })
        }
    };

    let message = match fields.remove(MESSAGE_KEY) {
        Some(Value::String(message)) => message,
        Some(other) => {
            return Err(EnvelopeError::InvalidKey {
                key: MESSAGE_KEY,
                expected: "a string",
                found: json_kind(&other),
            })
        }
        None => return Err(EnvelopeError::MissingKey { key: MESSAGE_KEY }),
    };

    let status_code = match fields.remove(STATUS_CODE_KEY) {
        Some(value) => status_code_from(&value)?,
        None => {
            return Err(EnvelopeError::MissingKey {
                key: STATUS_CODE_KEY,
            })
        }
    };

    Ok(Envelope {
        message,
        method: request.method.as_str().to_string(),
        status_code,
        timestamp: format_timestamp(at),
        url: request.url.clone(),
        data: fields.remove(DATA_KEY),
    })
}

/// Render a timestamp the way envelopes carry it.
///
/// Microseconds are omitted when they are zero.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    if at.timestamp_subsec_micros() == 0 {
        at.format(TIMESTAMP_FORMAT).to_string()
    } else {
        at.format(TIMESTAMP_FORMAT_MICROS).to_string()
    }
}

fn status_code_from(value: &Value) -> Result<u16, EnvelopeError> {
    value
        .as_u64()
        .and_then(|code| u16::try_from(code).ok())
        .filter(|code| StatusCode::from_u16(*code).is_ok())
        .ok_or(EnvelopeError::InvalidKey {
            key: STATUS_CODE_KEY,
            expected: "an HTTP status code",
            found: json_kind(value),
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
