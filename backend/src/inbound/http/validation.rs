//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field failures surface as `invalid_request` errors whose message is the
//! client-facing sentence and whose details name the offending member:
//!
//! ```json
//! {"code":"invalid_request","message":"Email is required",
//!  "details":{"field":"email","code":"missing_field"}}
//! ```

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde_json::json;

use crate::domain::{Error, UserValidationError};

/// Largest JSON body accepted by the write endpoints.
pub const JSON_PAYLOAD_LIMIT: usize = 100 * 1024;

/// Convert a payload validation failure into the API error envelope.
pub(crate) fn user_validation_error(err: UserValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": err.field().key(),
        "code": err.code(),
    }))
}

fn json_payload_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let code = match &err {
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "payload_too_large"
        }
        JsonPayloadError::ContentType => "unsupported_content_type",
        _ => "invalid_json",
    };
    Error::invalid_request(format!("Invalid JSON body: {err}"))
        .with_details(json!({ "code": code }))
        .into()
}

/// JSON extractor configuration shared by every write endpoint.
///
/// Malformed, oversized or mistyped bodies are answered with the standard
/// error envelope instead of Actix's plain-text default.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_PAYLOAD_LIMIT)
        .error_handler(json_payload_error)
}
