//! The response interpreter.
//!
//! # Design
//! `classify` is an ordered match over the status code; the first arm that
//! matches decides the outcome. `interpret` then either decodes the body,
//! returns a fixed value, or raises the taxonomy error. Array bodies are
//! reshaped into `{"body": [...]}` here so callers only ever see a map.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ApiError, FitbitError};
use crate::http::HttpResponse;
use crate::rate_limit::RateLimitInfo;

/// A decoded success body.
pub type Payload = Map<String, Value>;

/// What a status code means before the body is looked at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// 200: decode the body.
    Decode,
    /// 201: empty map, body ignored.
    Created,
    /// 204: no value, body ignored.
    NoContent,
    Fail(ApiError),
}

pub fn classify(status: u16) -> Outcome {
    match status {
        200 => Outcome::Decode,
        201 => Outcome::Created,
        204 => Outcome::NoContent,
        400 => Outcome::Fail(ApiError::BadRequest),
        401 => Outcome::Fail(ApiError::Unauthorized),
        403 => Outcome::Fail(ApiError::Forbidden),
        404 => Outcome::Fail(ApiError::NotFound),
        429 => Outcome::Fail(ApiError::ApiLimit),
        500..=599 => Outcome::Fail(ApiError::ServerError { status }),
        _ => Outcome::Fail(ApiError::Unexpected { status }),
    }
}

/// Turn a raw response into a payload, `None` (204), or an error.
///
/// Malformed JSON on a 200 fails as `FitbitError::Decode`, outside the
/// taxonomy.
pub fn interpret(response: &HttpResponse) -> Result<Option<Payload>, FitbitError> {
    match classify(response.status) {
        Outcome::Decode => decode(response).map(Some),
        Outcome::Created => Ok(Some(Payload::new())),
        Outcome::NoContent => Ok(None),
        Outcome::Fail(err) => {
            warn!(status = response.status, error = %err, "request rejected");
            Err(err.into())
        }
    }
}

fn decode(response: &HttpResponse) -> Result<Payload, FitbitError> {
    let mut payload = match serde_json::from_str::<Value>(&response.body)? {
        Value::Object(map) => map,
        other => {
            let mut wrapped = Payload::new();
            wrapped.insert("body".to_string(), other);
            wrapped
        }
    };
    RateLimitInfo::from_headers(&response.headers).merge_into(&mut payload);
    Ok(payload)
}
