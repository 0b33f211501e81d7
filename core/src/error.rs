//! Error types for the Fitbit client.
//!
//! # Design
//! Three failure channels are kept apart in `FitbitError`:
//! - `Api` — the typed taxonomy derived from status codes, argument
//!   normalization, or config validation. Callers branch on these.
//! - `Transport` — whatever the transport failed with (connect, TLS,
//!   timeout), passed through untouched.
//! - `Decode` — a 200 body that was not valid JSON, straight from
//!   `serde_json`.
//!
//! Taxonomy errors deliberately carry no upstream body detail.

use thiserror::Error;

/// Typed failures a caller is expected to match on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400: the request was malformed or had invalid parameters.
    #[error("bad request")]
    BadRequest,

    /// 401: the access token is missing, expired or invalid.
    #[error("unauthorized")]
    Unauthorized,

    /// 403: the token lacks the scope for this resource.
    #[error("forbidden")]
    Forbidden,

    /// 404: the resource does not exist.
    #[error("not found")]
    NotFound,

    /// 429: the hourly rate limit was exceeded.
    #[error("API rate limit exceeded")]
    ApiLimit,

    /// Any status in 500..=599.
    #[error("server error (HTTP {status})")]
    ServerError { status: u16 },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// A status code outside the handled set.
    #[error("unexpected response status: {status}")]
    Unexpected { status: u16 },
}

impl ApiError {
    /// The HTTP status this error was derived from, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest => Some(400),
            ApiError::Unauthorized => Some(401),
            ApiError::Forbidden => Some(403),
            ApiError::NotFound => Some(404),
            ApiError::ApiLimit => Some(429),
            ApiError::ServerError { status } | ApiError::Unexpected { status } => Some(*status),
            ApiError::InvalidArgument(_) | ApiError::InvalidDate(_) | ApiError::InvalidTime(_) => {
                None
            }
        }
    }
}

/// Failure raised by a `Transport` before any response was received.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct TransportError(Box<dyn std::error::Error + Send + Sync + 'static>);

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self(Box::new(source))
    }

    /// The underlying transport error.
    pub fn inner(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.0.as_ref()
    }
}

/// Every way a client call can fail.
#[derive(Debug, Error)]
pub enum FitbitError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

impl FitbitError {
    /// The taxonomy error, when this failure belongs to that channel.
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            FitbitError::Api(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unexpected_message_carries_status() {
        let err = ApiError::Unexpected { status: 302 };
        assert!(err.to_string().contains("302"));
        assert_eq!(err.status(), Some(302));
    }

    #[test]
    fn argument_errors_have_no_status() {
        assert_eq!(ApiError::InvalidDate("x".into()).status(), None);
        assert_eq!(ApiError::InvalidArgument("x".into()).status(), None);
    }

    #[test]
    fn transport_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let err = FitbitError::from(TransportError::new(io));
        assert_eq!(err.to_string(), "connection refused");
        assert!(err.api().is_none());
    }
}
