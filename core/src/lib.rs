//! Blocking, authenticated client core for the Fitbit Web API.
//!
//! # Overview
//! Every call follows the same pipeline: normalize date/time arguments,
//! assemble a version-qualified request with bearer auth, send it through a
//! `Transport`, and interpret the status code into a payload or a typed
//! `ApiError`.
//!
//! # Design
//! - `ClientConfig` is validated once into immutable `Settings`; a
//!   `Connection` pairs them with a shared `Transport`.
//! - `Connection::build_request` is pure and `Connection::execute` does one
//!   round-trip, so the I/O boundary stays explicit.
//! - `interpret` is an ordered status match; array bodies are reshaped into
//!   `{"body": [...]}` and rate-limit headers are merged into 200 payloads.
//! - Failures come through three channels in `FitbitError`: the `ApiError`
//!   taxonomy, transport errors, and JSON decode errors.
//! - No retries, token refresh or backoff happen automatically.

mod auth;
pub mod client;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod interpret;
pub mod normalize;
pub mod rate_limit;
mod resources;
pub mod transport;

pub use client::FitbitClient;
pub use config::{ClientConfig, Settings, DEFAULT_BASE_URL, DEFAULT_USER_ID};
pub use connection::Connection;
pub use dispatch::Auth;
pub use error::{ApiError, FitbitError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use interpret::{classify, interpret, Outcome, Payload};
pub use normalize::{
    format_date, format_time, require_end_date, require_start_date, DateArg, TimeArg,
};
pub use rate_limit::RateLimitInfo;
pub use transport::{Transport, UreqTransport};
