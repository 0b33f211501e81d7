//! The request dispatcher.
//!
//! # Design
//! `build_request` is pure: it turns a verb, a version-qualified path and
//! form parameters into an `HttpRequest` with every header in place.
//! `execute` sends that request through the connection's transport exactly
//! once. The dispatcher never picks an API version; the `1/` or `1.2/`
//! prefix is the caller's job.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use tracing::debug;

use crate::connection::Connection;
use crate::error::{ApiError, FitbitError};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// How a request authenticates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// `Bearer <access_token>`, used by every resource call.
    Bearer,
    /// `Basic base64(client_id:client_secret)`, used by the OAuth2 endpoints.
    Basic,
}

impl Connection {
    /// Assemble a bearer-authenticated request.
    ///
    /// For POST and PUT, `params` become the form-urlencoded body. For GET and
    /// DELETE they are ignored; query values belong in `path`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        self.build_request_with(Auth::Bearer, method, path, params)
    }

    pub fn build_request_with(
        &self,
        auth: Auth,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpRequest, ApiError> {
        let settings = self.settings();

        let authorization = match auth {
            Auth::Bearer => format!("Bearer {}", settings.access_token()),
            Auth::Basic => {
                let credentials = format!("{}:{}", settings.client_id(), settings.client_secret());
                format!("Basic {}", BASE64_STANDARD.encode(credentials))
            }
        };
        let mut headers = vec![
            ("Authorization".to_string(), authorization),
            ("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string()),
        ];
        if let Some(unit_system) = settings.unit_system() {
            headers.push(("Accept-Language".to_string(), unit_system.to_string()));
        }

        let body = if method.carries_body() && !params.is_empty() {
            let encoded = serde_urlencoded::to_string(params)
                .map_err(|e| ApiError::InvalidArgument(format!("unencodable parameters: {e}")))?;
            Some(encoded)
        } else {
            None
        };

        Ok(HttpRequest {
            method,
            url: format!("{}/{}", settings.base_url(), path.trim_start_matches('/')),
            headers,
            body,
        })
    }

    /// Build a bearer-authenticated request and perform one round-trip.
    pub fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, FitbitError> {
        self.execute_with(Auth::Bearer, method, path, params)
    }

    pub fn execute_with(
        &self,
        auth: Auth,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<HttpResponse, FitbitError> {
        let request = self.build_request_with(auth, method, path, params)?;
        debug!(method = %request.method, url = %request.url, "dispatching request");
        let response = self.transport().send(&request)?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::ClientConfig;
    use crate::error::TransportError;
    use crate::transport::Transport;

    fn config() -> ClientConfig {
        ClientConfig::new()
            .with_client_id("22ABCD")
            .with_client_secret("s3cret")
            .with_access_token("token-123")
    }

    fn connection(config: ClientConfig) -> Connection {
        Connection::with_transport(config, Recorder::default()).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Recorder {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(HttpResponse::new(200, "{}"))
        }
    }

    struct Refusing;

    impl Transport for Refusing {
        fn send(&self, _request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            Err(TransportError::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "connection refused",
            )))
        }
    }

    #[test]
    fn get_request_has_standard_headers() {
        let req = connection(config())
            .build_request(HttpMethod::Get, "1/user/-/profile.json", &[])
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "https://api.fitbit.com/1/user/-/profile.json");
        assert_eq!(req.header("authorization"), Some("Bearer token-123"));
        assert_eq!(req.header("content-type"), Some(FORM_CONTENT_TYPE));
        assert_eq!(req.header("accept-language"), None);
        assert!(req.body.is_none());
    }

    #[test]
    fn unit_system_sets_accept_language() {
        let req = connection(config().with_unit_system("en_GB"))
            .build_request(HttpMethod::Delete, "1/user/-/activities/1.json", &[])
            .unwrap();
        assert_eq!(req.header("Accept-Language"), Some("en_GB"));
    }

    #[test]
    fn post_params_become_form_body() {
        let req = connection(config())
            .build_request(
                HttpMethod::Post,
                "1/user/-/body/log/weight.json",
                &[("weight", "73.5"), ("date", "2024-03-15"), ("note", "a&b c")],
            )
            .unwrap();
        assert_eq!(
            req.body.as_deref(),
            Some("weight=73.5&date=2024-03-15&note=a%26b+c")
        );
    }

    #[test]
    fn get_params_are_not_sent_as_body() {
        let req = connection(config())
            .build_request(HttpMethod::Get, "1/foods/search.json?query=apple", &[("x", "y")])
            .unwrap();
        assert!(req.body.is_none());
        assert_eq!(req.url, "https://api.fitbit.com/1/foods/search.json?query=apple");
    }

    #[test]
    fn both_api_versions_pass_through_untouched() {
        let conn = connection(config());
        let v1 = conn.build_request(HttpMethod::Get, "1/user/-/devices.json", &[]).unwrap();
        let v12 = conn
            .build_request(HttpMethod::Get, "/1.2/user/-/sleep/date/today.json", &[])
            .unwrap();
        assert_eq!(v1.url, "https://api.fitbit.com/1/user/-/devices.json");
        assert_eq!(v12.url, "https://api.fitbit.com/1.2/user/-/sleep/date/today.json");
    }

    #[test]
    fn basic_auth_encodes_client_credentials() {
        let req = connection(config())
            .build_request_with(Auth::Basic, HttpMethod::Post, "oauth2/revoke", &[("token", "t")])
            .unwrap();
        // base64("22ABCD:s3cret")
        assert_eq!(req.header("Authorization"), Some("Basic MjJBQkNEOnMzY3JldA=="));
        assert_eq!(req.body.as_deref(), Some("token=t"));
    }

    #[test]
    fn execute_sends_exactly_once() {
        let recorder = std::sync::Arc::new(Recorder::default());
        let conn = Connection::with_shared_transport(config(), recorder.clone()).unwrap();
        let response = conn.execute(HttpMethod::Get, "1/user/-/profile.json", &[]).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn transport_failures_pass_through() {
        let conn = Connection::with_transport(config(), Refusing).unwrap();
        let err = conn.execute(HttpMethod::Get, "1/user/-/profile.json", &[]).unwrap_err();
        assert!(matches!(err, FitbitError::Transport(_)));
        assert_eq!(err.to_string(), "connection refused");
    }
}
