//! Blocking client for the Fitbit Web API.
//!
//! # Design
//! `FitbitClient` wraps a `Connection` and adds nothing but the
//! dispatch-then-interpret sequence. Resource methods (see `resources`) and
//! the OAuth2 helpers (see `auth`) are thin layers on top of `request`.
//! The client holds no mutable state, so one instance can serve concurrent
//! callers as long as its transport allows it.

use crate::config::ClientConfig;
use crate::connection::Connection;
use crate::error::{ApiError, FitbitError};
use crate::http::HttpMethod;
use crate::interpret::{interpret, Payload};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct FitbitClient {
    connection: Connection,
}

impl FitbitClient {
    /// Validate `config` and connect with the default transport.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::from_connection(Connection::new(config)?))
    }

    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Result<Self, ApiError>
    where
        T: Transport + 'static,
    {
        Ok(Self::from_connection(Connection::with_transport(
            config, transport,
        )?))
    }

    pub fn from_connection(connection: Connection) -> Self {
        Self { connection }
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The user id resource paths are built with (`-` by default).
    pub fn user_id(&self) -> &str {
        self.connection.settings().user_id()
    }

    /// Send one request and interpret its response.
    ///
    /// Returns `None` only for 204 No Content.
    pub fn request(
        &self,
        method: HttpMethod,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<Payload>, FitbitError> {
        let response = self.connection.execute(method, path, params)?;
        interpret(&response)
    }

    pub fn get(&self, path: &str) -> Result<Option<Payload>, FitbitError> {
        self.request(HttpMethod::Get, path, &[])
    }

    pub fn post(&self, path: &str, params: &[(&str, &str)]) -> Result<Option<Payload>, FitbitError> {
        self.request(HttpMethod::Post, path, params)
    }

    pub fn delete(&self, path: &str) -> Result<Option<Payload>, FitbitError> {
        self.request(HttpMethod::Delete, path, &[])
    }

    /// Prefix `rest` with `{version}/user/{user_id}/`.
    pub(crate) fn user_path(&self, version: &str, rest: &str) -> String {
        format!("{version}/user/{}/{rest}", self.user_id())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::TransportError;
    use crate::http::{HttpRequest, HttpResponse};

    /// Replies with a canned response and remembers every request.
    #[derive(Clone)]
    pub(crate) struct Canned {
        response: HttpResponse,
        pub(crate) sent: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl Canned {
        pub(crate) fn new(response: HttpResponse) -> Self {
            Self {
                response,
                sent: Arc::default(),
            }
        }

        pub(crate) fn last(&self) -> HttpRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for Canned {
        fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    pub(crate) fn config() -> ClientConfig {
        ClientConfig::new()
            .with_client_id("22ABCD")
            .with_client_secret("s3cret")
            .with_access_token("token-123")
    }

    pub(crate) fn client_with(response: HttpResponse) -> (FitbitClient, Canned) {
        let transport = Canned::new(response);
        let client = FitbitClient::with_transport(config(), transport.clone()).unwrap();
        (client, transport)
    }

    #[test]
    fn get_returns_decoded_payload() {
        let (client, transport) = client_with(HttpResponse::new(200, r#"{"goals":{"steps":10000}}"#));
        let payload = client.get("1/user/-/activities/goals/daily.json").unwrap().unwrap();
        assert_eq!(payload["goals"]["steps"], 10000);
        assert_eq!(transport.last().method, HttpMethod::Get);
    }

    #[test]
    fn delete_maps_no_content_to_none() {
        let (client, transport) = client_with(HttpResponse::new(204, ""));
        assert_eq!(client.delete("1/user/-/activities/42.json").unwrap(), None);
        assert_eq!(transport.last().method, HttpMethod::Delete);
    }

    #[test]
    fn post_errors_propagate_as_taxonomy() {
        let (client, _) = client_with(HttpResponse::new(429, "{}"));
        let err = client.post("1/user/-/foods/log.json", &[("foodId", "1")]).unwrap_err();
        assert_eq!(err.api(), Some(&ApiError::ApiLimit));
    }

    #[test]
    fn user_path_uses_configured_user() {
        let client = FitbitClient::with_transport(
            config().with_user_id("ABC123"),
            Canned::new(HttpResponse::new(200, "{}")),
        )
        .unwrap();
        assert_eq!(client.user_path("1.2", "sleep/list.json"), "1.2/user/ABC123/sleep/list.json");
    }
}
