//! OAuth2 token maintenance.
//!
//! Both endpoints sit outside the versioned resource tree and authenticate
//! with the client credentials rather than the access token. Neither call
//! changes the client; build a new one with the returned token.

use tracing::info;

use crate::client::FitbitClient;
use crate::dispatch::Auth;
use crate::error::FitbitError;
use crate::http::HttpMethod;
use crate::interpret::{interpret, Payload};

const TOKEN_PATH: &str = "oauth2/token";
const REVOKE_PATH: &str = "oauth2/revoke";

impl FitbitClient {
    /// Exchange `refresh_token` for a new token pair.
    pub fn refresh_token(&self, refresh_token: &str) -> Result<Payload, FitbitError> {
        let params = [("grant_type", "refresh_token"), ("refresh_token", refresh_token)];
        let response = self.connection().execute_with(
            Auth::Basic,
            HttpMethod::Post,
            TOKEN_PATH,
            &params,
        )?;
        let payload = interpret(&response)?.unwrap_or_default();
        info!("access token refreshed");
        Ok(payload)
    }

    /// Revoke an access or refresh token.
    pub fn revoke_token(&self, token: &str) -> Result<Option<Payload>, FitbitError> {
        let response = self.connection().execute_with(
            Auth::Basic,
            HttpMethod::Post,
            REVOKE_PATH,
            &[("token", token)],
        )?;
        let payload = interpret(&response)?;
        info!("token revoked");
        Ok(payload)
    }
}
