//! Client configuration.
//!
//! `ClientConfig` is the raw, all-optional form a caller fills in (by hand,
//! from the environment, or through serde). `Connection::new` validates it
//! into `Settings`, which is immutable for the life of the connection.

use std::fmt;

use serde::Deserialize;

use crate::error::ApiError;

/// Origin every versioned path is resolved against.
pub const DEFAULT_BASE_URL: &str = "https://api.fitbit.com";

/// User id meaning "the user the access token belongs to".
pub const DEFAULT_USER_ID: &str = "-";

/// Unvalidated client configuration.
#[derive(Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub access_token: Option<String>,
    pub user_id: Option<String>,
    /// Sent as `Accept-Language` (e.g. `en_US`, `en_GB`) to pick units.
    pub unit_system: Option<String>,
    pub base_url: Option<String>,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `FITBIT_CLIENT_ID`, `FITBIT_CLIENT_SECRET`, `FITBIT_ACCESS_TOKEN`,
    /// `FITBIT_USER_ID`, `FITBIT_UNIT_SYSTEM` and `FITBIT_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            client_id: lookup("FITBIT_CLIENT_ID"),
            client_secret: lookup("FITBIT_CLIENT_SECRET"),
            access_token: lookup("FITBIT_ACCESS_TOKEN"),
            user_id: lookup("FITBIT_USER_ID"),
            unit_system: lookup("FITBIT_UNIT_SYSTEM"),
            base_url: lookup("FITBIT_BASE_URL"),
        }
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_client_secret(mut self, client_secret: impl Into<String>) -> Self {
        self.client_secret = Some(client_secret.into());
        self
    }

    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_unit_system(mut self, unit_system: impl Into<String>) -> Self {
        self.unit_system = Some(unit_system.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Check required fields and apply defaults.
    ///
    /// Reports every missing required field at once. Empty strings count as
    /// missing.
    pub fn validate(self) -> Result<Settings, ApiError> {
        let client_id = present(self.client_id);
        let client_secret = present(self.client_secret);
        let access_token = present(self.access_token);

        let missing: Vec<&str> = [
            ("client_id", client_id.is_none()),
            ("client_secret", client_secret.is_none()),
            ("access_token", access_token.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        match (client_id, client_secret, access_token) {
            (Some(client_id), Some(client_secret), Some(access_token)) => Ok(Settings {
                client_id,
                client_secret,
                access_token,
                user_id: present(self.user_id).unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
                unit_system: present(self.unit_system),
                base_url: present(self.base_url)
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            }),
            _ => Err(ApiError::InvalidArgument(format!(
                "missing required options: {}",
                missing.join(", ")
            ))),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| REDACTED))
            .field("access_token", &self.access_token.as_ref().map(|_| REDACTED))
            .field("user_id", &self.user_id)
            .field("unit_system", &self.unit_system)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Validated, immutable client settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    client_id: String,
    client_secret: String,
    access_token: String,
    user_id: String,
    unit_system: Option<String>,
    base_url: String,
}

impl Settings {
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn unit_system(&self) -> Option<&str> {
        self.unit_system.as_deref()
    }

    /// Base origin without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .field("access_token", &REDACTED)
            .field("user_id", &self.user_id)
            .field("unit_system", &self.unit_system)
            .field("base_url", &self.base_url)
            .finish()
    }
}

const REDACTED: &str = "<redacted>";

fn present(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}
