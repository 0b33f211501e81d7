//! The connection manager: validated settings bound to a transport.

use std::fmt;
use std::sync::Arc;

use crate::config::{ClientConfig, Settings};
use crate::error::ApiError;
use crate::transport::{Transport, UreqTransport};

/// Immutable pairing of `Settings` and a `Transport`.
///
/// Cloning is cheap and clones share the same transport.
#[derive(Clone)]
pub struct Connection {
    settings: Arc<Settings>,
    transport: Arc<dyn Transport>,
}

impl Connection {
    /// Validate `config` and bind the default blocking transport.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Self::with_transport(config, UreqTransport::new())
    }

    /// Validate `config` and bind a caller-supplied transport.
    pub fn with_transport<T>(config: ClientConfig, transport: T) -> Result<Self, ApiError>
    where
        T: Transport + 'static,
    {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    pub fn with_shared_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, ApiError> {
        let settings = config.validate()?;
        Ok(Self {
            settings: Arc::new(settings),
            transport,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
