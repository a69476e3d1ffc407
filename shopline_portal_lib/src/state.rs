use std::sync::Arc;

use shopline_api::Client;

use crate::{config::PortalConfig, error::PortalError, session::SessionStore};

/// Shared, read-mostly state handed to every handler. Only the session
/// store changes after startup.
pub struct PortalState {
    pub config: PortalConfig,
    pub client: Client,
    pub sessions: SessionStore,
}

impl PortalState {
    /// Builds the state with an API client taken from `config`.
    pub fn new(config: PortalConfig) -> Result<Arc<Self>, PortalError> {
        let client = Client::new(config.client_config())?;
        Ok(Self::with_client(config, client))
    }

    /// Builds the state around an explicitly configured client.
    pub fn with_client(config: PortalConfig, client: Client) -> Arc<Self> {
        let sessions = SessionStore::new(config.session_ttl);
        Arc::new(Self {
            config,
            client,
            sessions,
        })
    }

    /// Whether the API client has a credential to call with.
    pub fn has_access_token(&self) -> bool {
        self.client.config().has_token()
    }
}
