//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use user_registry::outbound::persistence::JsonFileUserRepository;

/// Configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) repository: Arc<JsonFileUserRepository>,
}

impl ServerConfig {
    /// Construct a server configuration bound to `bind_addr` and storing
    /// users through `repository`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, repository: JsonFileUserRepository) -> Self {
        Self {
            bind_addr,
            repository: Arc::new(repository),
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
