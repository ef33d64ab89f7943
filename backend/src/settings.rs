//! Runtime settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_REGISTRY_*` environment variables and
//! configuration files, in that order of precedence.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATA_FILE: &str = "db.json";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The bind host is not an IP address literal.
    #[error("bind host `{host}` is not an IP address")]
    InvalidBindHost {
        /// Rejected value.
        host: String,
    },
}

/// Settings controlling where the registry listens and stores its data.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_REGISTRY")]
pub struct RegistrySettings {
    /// IP address to bind; defaults to all IPv4 interfaces.
    pub bind_host: Option<String>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// Location of the JSON user document.
    pub data_file: Option<PathBuf>,
    /// Leave a missing document alone at startup instead of creating it
    /// with an empty array.
    #[ortho_config(default = false)]
    pub skip_data_file_bootstrap: bool,
}

impl RegistrySettings {
    /// Return the socket address to bind, falling back to `0.0.0.0:3000`.
    ///
    /// # Errors
    /// [`SettingsError::InvalidBindHost`] when the host does not parse as an
    /// IP address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = match self.bind_host.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| SettingsError::InvalidBindHost {
                    host: raw.to_owned(),
                })?,
            None => DEFAULT_BIND_HOST,
        };
        Ok(SocketAddr::new(host, self.port.unwrap_or(DEFAULT_PORT)))
    }

    /// Return the configured document path, falling back to `db.json`.
    pub fn data_file(&self) -> &Path {
        self.data_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_DATA_FILE))
    }

    /// Whether startup should create a missing document.
    pub fn create_missing_data_file(&self) -> bool {
        !self.skip_data_file_bootstrap
    }
}
