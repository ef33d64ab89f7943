//! User registry entry-point: loads settings, prepares the JSON document and
//! starts the HTTP server.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use user_registry::inbound::http::health::HealthState;
use user_registry::outbound::persistence::JsonFileUserRepository;
use user_registry::settings::RegistrySettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = RegistrySettings::load()
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let repository = JsonFileUserRepository::new(settings.data_file()).map_err(io::Error::other)?;

    if settings.create_missing_data_file() {
        repository
            .ensure_document()
            .await
            .map_err(io::Error::other)?;
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, ServerConfig::new(bind_addr, repository))?;
    server.await
}
