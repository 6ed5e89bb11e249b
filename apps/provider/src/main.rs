//! Authress Terraform provider plugin.

#![forbid(unsafe_code)]

mod dto;
mod error;
mod handlers;
mod plugin_config;
mod plugin_router;
mod state;

use std::sync::Arc;

use authress_application::AuthressProvider;
use authress_core::AppError;
use authress_infrastructure::HttpRolesApiFactory;
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::plugin_config::{PluginConfig, handshake_line};
use crate::state::PluginState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PluginConfig::load()?;

    let plugin_state = PluginState {
        provider: AuthressProvider::new(
            env!("CARGO_PKG_VERSION"),
            Arc::new(HttpRolesApiFactory),
        ),
        shutdown: Arc::new(Notify::new()),
    };
    let shutdown = plugin_state.shutdown.clone();
    let app = plugin_router::build_router(plugin_state);

    let listener = tokio::net::TcpListener::bind(config.address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;
    let address = listener
        .local_addr()
        .map_err(|error| AppError::Internal(format!("failed to read listener address: {error}")))?;

    info!(%address, "terraform-provider-authress listening");
    println!("{}", handshake_line(address));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|error| AppError::Internal(format!("plugin server error: {error}")))
}

/// Logs go to stderr; stdout carries only the handshake.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

async fn shutdown_signal(shutdown: Arc<Notify>) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("received interrupt"),
        () = shutdown.notified() => {}
    }
}
