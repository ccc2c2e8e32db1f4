//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;

use crate::state::AppState;
use crate::users::InMemoryUserStore;
use anyhow::{Context, Result};
use pixhive_core::Config;
use pixhive_storage::ImageStorage;
use std::sync::Arc;

/// Install the global tracing subscriber. `RUST_LOG` controls filtering and
/// defaults to `info`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Configuration loaded and validated successfully");

    let storage = ImageStorage::new(
        config.upload_options(),
        config.storage_path(),
        config.base_url(),
        config.allowed_content_types().to_vec(),
    )
    .await
    .context("Failed to initialize storage")?;

    tracing::info!(
        storage_path = %config.storage_path(),
        responsive = storage.options().responsive,
        output = storage.options().output.extension(),
        "Storage ready"
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(InMemoryUserStore::new()),
        Arc::new(storage),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
