//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtService;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::PgVideoRepository;
use tubely_processing::VideoProber;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let (thumbnail_storage, video_storage) = storage::setup_storage(&config).await?;

    let prober = VideoProber::new(config.ffprobe_path()).context("Invalid FFPROBE_PATH")?;

    let state = Arc::new(AppState {
        config: config.clone(),
        videos: Arc::new(PgVideoRepository::new(pool)),
        thumbnail_storage,
        video_storage,
        prober,
        jwt: JwtService::new(config.jwt_secret()),
    });

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
