//! Storage setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, LocalStorage, Storage};

/// Build the thumbnail store (local assets directory) and the video store (configured backend).
pub async fn setup_storage(config: &Config) -> Result<(LocalStorage, Arc<dyn Storage>)> {
    let thumbnail_storage = LocalStorage::new(
        config.assets_root().clone(),
        config.assets_host(),
        config.server_port(),
    )
    .await
    .context("Failed to initialize assets directory")?;

    let video_storage = create_storage(config)
        .await
        .context("Failed to initialize video storage")?;

    tracing::info!(
        assets_root = %config.assets_root().display(),
        video_backend = %video_storage.backend_type(),
        "Storage initialized"
    );

    Ok((thumbnail_storage, video_storage))
}
