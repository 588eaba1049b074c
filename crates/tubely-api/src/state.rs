//! Application state shared by all handlers

use crate::auth::JwtService;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::VideoProber;
use tubely_storage::{LocalStorage, Storage};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoRepository>,
    /// Thumbnails always live in the local assets directory
    pub thumbnail_storage: LocalStorage,
    /// Video files go to the configured backend (S3 unless `STORAGE_BACKEND=local`)
    pub video_storage: Arc<dyn Storage>,
    pub prober: VideoProber,
    pub jwt: JwtService,
}
