//! Test helpers: build AppState and router for integration tests.
//!
//! Everything runs in-process: videos live in `InMemoryVideoRepository`, assets in a temp
//! directory, and ffprobe is replaced by a script that prints the uploaded file.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Duration;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tempfile::TempDir;
use tubely_api::auth::JwtService;
use tubely_api::setup::routes;
use tubely_api::AppState;
use tubely_core::config::{BaseConfig, TubelyConfig};
use tubely_core::models::Video;
use tubely_core::{AppError, Config, StorageBackend};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::VideoProber;
use tubely_storage::LocalStorage;
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-secret-test-secret-test-secret!";
pub const TEST_PORT: u16 = 8091;

/// Test application: server plus the resources it borrows.
pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoRepository,
    pub jwt: JwtService,
    pub assets_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt
            .make_token(user_id, Duration::hours(1))
            .expect("Failed to sign test token")
    }

    pub fn bearer(&self, user_id: Uuid) -> String {
        format!("Bearer {}", self.token_for(user_id))
    }

    /// Insert a draft video owned by `user_id`.
    pub async fn seed_video(&self, user_id: Uuid) -> Video {
        let video = Video::new_draft(user_id, "Boots".to_string(), "test video".to_string());
        self.videos
            .create_video(&video)
            .await
            .expect("Failed to seed video")
    }
}

pub fn create_test_config(assets_root: PathBuf, max_thumbnail_size_bytes: usize) -> Config {
    Config(Box::new(TubelyConfig {
        base: BaseConfig {
            server_port: TEST_PORT,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 5,
            request_timeout_secs: 30,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
            log_format: "text".to_string(),
        },
        database_url: "postgres://unused/tubely".to_string(),
        assets_root,
        assets_host: "localhost".to_string(),
        storage_backend: Some(StorageBackend::Local),
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        aws_region: None,
        max_thumbnail_size_bytes,
        thumbnail_allowed_content_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        max_video_size_bytes: 1024 * 1024,
        video_allowed_content_types: vec!["video/mp4".to_string()],
        ffprobe_path: "ffprobe".to_string(),
    }))
}

/// Stand-in for ffprobe: prints the file it is pointed at (argument 6).
///
/// Written once per test binary so no test executes a script another thread is still writing.
#[cfg(unix)]
fn fake_ffprobe() -> &'static PathBuf {
    use std::os::unix::fs::PermissionsExt;

    static SCRIPT: OnceLock<(TempDir, PathBuf)> = OnceLock::new();
    &SCRIPT
        .get_or_init(|| {
            let dir = tempfile::tempdir().expect("Failed to create tools dir");
            let path = dir.path().join("ffprobe");
            std::fs::write(&path, "#!/bin/sh\ncat \"$6\"\n")
                .expect("Failed to write fake ffprobe");
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to chmod fake ffprobe");
            (dir, path)
        })
        .1
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_thumbnail_limit(10 * 1024 * 1024).await
}

pub async fn setup_test_app_with_thumbnail_limit(max_thumbnail_size_bytes: usize) -> TestApp {
    let videos = InMemoryVideoRepository::new();
    build_test_app(videos.clone(), Arc::new(videos), max_thumbnail_size_bytes).await
}

/// App whose repository accepts inserts and reads but fails every `update_video`.
pub async fn setup_test_app_failing_updates() -> TestApp {
    let videos = InMemoryVideoRepository::new();
    let repo = FailingUpdateRepository {
        inner: videos.clone(),
    };
    build_test_app(videos, Arc::new(repo), 10 * 1024 * 1024).await
}

async fn build_test_app(
    videos: InMemoryVideoRepository,
    repo: Arc<dyn VideoRepository>,
    max_thumbnail_size_bytes: usize,
) -> TestApp {
    let assets_dir = tempfile::tempdir().expect("Failed to create assets dir");
    let ffprobe = fake_ffprobe();

    let config = create_test_config(assets_dir.path().to_path_buf(), max_thumbnail_size_bytes);

    let storage = LocalStorage::new(assets_dir.path(), "localhost", TEST_PORT)
        .await
        .expect("Failed to create local storage");

    let jwt = JwtService::new(TEST_JWT_SECRET);

    let state = Arc::new(AppState {
        config: config.clone(),
        videos: repo,
        thumbnail_storage: storage.clone(),
        video_storage: Arc::new(storage),
        prober: VideoProber::new(ffprobe.to_string_lossy()).expect("Invalid ffprobe path"),
        jwt: jwt.clone(),
    });

    let router = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        videos,
        jwt,
        assets_dir,
    }
}

/// Repository whose updates always fail, for exercising upload cleanup paths.
#[derive(Clone)]
pub struct FailingUpdateRepository {
    inner: InMemoryVideoRepository,
}

#[async_trait]
impl VideoRepository for FailingUpdateRepository {
    async fn create_video(&self, video: &Video) -> Result<Video, AppError> {
        self.inner.create_video(video).await
    }

    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        self.inner.get_video(id).await
    }

    async fn list_videos_for_user(&self, user_id: Uuid) -> Result<Vec<Video>, AppError> {
        self.inner.list_videos_for_user(user_id).await
    }

    async fn update_video(&self, _video: &Video) -> Result<Video, AppError> {
        Err(AppError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn delete_video(&self, id: Uuid) -> Result<bool, AppError> {
        self.inner.delete_video(id).await
    }
}

/// Regular files under `dir`, recursively.
pub fn files_under(dir: &std::path::Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in std::fs::read_dir(&current).expect("Failed to read dir") {
            let path = entry.expect("Failed to read dir entry").path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.push(path);
            }
        }
    }
    files
}

/// Wait for background cleanup to leave `dir` without files.
pub async fn wait_until_empty(dir: &std::path::Path) -> bool {
    for _ in 0..100 {
        if files_under(dir).is_empty() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    files_under(dir).is_empty()
}

/// Path part of an `http://host:port/assets/...` URL.
pub fn asset_route(url: &str) -> String {
    let prefix = format!("http://localhost:{}", TEST_PORT);
    url.strip_prefix(&prefix)
        .unwrap_or_else(|| panic!("unexpected asset url {}", url))
        .to_string()
}
