#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use tubely_core::Config;

/// Create the video storage backend selected by `STORAGE_BACKEND` (S3 when unset)
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let backend = config.storage_backend().unwrap_or(StorageBackend::S3);

    match backend {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config
                .s3_region()
                .map(String::from)
                .or_else(|| config.aws_region().map(String::from))
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let storage = LocalStorage::new(
                config.assets_root().clone(),
                config.assets_host(),
                config.server_port(),
            )
            .await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

#[cfg(all(test, feature = "storage-local", feature = "storage-s3"))]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tubely_core::config::{BaseConfig, TubelyConfig};

    fn config(backend: Option<StorageBackend>, assets_root: PathBuf) -> Config {
        Config(Box::new(TubelyConfig {
            base: BaseConfig {
                server_port: 8091,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 5,
                request_timeout_secs: 30,
                jwt_secret: "x".repeat(32),
                environment: "test".to_string(),
                log_format: "text".to_string(),
            },
            database_url: "postgres://localhost/tubely".to_string(),
            assets_root,
            assets_host: "localhost".to_string(),
            storage_backend: backend,
            s3_bucket: Some("tubely-test".to_string()),
            s3_region: None,
            s3_endpoint: Some("http://localhost:9000".to_string()),
            aws_region: Some("us-east-2".to_string()),
            max_thumbnail_size_bytes: 1024,
            thumbnail_allowed_content_types: vec!["image/png".to_string()],
            max_video_size_bytes: 1024,
            video_allowed_content_types: vec!["video/mp4".to_string()],
            ffprobe_path: "ffprobe".to_string(),
        }))
    }

    #[tokio::test]
    async fn test_local_backend_uses_assets_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("assets");

        let storage = create_storage(&config(Some(StorageBackend::Local), root.clone()))
            .await
            .unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::Local);
        assert!(root.is_dir());
        assert_eq!(
            storage.url_for("abc.mp4"),
            "http://localhost:8091/assets/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_default_backend_is_s3_with_region_fallback() {
        let storage = create_storage(&config(None, PathBuf::from("./assets")))
            .await
            .unwrap();

        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.url_for("portrait/abc.mp4"),
            "http://localhost:9000/tubely-test/portrait/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_s3_without_bucket_fails() {
        let mut cfg = config(Some(StorageBackend::S3), PathBuf::from("./assets"));
        cfg.0.s3_bucket = None;

        let result = create_storage(&cfg).await;
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }
}
