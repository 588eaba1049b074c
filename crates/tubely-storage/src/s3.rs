use crate::traits::{validate_key, Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, ObjectStoreExt, PutOptions, PutPayload,
    Result as ObjectResult,
};
use tubely_core::assets::object_url;

/// S3 storage implementation
#[derive(Clone, Debug)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// Credentials come from the standard AWS environment variables.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

/// Public URL for an object: virtual-hosted AWS style, or path style under a custom endpoint.
fn generate_url(bucket: &str, region: &str, endpoint_url: Option<&str>, key: &str) -> String {
    match endpoint_url {
        Some(endpoint) => format!("{}/{}/{}", endpoint.trim_end_matches('/'), bucket, key),
        None => object_url(bucket, region, key),
    }
}

/// Put options carrying the declared content type, so objects are served with it.
fn put_options(content_type: &str) -> PutOptions {
    let mut attributes = Attributes::new();
    if !content_type.is_empty() {
        attributes.insert(
            Attribute::ContentType,
            AttributeValue::from(content_type.to_string()),
        );
    }
    PutOptions::from(attributes)
}

#[async_trait]
impl Storage for S3Storage {
    async fn put(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        validate_key(storage_key)?;

        let size = data.len() as u64;
        let location = Path::from(storage_key.to_string());

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(
                &location,
                PutPayload::from(Bytes::from(data)),
                put_options(content_type),
            )
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        let url = self.url_for(storage_key);

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            content_type = %content_type,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        validate_key(storage_key)?;

        let location = Path::from(storage_key.to_string());
        let result: ObjectResult<_> = self.store.delete(&location).await;

        match result {
            Ok(_) | Err(ObjectStoreError::NotFound { .. }) => {}
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    "S3 delete failed"
                );
                return Err(StorageError::DeleteFailed(e.to_string()));
            }
        }

        tracing::info!(bucket = %self.bucket, key = %storage_key, "S3 delete successful");

        Ok(())
    }

    fn url_for(&self, storage_key: &str) -> String {
        generate_url(
            &self.bucket,
            &self.region,
            self.endpoint_url.as_deref(),
            storage_key,
        )
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

#[cfg(all(test, feature = "storage-s3"))]
mod tests {
    use super::*;

    #[test]
    fn test_aws_url_format() {
        assert_eq!(
            generate_url("mybucket", "us-east-1", None, "video123.mp4"),
            "https://mybucket.s3.us-east-1.amazonaws.com/video123.mp4"
        );
    }

    #[test]
    fn test_custom_endpoint_uses_path_style() {
        assert_eq!(
            generate_url(
                "tubely",
                "us-east-1",
                Some("http://localhost:9000/"),
                "portrait/abc.mp4"
            ),
            "http://localhost:9000/tubely/portrait/abc.mp4"
        );
    }

    #[test]
    fn test_put_options_carry_content_type() {
        let opts = put_options("video/mp4");
        let value = opts.attributes.get(&Attribute::ContentType).unwrap();
        assert_eq!(AsRef::<str>::as_ref(value), "video/mp4");

        assert!(put_options("").attributes.is_empty());
    }

    #[test]
    fn test_key_from_virtual_hosted_url() {
        let key = "landscape/abc.mp4";
        let url = generate_url("mybucket", "us-east-1", None, key);
        let base = generate_url("mybucket", "us-east-1", None, "");
        assert_eq!(url.strip_prefix(base.as_str()), Some(key));
    }

    #[tokio::test]
    async fn test_builds_without_network() {
        let storage = S3Storage::new(
            "mybucket".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000".to_string()),
        )
        .await
        .unwrap();
        assert_eq!(storage.bucket(), "mybucket");
        assert_eq!(storage.backend_type(), StorageBackend::S3);
        assert_eq!(
            storage.url_for("landscape/x.mp4"),
            "http://localhost:9000/mybucket/landscape/x.mp4"
        );
        assert_eq!(
            storage
                .key_from_url("http://localhost:9000/mybucket/landscape/x.mp4")
                .as_deref(),
            Some("landscape/x.mp4")
        );
        assert_eq!(
            storage.key_from_url("http://localhost:8091/assets/x.png"),
            None
        );
    }
}
