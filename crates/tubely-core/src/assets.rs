//! Asset naming
//!
//! Every uploaded asset gets a fresh random identifier so concurrent uploads never share
//! a filename. The identifier is 32 bytes from the operating system's random source,
//! encoded as URL-safe base64 without padding, followed by an extension taken from the
//! declared media type:
//!
//! - `image/png` -> `{id}.png`
//! - `video/mp4` -> `{id}.mp4`
//! - anything that is not exactly `type/subtype` -> `{id}.bin`
//!
//! The URL helpers here produce the exact strings clients depend on, so keep their
//! formats stable.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::TryRngCore;
use std::io;
use std::path::{Path, PathBuf};

/// Number of random bytes in an asset identifier.
pub const IDENTIFIER_BYTES: usize = 32;

/// Extension used when the media type is not of the form `type/subtype`.
pub const FALLBACK_EXTENSION: &str = "bin";

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    /// The operating system random source could not be read. Never fall back to a
    /// weaker identifier; abort the operation instead.
    #[error("Random source failure: {0}")]
    RandomSourceFailure(String),
}

/// Generate a new asset path (`{id}.{ext}`) for an upload with the given media type.
pub fn generate_identifier(media_type: &str) -> Result<String, AssetError> {
    let mut base = [0u8; IDENTIFIER_BYTES];
    OsRng
        .try_fill_bytes(&mut base)
        .map_err(|e| AssetError::RandomSourceFailure(e.to_string()))?;

    let id = URL_SAFE_NO_PAD.encode(base);
    Ok(format!("{}.{}", id, media_type_to_ext(media_type)))
}

/// Map a media type to a file extension.
pub fn media_type_to_ext(media_type: &str) -> &str {
    let parts: Vec<&str> = media_type.split('/').collect();
    if parts.len() != 2 {
        return FALLBACK_EXTENSION;
    }
    parts[1]
}

/// Location of an asset on local disk.
pub fn disk_path(root: impl AsRef<Path>, asset_path: &str) -> PathBuf {
    root.as_ref().join(asset_path)
}

/// URL under which the local assets directory is served.
pub fn public_url(host: &str, port: u16, asset_path: &str) -> String {
    format!("http://{}:{}/assets/{}", host, port, asset_path)
}

/// Public URL of an object in an S3 bucket.
pub fn object_url(bucket: &str, region: &str, key: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com/{}", bucket, region, key)
}

/// Create the storage root if it does not exist yet.
///
/// Only the root itself is created; a missing parent is an error. Losing a creation race
/// to another process is not.
pub fn ensure_storage_dir(root: impl AsRef<Path>) -> io::Result<()> {
    match std::fs::create_dir(root.as_ref()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_identifier_uses_subtype_as_extension() {
        let path = generate_identifier("image/png").unwrap();
        assert!(path.ends_with(".png"));

        let path = generate_identifier("video/mp4").unwrap();
        assert!(path.ends_with(".mp4"));
    }

    #[test]
    fn test_identifier_is_url_safe_base64_without_padding() {
        let path = generate_identifier("image/jpeg").unwrap();
        let (id, ext) = path.rsplit_once('.').unwrap();
        assert_eq!(ext, "jpeg");
        // 32 bytes -> 43 base64 chars, no '=' padding
        assert_eq!(id.len(), 43);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));

        let decoded = URL_SAFE_NO_PAD.decode(id).unwrap();
        assert_eq!(decoded.len(), IDENTIFIER_BYTES);
    }

    #[test]
    fn test_identifier_malformed_media_type_falls_back_to_bin() {
        for media_type in ["", "png", "image/svg+xml/extra", "a/b/c", "//"] {
            let path = generate_identifier(media_type).unwrap();
            assert!(
                path.ends_with(".bin"),
                "{media_type:?} produced {path}"
            );
        }
    }

    #[test]
    fn test_identifiers_differ_between_calls() {
        let first = generate_identifier("video/mp4").unwrap();
        let second = generate_identifier("video/mp4").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_media_type_to_ext() {
        assert_eq!(media_type_to_ext("image/png"), "png");
        assert_eq!(media_type_to_ext("image/svg+xml"), "svg+xml");
        assert_eq!(media_type_to_ext("application/octet-stream"), "octet-stream");
        assert_eq!(media_type_to_ext("image/"), "");
        assert_eq!(media_type_to_ext("image"), "bin");
        assert_eq!(media_type_to_ext("a/b/c"), "bin");
    }

    #[test]
    fn test_disk_path_joins_root() {
        let path = disk_path("/var/lib/tubely/assets", "abc.png");
        assert_eq!(path, PathBuf::from("/var/lib/tubely/assets/abc.png"));
    }

    #[test]
    fn test_public_url_format() {
        assert_eq!(
            public_url("localhost", 8091, "a.png"),
            "http://localhost:8091/assets/a.png"
        );
    }

    #[test]
    fn test_object_url_format() {
        assert_eq!(
            object_url("mybucket", "us-east-1", "video123.mp4"),
            "https://mybucket.s3.us-east-1.amazonaws.com/video123.mp4"
        );
        assert_eq!(
            object_url("mybucket", "eu-west-3", "landscape/abc.mp4"),
            "https://mybucket.s3.eu-west-3.amazonaws.com/landscape/abc.mp4"
        );
    }

    #[test]
    fn test_ensure_storage_dir_creates_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("assets");

        ensure_storage_dir(&root).unwrap();
        assert!(root.is_dir());

        ensure_storage_dir(&root).unwrap();
        assert!(root.is_dir());
    }

    #[test]
    fn test_ensure_storage_dir_propagates_other_errors() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("missing-parent").join("assets");

        let err = ensure_storage_dir(&root).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
