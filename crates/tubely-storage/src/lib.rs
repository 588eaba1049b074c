//! Tubely Storage Library
//!
//! Storage abstraction for uploaded assets with a local filesystem backend (served under
//! `/assets`) and an S3 backend.
//!
//! # Storage key format
//!
//! Keys are asset paths produced by `tubely_core::assets::generate_identifier`, optionally
//! prefixed by a directory (`landscape/{id}.mp4`). Keys must not contain `..` or a
//! leading `/`.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
