//! Tubely Core Library
//!
//! This crate provides the domain models, error types, configuration and asset naming
//! shared by every Tubely component.

pub mod assets;
pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use assets::AssetError;
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
