//! Database repositories for data access layer
//!
//! Handlers depend on the `VideoRepository` trait; `PgVideoRepository` is the
//! production implementation.

pub mod video;

#[cfg(any(test, feature = "test-helpers"))]
pub mod memory;

#[cfg(any(test, feature = "test-helpers"))]
pub use memory::InMemoryVideoRepository;
pub use video::{PgVideoRepository, VideoRepository};
