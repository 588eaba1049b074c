//! Tubely persistence layer

pub mod db;

pub use db::{PgVideoRepository, VideoRepository};
#[cfg(any(test, feature = "test-helpers"))]
pub use db::InMemoryVideoRepository;
