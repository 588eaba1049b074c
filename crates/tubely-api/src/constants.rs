//! Route and protocol constants shared by handlers, routes and tests

/// Prefix for all JSON API routes.
pub const API_PREFIX: &str = "/api";

/// Issuer claim on every access token.
pub const JWT_ISSUER: &str = "tubely-access";

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying the video file.
pub const VIDEO_FIELD: &str = "video";

/// Headroom above the largest upload for multipart framing.
pub const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;
