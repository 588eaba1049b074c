//! Common utilities for file upload handlers

use axum::extract::Multipart;
use tubely_core::AppError;
use uuid::Uuid;

/// One file part pulled out of a multipart form.
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// Parse the `{videoID}` path segment.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))
}

/// Read the part named `field_name`, enforcing `max_size` while streaming.
///
/// The part must carry its own `Content-Type`; other fields are skipped.
pub async fn extract_multipart_file(
    mut multipart: Multipart,
    field_name: &str,
    max_size: usize,
) -> Result<UploadedFile, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AppError::BadRequest(format!("Missing Content-Type for {}", field_name))
            })?;

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?
        {
            validate_file_size(data.len() + chunk.len(), max_size)?;
            data.extend_from_slice(&chunk);
        }

        return Ok(UploadedFile { data, content_type });
    }

    Err(AppError::BadRequest(format!(
        "Unable to find {} in form",
        field_name
    )))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "image/jpeg; charset=utf-8" -> "image/jpeg").
pub fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// Validate content type against allowlist. Compares normalized MIME type only (no parameter bypass).
pub fn validate_content_type(content_type: &str, allowed_types: &[String]) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if !allowed_types.iter().any(|ct| normalized == ct.to_lowercase()) {
        return Err(AppError::BadRequest(format!(
            "Invalid content type. Allowed types: {}",
            allowed_types.join(", ")
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_video_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_video_id("not-a-uuid"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_validate_file_size() {
        assert!(validate_file_size(10, 10).is_ok());
        assert!(matches!(
            validate_file_size(11, 10),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_content_type_parameters_ignored() {
        let allowed = vec!["image/jpeg".to_string(), "image/png".to_string()];
        assert!(validate_content_type("image/png", &allowed).is_ok());
        assert!(validate_content_type("IMAGE/JPEG; charset=binary", &allowed).is_ok());
        assert!(validate_content_type("image/gif", &allowed).is_err());
        assert!(validate_content_type("image/png+evil", &allowed).is_err());
    }

    #[test]
    fn test_normalize_mime_type() {
        assert_eq!(normalize_mime_type("video/mp4; codecs=avc1"), "video/mp4");
        assert_eq!(normalize_mime_type("video/mp4"), "video/mp4");
    }
}
