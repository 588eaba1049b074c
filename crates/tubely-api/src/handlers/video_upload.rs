use crate::auth::AuthUser;
use crate::constants::VIDEO_FIELD;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::{load_owned_video, remove_stored_asset};
use crate::state::AppState;
use crate::utils::upload::{
    extract_multipart_file, normalize_mime_type, parse_video_id, validate_content_type,
};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use std::sync::Arc;
use tubely_core::assets::generate_identifier;
use tubely_core::models::Video;
use tubely_core::AppError;

#[utoipa::path(
    post,
    path = "/api/video_upload/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video UUID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored under its aspect-ratio prefix", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Video could not be probed or stored", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Uploading video");

    let file =
        extract_multipart_file(multipart, VIDEO_FIELD, state.config.max_video_size_bytes()).await?;
    validate_content_type(&file.content_type, state.config.video_allowed_content_types())?;

    let mut video = load_owned_video(&state, video_id, auth.user_id).await?;

    // ffprobe needs a path; the temp file is removed when `temp` drops.
    let temp = tempfile::Builder::new()
        .prefix("tubely-upload-")
        .suffix(".mp4")
        .tempfile()
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {}", e)))?;
    tokio::fs::write(temp.path(), &file.data)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write temp file: {}", e)))?;

    let aspect = state.prober.classify_aspect(temp.path()).await?;

    let media_type = normalize_mime_type(&file.content_type).to_string();
    let asset_path = generate_identifier(&media_type)?;
    let storage_key = format!("{}/{}", aspect.key_prefix(), asset_path);
    let size = file.data.len();

    let url = state
        .video_storage
        .put(&storage_key, file.data, &media_type)
        .await?;

    let previous_url = video.video_url.replace(url);
    let updated = match state.videos.update_video(&video).await {
        Ok(updated) => updated,
        Err(e) => {
            let storage = state.video_storage.clone();
            let key = storage_key.clone();
            tokio::spawn(async move {
                if let Err(cleanup_err) = storage.delete(&key).await {
                    tracing::debug!(
                        error = %cleanup_err,
                        storage_key = %key,
                        "Failed to cleanup storage file after DB error"
                    );
                }
            });
            return Err(e.into());
        }
    };

    remove_stored_asset(state.video_storage.as_ref(), previous_url.as_deref()).await;

    tracing::info!(
        video_id = %video_id,
        storage_key = %storage_key,
        aspect = %aspect,
        size_bytes = size,
        backend = %state.video_storage.backend_type(),
        "Video uploaded"
    );

    Ok(Json(updated))
}
