use crate::auth::AuthUser;
use crate::constants::THUMBNAIL_FIELD;
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
use tubely_storage::Storage;

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video UUID")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Thumbnail stored, video updated", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Uploading thumbnail");

    let file = extract_multipart_file(
        multipart,
        THUMBNAIL_FIELD,
        state.config.max_thumbnail_size_bytes(),
    )
    .await?;
    validate_content_type(
        &file.content_type,
        state.config.thumbnail_allowed_content_types(),
    )?;

    let mut video = load_owned_video(&state, video_id, auth.user_id).await?;

    let media_type = normalize_mime_type(&file.content_type).to_string();
    let asset_path = generate_identifier(&media_type)?;
    let size = file.data.len();

    let url = state
        .thumbnail_storage
        .put(&asset_path, file.data, &media_type)
        .await?;

    let previous_url = video.thumbnail_url.replace(url);
    let updated = match state.videos.update_video(&video).await {
        Ok(updated) => updated,
        Err(e) => {
            if let Err(cleanup_err) = state.thumbnail_storage.delete(&asset_path).await {
                tracing::debug!(
                    error = %cleanup_err,
                    asset_path = %asset_path,
                    "Failed to cleanup thumbnail after DB error"
                );
            }
            return Err(e.into());
        }
    };

    remove_stored_asset(&state.thumbnail_storage, previous_url.as_deref()).await;

    tracing::info!(
        video_id = %video_id,
        asset_path = %asset_path,
        size_bytes = size,
        "Thumbnail uploaded"
    );

    Ok(Json(updated))
}
