pub mod health;
pub mod thumbnail_upload;
pub mod video_upload;
pub mod videos;

use crate::state::AppState;
use tubely_core::models::Video;
use tubely_core::AppError;
use tubely_storage::Storage;
use uuid::Uuid;

/// Fetch a video and check that `user_id` owns it.
pub(crate) async fn load_owned_video(
    state: &AppState,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = state
        .videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::debug!(video_id = %video_id, user_id = %user_id, "Ownership check failed");
        return Err(AppError::Unauthorized(
            "Not authorized to update this video".to_string(),
        ));
    }

    Ok(video)
}

/// Delete the asset behind a URL previously returned by `storage`.
///
/// Failures are logged; the record change that orphaned the asset has already happened.
pub(crate) async fn remove_stored_asset(storage: &dyn Storage, url: Option<&str>) {
    let Some(url) = url else {
        return;
    };

    let Some(storage_key) = storage.key_from_url(url) else {
        tracing::debug!(
            url = %url,
            backend = %storage.backend_type(),
            "Asset URL not served by this backend, skipping delete"
        );
        return;
    };

    if let Err(e) = storage.delete(&storage_key).await {
        tracing::warn!(
            error = %e,
            storage_key = %storage_key,
            "Failed to delete replaced asset"
        );
    }
}
