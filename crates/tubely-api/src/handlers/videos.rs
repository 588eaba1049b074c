use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::{load_owned_video, remove_stored_asset};
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tubely_core::models::{CreateVideoRequest, Video};
use tubely_core::AppError;

const MAX_TITLE_LENGTH: usize = 200;

#[utoipa::path(
    post,
    path = "/api/videos",
    tag = "videos",
    request_body = CreateVideoRequest,
    responses(
        (status = 201, description = "Draft video created", body = Video),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateVideoRequest>,
) -> Result<(StatusCode, Json<Video>), HttpAppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::InvalidInput("Title is required".to_string()).into());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LENGTH
        ))
        .into());
    }

    let draft = Video::new_draft(auth.user_id, title.to_string(), req.description);
    let video = state.videos.create_video(&draft).await?;

    tracing::info!(video_id = %video.id, user_id = %auth.user_id, "Video created");

    Ok((StatusCode::CREATED, Json(video)))
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "videos",
    responses(
        (status = 200, description = "Caller's videos, newest first", body = Vec<Video>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Vec<Video>>, HttpAppError> {
    let videos = state.videos.list_videos_for_user(auth.user_id).await?;
    Ok(Json(videos))
}

#[utoipa::path(
    get,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video UUID")),
    responses(
        (status = 200, description = "Video found", body = Video),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
) -> Result<Json<Video>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(&state, video_id, auth.user_id).await?;
    Ok(Json(video))
}

#[utoipa::path(
    delete,
    path = "/api/videos/{videoID}",
    tag = "videos",
    params(("videoID" = String, Path, description = "Video UUID")),
    responses(
        (status = 204, description = "Video and its stored assets deleted"),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_video(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(video_id): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let video = load_owned_video(&state, video_id, auth.user_id).await?;

    if !state.videos.delete_video(video_id).await? {
        return Err(AppError::NotFound("Couldn't find video".to_string()).into());
    }

    remove_stored_asset(&state.thumbnail_storage, video.thumbnail_url.as_deref()).await;
    remove_stored_asset(state.video_storage.as_ref(), video.video_url.as_deref()).await;

    tracing::info!(video_id = %video_id, user_id = %auth.user_id, "Video deleted");

    Ok(StatusCode::NO_CONTENT)
}
