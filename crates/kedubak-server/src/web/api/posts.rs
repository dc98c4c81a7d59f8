use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use kedubak_common::models::post::{Comment, Post, PostPatch};
use kedubak_common::validation::validate_non_empty;
use kedubak_store::UpvoteOutcome;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::{CurrentUser, Json};

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

impl CreatePostRequest {
    fn validate(&self) -> Result<(), ApiError> {
        validate_non_empty("title", &self.title).map_err(ApiError::validation)?;
        validate_non_empty("content", &self.content).map_err(ApiError::validation)?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdatePostRequest {
    fn validate(&self) -> Result<(), ApiError> {
        if let Some(title) = &self.title {
            validate_non_empty("title", title).map_err(ApiError::validation)?;
        }
        if let Some(content) = &self.content {
            validate_non_empty("content", content).map_err(ApiError::validation)?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}

/// GET /post -- bounded listing, newest first
#[tracing::instrument(skip_all)]
pub async fn list(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
) -> Result<Json<Vec<Post>>, ApiError> {
    let posts = state.posts.list(state.config.feed.list_limit).await?;
    Ok(Json(posts))
}

/// POST /post
#[tracing::instrument(skip_all, fields(user_id = %user.id))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), ApiError> {
    req.validate()?;

    let post = Post::new(&user, req.title, req.content);
    let created = state.posts.insert(post).await?;

    tracing::info!(post_id = %created.id, "created post");
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /post/{id}
#[tracing::instrument(skip_all, fields(post_id = %id))]
pub async fn get(
    State(state): State<Arc<AppState>>,
    CurrentUser(_user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>, ApiError> {
    match state.posts.find_by_id(id).await? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NotFound),
    }
}

/// PUT /post/{id} -- author-only partial update
#[tracing::instrument(skip_all, fields(post_id = %id, user_id = %user.id))]
pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePostRequest>,
) -> Result<Json<Post>, ApiError> {
    req.validate()?;

    let patch = PostPatch {
        title: req.title,
        content: req.content,
    };
    if patch.is_empty() {
        return Err(ApiError::Validation("no fields to update".to_string()));
    }

    let post = state.posts.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    if post.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    // author_id is immutable, so the ownership check above cannot go stale
    // before the merge below; the merge itself is one store operation.
    let updated = state
        .posts
        .update_fields(id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(updated))
}

/// DELETE /post/{id} -- author-only
#[tracing::instrument(skip_all, fields(post_id = %id, user_id = %user.id))]
pub async fn remove(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let post = state.posts.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    if post.author_id != user.id {
        return Err(ApiError::Forbidden);
    }

    if !state.posts.delete(id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!("deleted post");
    Ok(Json(json!({ "removed": true, "id": id })))
}

/// POST /post/{id}/vote -- at most one upvote per voter, enforced by the
/// store's conditional push. A repeated vote reports the outcome instead of
/// failing.
#[tracing::instrument(skip_all, fields(post_id = %id, user_id = %user.id))]
pub async fn vote(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    match state.posts.upvote_if_absent(id, &user.email).await? {
        UpvoteOutcome::Applied(post) => {
            if let Err(e) = state.users.touch_last_upvote(user.id, Utc::now()).await {
                // The vote itself stands; losing the timestamp is tolerable.
                tracing::warn!("failed to record last upvote time: {}", e);
            }
            Ok(Json(post).into_response())
        }
        UpvoteOutcome::AlreadyVoted => Ok(Json(json!({
            "code": "already_voted",
            "message": "user already upvoted this post",
        }))
        .into_response()),
    }
}

/// POST /post/{id}/comment
#[tracing::instrument(skip_all, fields(post_id = %id, user_id = %user.id))]
pub async fn comment(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<Post>, ApiError> {
    validate_non_empty("content", &req.content).map_err(ApiError::validation)?;

    let comment = Comment::new(&user, req.content);
    match state.posts.push_comment(id, comment).await? {
        Some(post) => Ok(Json(post)),
        None => Err(ApiError::NotFound),
    }
}
