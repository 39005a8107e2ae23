//! Comment endpoints.

use actix_web::{HttpResponse, http::StatusCode, web};
use quill_core::domain::{CommentChanges, CommentField, Lifecycle, NewComment, PostField, User};
use quill_core::query::{Filter, FindOptions};
use quill_core::services::ownership;
use quill_shared::Payload;

use super::{comment_view, find_owned, respond, respond_mesg};
use crate::middleware::auth::{current_user, require_user};
use crate::middleware::error::{AppError, AppResult, Resource};
use crate::middleware::input::RequestInput;
use crate::state::AppState;
use crate::validation;

/// List visible comments, newest first, optionally for one post.
///
/// GET /api/comments/get?p=<page>&post_id=<post>
pub async fn list(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let listing = validation::listing(&input)?;
    let user = current_user(&state, &input).await?;

    let mut filter = Filter::new()
        .eq(CommentField::Lifecycle, Lifecycle::Active)
        .eq(CommentField::Published, true);
    if let Some(user) = &user {
        filter = filter.eq(CommentField::UserId, user.id);
    }
    if let Some(post_id) = listing.post_id {
        filter = filter.eq(CommentField::PostId, post_id);
    }

    let comments = state
        .comments
        .find_where(&filter, &FindOptions::default().page(listing.page))
        .await?;

    Ok(respond(
        StatusCode::OK,
        Payload::Comments(comments.into_iter().map(comment_view).collect()),
    ))
}

/// Fetch one comment.
///
/// GET /api/comment/get?id=<id>
pub async fn show(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let id = validation::target_id(&input)?;
    let user = current_user(&state, &input).await?;

    let comment = state
        .comments
        .first_where(&visible(id, user.as_ref()))
        .await?
        .ok_or(AppError::NotFound(Resource::Comment))?;

    Ok(respond(StatusCode::OK, Payload::Comment(comment_view(comment))))
}

/// POST /api/comment/post
pub async fn create(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let form = validation::comment_create(&input)?;
    let user = require_user(&state, &input).await?;

    let parent = Filter::new()
        .eq(PostField::Id, form.post_id)
        .eq(PostField::Lifecycle, Lifecycle::Active);
    if state.posts.first_where(&parent).await?.is_none() {
        return Err(AppError::NotFound(Resource::Post));
    }

    let draft = ownership::stamp(
        &user,
        NewComment {
            user_id: None,
            post_id: form.post_id,
            content: form.content,
            published: form.published,
        },
    );
    let comment = state.comments.create(draft).await?;

    tracing::info!(
        comment_id = comment.id,
        post_id = comment.post_id,
        user_id = user.id,
        "Comment created"
    );
    Ok(respond(StatusCode::CREATED, Payload::Comment(comment_view(comment))))
}

/// PUT /api/comment/put
pub async fn update(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let form = validation::comment_update(&input)?;
    let user = require_user(&state, &input).await?;

    let comment = find_owned(
        state.comments.as_ref(),
        Resource::Comment,
        &user,
        &active(form.id),
    )
    .await?;

    let changes = CommentChanges {
        content: Some(form.content),
        published: Some(form.published),
        lifecycle: form.active.map(Lifecycle::from_active),
    };
    let updated = state.comments.update(comment.id, changes).await?;

    tracing::info!(comment_id = comment.id, user_id = user.id, "Comment updated");
    Ok(respond(StatusCode::OK, Payload::Updated(updated)))
}

/// Soft-delete a comment.
///
/// DELETE /api/comment/delete
pub async fn delete(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let id = validation::target_id(&input)?;
    let user = require_user(&state, &input).await?;

    let comment = find_owned(state.comments.as_ref(), Resource::Comment, &user, &active(id)).await?;
    state.comments.soft_delete(comment.id).await?;

    tracing::info!(comment_id = comment.id, user_id = user.id, "Comment deleted");
    Ok(respond_mesg("comment-deleted"))
}

fn active(id: i64) -> Filter<CommentField> {
    Filter::new()
        .eq(CommentField::Id, id)
        .eq(CommentField::Lifecycle, Lifecycle::Active)
}

fn visible(id: i64, user: Option<&User>) -> Filter<CommentField> {
    match user {
        Some(user) => active(id).eq(CommentField::UserId, user.id),
        None => active(id).eq(CommentField::Published, true),
    }
}
