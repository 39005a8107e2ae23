//! Post endpoints.

use actix_web::{HttpResponse, http::StatusCode, web};
use quill_core::domain::{CommentField, Lifecycle, NewPost, Post, PostChanges, PostField, Slug, User};
use quill_core::error::RepoError;
use quill_core::query::{Direction, Filter, FindOptions};
use quill_core::services::ownership;
use quill_shared::{Payload, PostView};

use super::{comment_view, find_owned, post_view, respond, respond_mesg};
use crate::middleware::auth::{current_user, require_user};
use crate::middleware::error::{AppError, AppResult, Resource};
use crate::middleware::input::RequestInput;
use crate::state::AppState;
use crate::validation;

/// Comments embedded in each returned post.
const RECENT_COMMENTS: u64 = 5;

/// List visible posts, newest first.
///
/// GET /api/posts/get?p=<page>
pub async fn list(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let listing = validation::listing(&input)?;
    let user = current_user(&state, &input).await?;

    let mut filter = Filter::new()
        .eq(PostField::Lifecycle, Lifecycle::Active)
        .eq(PostField::Published, true);
    if let Some(user) = &user {
        filter = filter.eq(PostField::UserId, user.id);
    }

    let posts = state
        .posts
        .find_where(&filter, &FindOptions::default().page(listing.page))
        .await?;

    Ok(respond(StatusCode::OK, Payload::Posts(decorate(&state, posts).await?)))
}

/// Fetch one post.
///
/// GET /api/post/get?id=<id>
pub async fn show(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let id = validation::target_id(&input)?;
    let user = current_user(&state, &input).await?;

    let post = state
        .posts
        .first_where(&visible(id, user.as_ref()))
        .await?
        .ok_or(AppError::NotFound(Resource::Post))?;

    let view = decorate(&state, vec![post])
        .await?
        .pop()
        .ok_or(AppError::NotFound(Resource::Post))?;

    Ok(respond(StatusCode::OK, Payload::Post(view)))
}

/// POST /api/post/post
pub async fn create(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let form = validation::post_create(&input)?;
    let user = require_user(&state, &input).await?;

    ensure_unique_slug(&state, &form.slug, None).await?;

    let draft = ownership::stamp(
        &user,
        NewPost {
            user_id: None,
            title: form.title,
            slug: form.slug,
            content: form.content,
            published: form.published,
        },
    );
    let post = state.posts.create(draft).await.map_err(slug_conflict)?;

    tracing::info!(post_id = post.id, user_id = user.id, slug = %post.slug, "Post created");
    Ok(respond(StatusCode::CREATED, Payload::Post(post_view(post))))
}

/// PUT /api/post/put
pub async fn update(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let (id, form) = validation::post_update(&input)?;
    let user = require_user(&state, &input).await?;

    let post = find_owned(state.posts.as_ref(), Resource::Post, &user, &active(id)).await?;
    ensure_unique_slug(&state, &form.slug, Some(post.id)).await?;

    let changes = PostChanges {
        title: Some(form.title),
        slug: Some(form.slug),
        content: Some(form.content),
        published: Some(form.published),
        ..PostChanges::default()
    };
    let updated = state
        .posts
        .update(post.id, changes)
        .await
        .map_err(slug_conflict)?;

    tracing::info!(post_id = post.id, user_id = user.id, "Post updated");
    Ok(respond(StatusCode::OK, Payload::Updated(updated)))
}

/// Soft-delete a post.
///
/// DELETE /api/post/delete
pub async fn delete(state: web::Data<AppState>, input: RequestInput) -> AppResult<HttpResponse> {
    let id = validation::target_id(&input)?;
    let user = require_user(&state, &input).await?;

    let post = find_owned(state.posts.as_ref(), Resource::Post, &user, &active(id)).await?;
    state.posts.soft_delete(post.id).await?;

    tracing::info!(post_id = post.id, user_id = user.id, "Post deleted");
    Ok(respond_mesg("post-deleted"))
}

fn active(id: i64) -> Filter<PostField> {
    Filter::new()
        .eq(PostField::Id, id)
        .eq(PostField::Lifecycle, Lifecycle::Active)
}

/// Anonymous callers see published posts; a signed-in caller sees their own.
fn visible(id: i64, user: Option<&User>) -> Filter<PostField> {
    match user {
        Some(user) => active(id).eq(PostField::UserId, user.id),
        None => active(id).eq(PostField::Published, true),
    }
}

async fn ensure_unique_slug(state: &AppState, slug: &Slug, except: Option<i64>) -> AppResult<()> {
    let taken = state
        .posts
        .first_where(&Filter::new().eq(PostField::Slug, slug.as_str()))
        .await?;

    match taken {
        Some(other) if Some(other.id) != except => {
            tracing::debug!(slug = %slug, "Slug already taken");
            Err(AppError::DuplicateSlug)
        }
        _ => Ok(()),
    }
}

/// The only unique post column is the slug.
pub(super) fn slug_conflict(err: RepoError) -> AppError {
    match err {
        RepoError::Constraint(_) => AppError::DuplicateSlug,
        other => other.into(),
    }
}

/// Attach the newest visible comments and their total count to each post.
async fn decorate(state: &AppState, posts: Vec<Post>) -> AppResult<Vec<PostView>> {
    let recent = FindOptions::default()
        .order_by(CommentField::Id, Direction::Desc)
        .limit(RECENT_COMMENTS);

    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let filter = Filter::new()
            .eq(CommentField::PostId, post.id)
            .eq(CommentField::Lifecycle, Lifecycle::Active)
            .eq(CommentField::Published, true);

        let comments = state.comments.find_where(&filter, &recent).await?;
        let total = state.comments.count(&filter).await?;

        views.push(
            post_view(post).with_comments(comments.into_iter().map(comment_view).collect(), total),
        );
    }

    Ok(views)
}
