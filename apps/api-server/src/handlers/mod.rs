//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use actix_web::{HttpResponse, http::StatusCode, web};
use quill_core::domain::{Comment, Post, User};
use quill_core::ports::PagedRepository;
use quill_core::query::{Filter, Record};
use quill_core::services::ownership::{self, Owned};
use quill_shared::{CommentView, Envelope, Payload, PostView};

use crate::middleware::error::{AppError, AppResult, Resource};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            // Posts
            .route("/post/post", web::post().to(posts::create))
            .route("/post/put", web::put().to(posts::update))
            .route("/posts/get", web::get().to(posts::list))
            .route("/post/get", web::get().to(posts::show))
            .route("/post/delete", web::delete().to(posts::delete))
            // Comments
            .route("/comment/post", web::post().to(comments::create))
            .route("/comment/put", web::put().to(comments::update))
            .route("/comments/get", web::get().to(comments::list))
            .route("/comment/get", web::get().to(comments::show))
            .route("/comment/delete", web::delete().to(comments::delete)),
    );
}

/// Success envelope with a resource payload.
fn respond(status: StatusCode, payload: Payload) -> HttpResponse {
    HttpResponse::build(status).json(Envelope::new(status.as_u16()).with_payload(payload))
}

/// Success envelope with only a message code.
fn respond_mesg(mesg: &str) -> HttpResponse {
    HttpResponse::Ok().json(Envelope::new(StatusCode::OK.as_u16()).with_mesg(mesg))
}

/// First row matching `filter` that `user` owns.
///
/// A row owned by someone else is reported exactly like a missing one.
async fn find_owned<R>(
    repo: &dyn PagedRepository<R>,
    resource: Resource,
    user: &User,
    filter: &Filter<R::Field>,
) -> AppResult<R>
where
    R: Record + Owned,
{
    let row = repo
        .first_where(filter)
        .await?
        .ok_or(AppError::NotFound(resource))?;

    if !ownership::check(user, &row) {
        tracing::debug!(
            user_id = user.id,
            row_id = row.id(),
            ?resource,
            "Ownership check failed"
        );
        return Err(AppError::NotFound(resource));
    }

    Ok(row)
}

fn post_view(post: Post) -> PostView {
    PostView {
        id: post.id,
        user_id: post.user_id,
        title: post.title,
        slug: post.slug,
        content: post.content,
        is_active: post.lifecycle.is_active(),
        is_published: post.published,
        created_at: post.created_at.to_rfc3339(),
        updated_at: post.updated_at.to_rfc3339(),
        comments: None,
        total_comment_count: None,
    }
}

fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        id: comment.id,
        user_id: comment.user_id,
        post_id: comment.post_id,
        content: comment.content,
        is_active: comment.lifecycle.is_active(),
        is_published: comment.published,
        created_at: comment.created_at.to_rfc3339(),
        updated_at: comment.updated_at.to_rfc3339(),
    }
}
