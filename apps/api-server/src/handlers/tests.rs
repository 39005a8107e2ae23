use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::from_fn;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use tracing_actix_web::TracingLogger;

use quill_core::domain::{NewComment, NewPost, NewUser, Post, Slug, User};
use quill_core::error::RepoError;
use quill_core::query::Filter;

use super::configure_routes;
use crate::middleware::error::AppError;
use crate::middleware::input::TOKEN_HEADER;
use crate::observability::echo_request_id;
use crate::state::AppState;

macro_rules! service {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

async fn user(state: &AppState, name: &str) -> User {
    state
        .users
        .create(NewUser {
            name: name.to_string(),
            username: format!("{name}@example.com"),
            token: format!("{name}-token"),
        })
        .await
        .unwrap()
}

async fn post(state: &AppState, owner: &User, slug: &str, published: bool) -> Post {
    state
        .posts
        .create(NewPost {
            user_id: Some(owner.id),
            title: format!("Title of {slug}"),
            slug: Slug::parse(slug).unwrap(),
            content: "Body".to_string(),
            published,
        })
        .await
        .unwrap()
}

async fn comment(state: &AppState, owner: &User, post_id: i64, published: bool) -> i64 {
    state
        .comments
        .create(NewComment {
            user_id: Some(owner.id),
            post_id,
            content: "Nice post".to_string(),
            published,
        })
        .await
        .unwrap()
        .id
}

async fn fixture() -> (AppState, User, User) {
    let state = AppState::in_memory();
    let alice = user(&state, "alice").await;
    let bob = user(&state, "bob").await;
    (state, alice, bob)
}

#[actix_web::test]
async fn test_anonymous_list_shows_published_active_posts() {
    let (state, alice, bob) = fixture().await;
    let visible = post(&state, &alice, "visible", true).await;
    post(&state, &alice, "draft", false).await;
    let gone = post(&state, &bob, "gone", true).await;
    state.posts.soft_delete(gone.id).await.unwrap();

    let app = service!(state);
    let (status, body) = send(&app, test::TestRequest::get().uri("/api/posts/get").to_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], 200);
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], visible.id);
}

#[actix_web::test]
async fn test_authenticated_list_is_restricted_to_own_posts() {
    let (state, alice, bob) = fixture().await;
    post(&state, &alice, "alice-post", true).await;
    let own = post(&state, &bob, "bob-post", true).await;

    let app = service!(state);
    let req = test::TestRequest::get()
        .uri("/api/posts/get?token=bob-token")
        .to_request();
    let (_, body) = send(&app, req).await;

    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0]["id"], own.id);
    assert_eq!(posts[0]["user_id"], bob.id);
}

#[actix_web::test]
async fn test_list_paginates_newest_first() {
    let (state, alice, _) = fixture().await;
    for n in 1..=12 {
        post(&state, &alice, &format!("post-{n}"), true).await;
    }

    let app = service!(state);
    let (_, first) = send(&app, test::TestRequest::get().uri("/api/posts/get").to_request()).await;
    let (_, second) = send(&app, test::TestRequest::get().uri("/api/posts/get?p=2").to_request()).await;

    let first = first["posts"].as_array().unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0]["id"], 12);

    let ids: Vec<i64> = second["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 1]);
}

#[actix_web::test]
async fn test_posts_carry_recent_comments_and_total() {
    let (state, alice, bob) = fixture().await;
    let target = post(&state, &alice, "busy", true).await;
    let mut published = Vec::new();
    for _ in 0..7 {
        published.push(comment(&state, &bob, target.id, true).await);
    }
    comment(&state, &bob, target.id, false).await;
    let retired = comment(&state, &bob, target.id, true).await;
    state.comments.soft_delete(retired).await.unwrap();

    let app = service!(state);
    let req = test::TestRequest::get()
        .uri(&format!("/api/post/get?id={}", target.id))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    let comments = body["post"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 5);
    assert_eq!(comments[0]["id"], published[6]);
    assert_eq!(body["post"]["totalCommentCount"], 7);
}

#[actix_web::test]
async fn test_unpublished_post_visible_to_owner_only() {
    let (state, alice, _) = fixture().await;
    let draft = post(&state, &alice, "draft", false).await;

    let app = service!(state);
    let uri = format!("/api/post/get?id={}", draft.id);

    let (status, body) = send(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mesg"], "post-not-found");

    let req = test::TestRequest::get()
        .uri(&uri)
        .insert_header((TOKEN_HEADER, "alice-token"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["post"]["is_published"], false);
}

#[actix_web::test]
async fn test_create_post_normalizes_slug_and_stamps_owner() {
    let (state, alice, bob) = fixture().await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/post/post")
        .insert_header((TOKEN_HEADER, "alice-token"))
        .set_json(json!({
            "title": "Hello",
            "slug": "My First Post!",
            "content": "Body",
            "is_published": true,
            "user_id": bob.id,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], 201);
    assert_eq!(body["post"]["slug"], "my-first-post");
    assert_eq!(body["post"]["user_id"], alice.id);
    assert_eq!(body["post"]["is_active"], true);
}

#[actix_web::test]
async fn test_create_post_without_token_is_unauthorised() {
    let (state, _, _) = fixture().await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/post/post")
        .set_json(json!({
            "title": "Hello",
            "slug": "hello",
            "content": "Body",
            "is_published": true,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "status": 401, "mesg": "Unauthorised" }));
    assert_eq!(state.posts.count(&Filter::new()).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_post_validates_before_authenticating() {
    let (state, _, _) = fixture().await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/post/post")
        .set_json(json!({ "slug": "hello" }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mesg"], "bad-request");
    assert_eq!(body["errors"]["title"][0], "The title field is required.");
}

#[actix_web::test]
async fn test_duplicate_slug_is_rejected() {
    let (state, alice, _) = fixture().await;
    post(&state, &alice, "hello", true).await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/post/post")
        .insert_header((TOKEN_HEADER, "alice-token"))
        .set_json(json!({
            "title": "Again",
            "slug": "Hello",
            "content": "Body",
            "is_published": true,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["mesg"], "duplicate-slug");
}

#[::core::prelude::v1::test]
fn test_storage_uniqueness_error_reads_as_duplicate_slug() {
    let err = super::posts::slug_conflict(RepoError::Constraint("Slug already in use".into()));
    assert!(matches!(err, AppError::DuplicateSlug));

    let err = super::posts::slug_conflict(RepoError::Query("timeout".into()));
    assert!(matches!(err, AppError::Internal(_)));
}

#[actix_web::test]
async fn test_owner_can_update_post_keeping_its_slug() {
    let (state, alice, _) = fixture().await;
    let target = post(&state, &alice, "hello", true).await;

    let app = service!(state);
    let req = test::TestRequest::put()
        .uri("/api/post/put")
        .insert_header((TOKEN_HEADER, "alice-token"))
        .set_json(json!({
            "id": target.id,
            "title": "Renamed",
            "slug": "hello",
            "content": "New body",
            "is_published": "1",
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], true);

    let stored = state
        .posts
        .first_where(&Filter::new().eq(quill_core::domain::PostField::Id, target.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Renamed");
    assert_eq!(stored.content, "New body");
}

#[actix_web::test]
async fn test_update_by_non_owner_looks_like_missing_post() {
    let (state, alice, _) = fixture().await;
    let target = post(&state, &alice, "hello", true).await;

    let app = service!(state);
    let req = test::TestRequest::put()
        .uri("/api/post/put")
        .insert_header((TOKEN_HEADER, "bob-token"))
        .set_json(json!({
            "id": target.id,
            "title": "Hijacked",
            "slug": "hello",
            "content": "Mine now",
            "is_published": true,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "status": 404, "mesg": "post-not-found" }));

    let stored = state
        .posts
        .first_where(&Filter::new().eq(quill_core::domain::PostField::Id, target.id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, target.title);
}

#[actix_web::test]
async fn test_delete_is_soft_and_hides_post() {
    let (state, alice, _) = fixture().await;
    let target = post(&state, &alice, "bye", true).await;

    let app = service!(state);
    let req = test::TestRequest::delete()
        .uri("/api/post/delete")
        .insert_header((TOKEN_HEADER, "alice-token"))
        .set_json(json!({ "id": target.id }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mesg"], "post-deleted");

    let req = test::TestRequest::get()
        .uri(&format!("/api/post/get?id={}", target.id))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(state.posts.count(&Filter::new()).await.unwrap(), 1);
}

#[actix_web::test]
async fn test_comment_on_missing_post_is_not_found() {
    let (state, _, _) = fixture().await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/comment/post")
        .insert_header((TOKEN_HEADER, "alice-token"))
        .set_json(json!({ "post_id": 99, "content": "Hi", "is_published": true }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mesg"], "post-not-found");
}

#[actix_web::test]
async fn test_create_comment_stamps_owner() {
    let (state, alice, bob) = fixture().await;
    let target = post(&state, &alice, "open", true).await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/comment/post?token=bob-token")
        .set_json(json!({
            "post_id": target.id,
            "content": "First!",
            "is_published": 1,
            "user_id": alice.id,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["comment"]["user_id"], bob.id);
    assert_eq!(body["comment"]["post_id"], target.id);
}

#[actix_web::test]
async fn test_comment_update_can_retire_comment() {
    let (state, alice, bob) = fixture().await;
    let target = post(&state, &alice, "open", true).await;
    let id = comment(&state, &bob, target.id, true).await;

    let app = service!(state);
    let req = test::TestRequest::put()
        .uri("/api/comment/put")
        .insert_header((TOKEN_HEADER, "bob-token"))
        .set_json(json!({
            "id": id,
            "content": "Never mind",
            "is_published": true,
            "is_active": false,
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], true);

    let req = test::TestRequest::get()
        .uri(&format!("/api/comment/get?id={id}"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mesg"], "comment-not-found");
}

#[actix_web::test]
async fn test_comment_delete_by_non_owner_is_not_found() {
    let (state, alice, bob) = fixture().await;
    let target = post(&state, &alice, "open", true).await;
    let id = comment(&state, &bob, target.id, true).await;

    let app = service!(state);
    let req = test::TestRequest::delete()
        .uri("/api/comment/delete")
        .insert_header((TOKEN_HEADER, "alice-token"))
        .set_json(json!({ "id": id }))
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["mesg"], "comment-not-found");
}

#[actix_web::test]
async fn test_comment_list_filters_by_post() {
    let (state, alice, bob) = fixture().await;
    let first = post(&state, &alice, "first", true).await;
    let second = post(&state, &alice, "second", true).await;
    comment(&state, &bob, first.id, true).await;
    let wanted = comment(&state, &bob, second.id, true).await;

    let app = service!(state);
    let req = test::TestRequest::get()
        .uri(&format!("/api/comments/get?post_id={}", second.id))
        .to_request();
    let (_, body) = send(&app, req).await;

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["id"], wanted);
}

#[actix_web::test]
async fn test_malformed_body_is_bad_request() {
    let (state, _, _) = fixture().await;

    let app = service!(state);
    let req = test::TestRequest::post()
        .uri("/api/post/post")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, body) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["body"].is_array());
}

#[actix_web::test]
async fn test_health_reports_in_memory_mode() {
    let state = AppState::in_memory();

    let app = service!(state);
    let (status, body) =
        send(&app, test::TestRequest::get().uri("/api/health").to_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "in-memory");
}

#[actix_web::test]
async fn test_response_echoes_request_id() {
    let state = AppState::in_memory();

    let app = test::init_service(
        App::new()
            .wrap(from_fn(echo_request_id))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(configure_routes),
    )
    .await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request())
        .await;

    assert!(resp.headers().contains_key("x-request-id"));
}

#[actix_web::test]
async fn test_seed_admin_is_idempotent() {
    let state = AppState::in_memory();
    state.seed_admin("admin-token").await.unwrap();
    state.seed_admin("admin-token").await.unwrap();

    let admin = state.users.find_by_token("admin-token").await.unwrap().unwrap();
    assert_eq!(admin.name, "admin");
}
