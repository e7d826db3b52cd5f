//! REST API.
//!
//! Endpoints:
//! - `GET /health`: liveness
//! - `POST /posts`: create a post
//! - `GET /posts/{post_id}`: a post with comment and like counts
//! - `GET /posts/{post_id}/comments`: one page of comments
//! - `POST /posts/{post_id}/comments`: comment on a post
//! - `POST /posts/{post_id}/likes`: like a post
//! - `POST /comments/{comment_id}/likes`: like a comment
//! - `GET /feed`: one page of the viewer's feed
//!
//! The viewer is identified by the `X-User-Id` header set by the gateway.
//! Paged endpoints take `limit` plus the optional cursor pair
//! `last_loaded_timestamp` / `last_loaded_id`.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use super::errmsg;
use super::response::{success, ApiError};
use crate::config::{PaginationConfig, RequestConfig, ServerConfig};
use crate::context::RequestContext;
use crate::model::{EntityType, ImageLocation};
use crate::pagination::{cursor, PageRequest};
use crate::services::{CommentService, FeedService, LikeService, PostService};
use crate::storage::Stores;

/// Header carrying the authenticated viewer's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Shared state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    posts: Arc<PostService>,
    comments: Arc<CommentService>,
    feed: Arc<FeedService>,
    likes: Arc<LikeService>,
    request_timeout: Duration,
    shutdown: watch::Receiver<bool>,
}

impl AppState {
    pub fn new(
        stores: &Stores,
        pagination: &PaginationConfig,
        request: &RequestConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            posts: Arc::new(PostService::new(stores)),
            comments: Arc::new(CommentService::new(
                stores,
                pagination.comments_max_page_size,
            )),
            feed: Arc::new(FeedService::new(stores, pagination.feed_max_page_size)),
            likes: Arc::new(LikeService::new(stores)),
            request_timeout: request.timeout(),
            shutdown,
        }
    }

    /// Deadline and shutdown signal for one request.
    ///
    /// A client disconnect drops the handler future outright, which drops
    /// any in-flight store call with it.
    fn context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout).cancel_on(self.shutdown.clone())
    }
}

/// Start the REST server and run until `shutdown` becomes `true`.
pub async fn serve(
    state: AppState,
    config: &ServerConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    let addr = listener.local_addr()?;
    info!(address = %addr, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow_and_update() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await?;
    info!("REST API stopped");
    Ok(())
}

/// Build the axum router (separated for testing).
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/posts", post(create_post))
        .route("/posts/{post_id}", get(get_post))
        .route(
            "/posts/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route("/posts/{post_id}/likes", post(like_post))
        .route("/comments/{comment_id}/likes", post(like_comment))
        .route("/feed", get(feed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Request parsing
// ============================================================================

/// Query parameters of paged endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub last_loaded_timestamp: Option<String>,
    pub last_loaded_id: Option<String>,
}

impl PageParams {
    fn into_request(self) -> Result<PageRequest, ApiError> {
        let limit = self
            .limit
            .as_deref()
            .and_then(|raw| raw.parse::<u32>().ok())
            .ok_or_else(|| ApiError::BadRequest(errmsg::INVALID_LIMIT.to_string()))?;
        let cursor = cursor::decode_optional(
            self.last_loaded_timestamp.as_deref(),
            self.last_loaded_id.as_deref(),
        )?;
        Ok(PageRequest { cursor, limit })
    }
}

fn viewer(headers: &HeaderMap) -> Result<Uuid, ApiError> {
    let raw = headers
        .get(USER_ID_HEADER)
        .ok_or_else(|| ApiError::Unauthorized(errmsg::MISSING_USER_ID.to_string()))?;
    raw.to_str()
        .ok()
        .and_then(|s| Uuid::try_parse(s).ok())
        .ok_or_else(|| ApiError::BadRequest(errmsg::INVALID_USER_ID.to_string()))
}

fn path_id(what: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::try_parse(raw).map_err(|e| ApiError::BadRequest(format!("Invalid {what} ID: {e}")))
}

fn page_params(
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<PageRequest, ApiError> {
    let Query(params) =
        query.map_err(|_| ApiError::BadRequest(errmsg::INVALID_QUERY.to_string()))?;
    params.into_request()
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|_| ApiError::BadRequest(errmsg::INVALID_JSON.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct CreatePostBody {
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub images: Vec<ImageLocation>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentBody {
    pub body: String,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<CreatePostBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(body)?;
    let author = viewer(&headers)?;

    let post = state
        .posts
        .create(&state.context(), author, &request.body, request.images)
        .await?;
    Ok(success(StatusCode::CREATED, json!({ "id": post.id })))
}

async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Response, ApiError> {
    let post_id = path_id("post", &post_id)?;
    let post = state.posts.get(&state.context(), post_id).await?;
    Ok(success(StatusCode::OK, json!({ "post": post })))
}

async fn list_comments(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let post_id = path_id("post", &post_id)?;
    let request = page_params(query)?;

    let page = state
        .comments
        .list(&state.context(), post_id, request)
        .await?;
    Ok(success(
        StatusCode::OK,
        json!({ "comments": page.items, "next_cursor": page.next_cursor }),
    ))
}

async fn create_comment(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<CreateCommentBody>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = json_body(body)?;
    let post_id = path_id("post", &post_id)?;
    let author = viewer(&headers)?;

    let comment = state
        .comments
        .create(&state.context(), post_id, author, &request.body)
        .await?;
    Ok(success(StatusCode::CREATED, json!({ "id": comment.id })))
}

async fn like_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let post_id = path_id("post", &post_id)?;
    let author = viewer(&headers)?;

    state
        .likes
        .like(&state.context(), EntityType::Post, post_id, author)
        .await?;
    Ok(success(StatusCode::CREATED, json!({})))
}

async fn like_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let comment_id = path_id("comment", &comment_id)?;
    let author = viewer(&headers)?;

    state
        .likes
        .like(&state.context(), EntityType::Comment, comment_id, author)
        .await?;
    Ok(success(StatusCode::CREATED, json!({})))
}

async fn feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    query: Result<Query<PageParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let viewer = viewer(&headers)?;
    let request = page_params(query)?;

    let page = state.feed.feed(&state.context(), viewer, request).await?;
    Ok(success(
        StatusCode::OK,
        json!({ "posts": page.items, "next_cursor": page.next_cursor }),
    ))
}

#[cfg(test)]
#[path = "rest_tests.rs"]
mod tests;
