//! Listing and write services.
//!
//! Each service owns the stores it needs and its per-listing limits, both
//! injected at construction. All store access for a request runs under the
//! caller's [`RequestContext`](crate::context::RequestContext).

pub mod comments;
mod counts;
mod error;
pub mod feed;
pub mod likes;
pub mod posts;

pub use comments::CommentService;
pub use error::ServiceError;
pub use feed::FeedService;
pub use likes::LikeService;
pub use posts::PostService;

/// Longest accepted post or comment body, in characters.
pub const MAX_BODY_CHARS: usize = 5000;

/// Check a body's length. Empty bodies pass only when `allow_empty`.
pub(crate) fn check_body(body: &str, allow_empty: bool) -> Result<(), ServiceError> {
    let chars = body.chars().count();
    if chars == 0 && !allow_empty {
        return Err(ServiceError::InvalidInput("body is required".to_string()));
    }
    if chars > MAX_BODY_CHARS {
        return Err(ServiceError::InvalidInput(format!(
            "body: should be at most {MAX_BODY_CHARS} characters"
        )));
    }
    Ok(())
}
