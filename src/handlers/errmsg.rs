//! Error message constants for REST handlers.
//!
//! User-facing error messages should be sanitized to avoid leaking infrastructure details.
//! Full error details are logged internally.

/// The gateway did not forward a viewer identity.
pub const MISSING_USER_ID: &str = "Missing X-User-Id header";

/// The forwarded viewer identity is not a UUID.
pub const INVALID_USER_ID: &str = "Invalid X-User-Id header";

/// Request body is not the expected JSON shape.
pub const INVALID_JSON: &str = "Invalid JSON body";

/// Query string could not be parsed, e.g. a repeated parameter.
pub const INVALID_QUERY: &str = "Invalid query string";

/// `limit` query parameter missing or not a non-negative integer.
pub const INVALID_LIMIT: &str = "limit: should be an integer";

pub const POST_NOT_FOUND: &str = "Post not found";

pub const COMMENT_NOT_FOUND: &str = "Comment not found";

pub const LIKE_EXISTS: &str = "Like already exists";

/// Deadline exceeded while waiting on storage.
pub const REQUEST_TIMEOUT: &str = "Request Timeout";

/// Storage or other internal failure (sanitized).
pub const INTERNAL_ERROR: &str = "Internal Server Error";
