//! HTTP adapter.

pub mod errmsg;
mod response;
pub mod rest;

pub use response::ApiError;
pub use rest::{router, serve, AppState};
