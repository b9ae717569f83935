//! Reddit Fetcher Library
//!
//! A Rust library for fetching a subreddit's top posts and their comments
//! through Reddit's OAuth API. Token acquisition backs off on rate limiting,
//! every API request is paced under the upstream ceiling, and comment
//! retrieval is bounded by a per-item timeout so a slow thread never stalls a
//! batch.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
