//! Core application logic for Reddit Fetcher
//!
//! This module contains the authenticated Reddit client, the data models it
//! decodes, and the coordinator that assembles listing batches with comments.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reddit_fetcher::app::{ClientConfig, RedditClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RedditClient::from_env(ClientConfig::default()).await?;
//!
//! let item = client.fetch_one("1abcde").await?;
//! println!("{}: {} comments", item.title, item.comments.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod coordinator;
pub mod models;

// Re-export main public API
pub use client::{
    AuthConfig, ClientConfig, Credential, HttpHandler, ListingConfig, RedditClient,
    RequestPermit,
};
pub use coordinator::{BatchStats, CommentOutcome, Coordinator, CoordinatorConfig};
pub use models::{FetchBatchResult, Item, TimeWindow};
