//! Prelude module for Reddit Fetcher Library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use reddit_fetcher::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use reddit_fetcher::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Arc::new(RedditClient::from_env(ClientConfig::default()).await?);
//!     let coordinator = Coordinator::new(CoordinatorConfig::default(), client);
//!
//!     let batch = coordinator.run_batch("AmItheAsshole", 3, "week").await?;
//!     println!("{}", batch.count);
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, AuthError, FetchError, Result};

// Client, orchestration and data types
pub use crate::app::{
    BatchStats, ClientConfig, CommentOutcome, Coordinator, CoordinatorConfig, Credential,
    FetchBatchResult, Item, RedditClient, TimeWindow,
};

// Credentials
pub use crate::auth::{check_credentials, get_auth_status, AuthStatus, RedditCredentials};

// Configuration
pub use crate::config::AppConfig;

// Commonly used constants
pub use crate::constants::{COMMENT_TIMEOUT, MIN_REQUEST_INTERVAL, USER_AGENT};

pub use std::sync::Arc;

pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        let client_config = ClientConfig::default();
        let coordinator_config = CoordinatorConfig::default();

        assert_eq!(client_config.min_request_interval, MIN_REQUEST_INTERVAL);
        assert_eq!(coordinator_config.comment_timeout, COMMENT_TIMEOUT);
        assert_eq!(AppConfig::default().auth.max_attempts, 5);
        assert_eq!("week".parse::<TimeWindow>().unwrap(), TimeWindow::Week);
    }
}
