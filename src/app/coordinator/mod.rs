//! Batch orchestration
//!
//! The coordinator turns one listing request into a batch of items with their
//! comments attached. It retrieves the listing once, then walks the retained
//! items in order. Each item waits for a request permit from the shared
//! transport, and its comment fetch runs as a spawned task raced against a
//! timeout.
//!
//! Comments are enrichment. A failed or slow comment fetch leaves that item's
//! comments empty and never removes the item or fails the batch; only a
//! listing failure does.
//!
//! # Architecture
//!
//! - [`config`] - Timeout and progress reporting settings
//! - [`stats`] - Per-item outcomes and cumulative batch statistics
//!
//! # Examples
//!
//! ```rust,no_run
//! use reddit_fetcher::app::{ClientConfig, Coordinator, CoordinatorConfig, RedditClient};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(RedditClient::from_env(ClientConfig::default()).await?);
//! let coordinator = Coordinator::new(CoordinatorConfig::default(), client);
//!
//! let batch = coordinator.run_batch("AmItheAsshole", 5, "week").await?;
//! println!("Fetched {} posts", batch.count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod stats;

#[cfg(test)]
pub mod tests;

use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::RwLock;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::app::client::{RedditClient, ThreadHandler};
use crate::app::models::{FetchBatchResult, Item};
use crate::errors::FetchResult;

pub use config::CoordinatorConfig;
pub use stats::{BatchStats, CommentOutcome};

/// Runs listing batches against a shared client
pub struct Coordinator {
    config: CoordinatorConfig,
    client: Arc<RedditClient>,
    stats: Arc<RwLock<BatchStats>>,
}

impl Coordinator {
    /// Create a new coordinator over a shared client
    pub fn new(config: CoordinatorConfig, client: Arc<RedditClient>) -> Self {
        Self {
            config,
            client,
            stats: Arc::new(RwLock::new(BatchStats::default())),
        }
    }

    /// Fetches a subreddit's top listing and attaches comments to each item
    ///
    /// Items keep listing order. Every retained item is returned, with empty
    /// comments if its comment fetch failed or timed out.
    ///
    /// # Errors
    ///
    /// Returns the listing's `FetchError` unchanged. Comment failures are
    /// logged and counted in [`Coordinator::stats`] instead.
    pub async fn run_batch(
        &self,
        subreddit: &str,
        limit: usize,
        window: &str,
    ) -> FetchResult<FetchBatchResult> {
        let batch_start = Instant::now();
        info!(
            "Fetching top {} posts from r/{} ({})",
            limit, subreddit, window
        );

        let mut items = self.client.fetch_top(subreddit, limit, window).await?;

        let threads = self.client.threads();
        let progress = self.create_progress_bar(items.len());
        let mut batch_stats = BatchStats::default();

        for item in items.iter_mut() {
            progress.set_message(item.id.clone());

            let outcome = self.attach_comments(&threads, item).await;
            if self.config.verbose_logging {
                info!("Post {}: {}", item.id, outcome);
            } else {
                debug!("Post {}: {}", item.id, outcome);
            }

            batch_stats.record(&outcome);
            progress.inc(1);
        }

        progress.finish_and_clear();
        batch_stats.finish(batch_start.elapsed());
        info!("Batch r/{} complete: {}", subreddit, batch_stats.summary());

        self.stats.write().await.merge(&batch_stats);

        Ok(FetchBatchResult::new(subreddit, items))
    }

    /// Fetches a single post by id, with comments when they can be fetched
    ///
    /// # Errors
    ///
    /// See [`RedditClient::fetch_one`].
    pub async fn fetch_one(&self, id: &str) -> FetchResult<Item> {
        self.client.fetch_one(id).await
    }

    /// Get cumulative statistics across every batch run so far
    pub async fn stats(&self) -> BatchStats {
        self.stats.read().await.clone()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Races one item's comment fetch against the comment timeout
    ///
    /// The permit is acquired before the race starts, so pacing never counts
    /// against the timeout.
    async fn attach_comments(&self, threads: &ThreadHandler, item: &mut Item) -> CommentOutcome {
        let permit = self.client.transport().acquire().await;

        let threads = threads.clone();
        let id = item.id.clone();
        let mut handle =
            tokio::spawn(async move { threads.fetch_comments_with(permit, &id).await });

        match timeout(self.config.comment_timeout, &mut handle).await {
            Ok(Ok(Ok(comments))) => {
                let count = comments.len();
                item.comments = comments;
                CommentOutcome::Attached(count)
            }
            Ok(Ok(Err(e))) => {
                warn!("Comments unavailable for post {}: {}", item.id, e);
                CommentOutcome::Failed(e.to_string())
            }
            Ok(Err(join_error)) => {
                warn!("Comment task for post {} panicked: {}", item.id, join_error);
                CommentOutcome::Failed(join_error.to_string())
            }
            Err(_) => {
                handle.abort();
                warn!(
                    "Comments for post {} timed out after {:?}",
                    item.id, self.config.comment_timeout
                );
                CommentOutcome::TimedOut
            }
        }
    }

    fn create_progress_bar(&self, len: usize) -> ProgressBar {
        if !self.config.enable_progress_bar || len == 0 {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-"),
        );
        progress.enable_steady_tick(Duration::from_millis(100));
        progress
    }
}
