//! Batch statistics tracking and aggregation
//!
//! Comment enrichment is best-effort, so its failures never reach the caller
//! as errors. They are counted here instead, per batch and cumulatively.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened to one item's comment fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentOutcome {
    /// Comments arrived and were attached (count may be zero)
    Attached(usize),
    /// The fetch failed; the item keeps empty comments
    Failed(String),
    /// The fetch did not finish in time and was cancelled
    TimedOut,
}

impl CommentOutcome {
    /// Whether the item went out without its comments
    pub fn is_degraded(&self) -> bool {
        !matches!(self, CommentOutcome::Attached(_))
    }
}

impl fmt::Display for CommentOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentOutcome::Attached(count) => write!(f, "{} comments attached", count),
            CommentOutcome::Failed(reason) => write!(f, "comment fetch failed: {}", reason),
            CommentOutcome::TimedOut => f.write_str("comment fetch timed out"),
        }
    }
}

/// Aggregated batch statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchStats {
    /// Batches that returned a result
    pub batches_completed: usize,
    /// Items returned across batches
    pub items_returned: usize,
    /// Items whose comments were attached
    pub comments_attached: usize,
    /// Comment bodies attached in total
    pub comment_bodies: usize,
    /// Comment fetches that failed
    pub comment_failures: usize,
    /// Comment fetches that timed out
    pub comment_timeouts: usize,
    /// Wall time spent in completed batches
    pub total_duration: Duration,
    /// When the most recent batch finished
    pub last_batch_at: Option<DateTime<Utc>>,
}

impl Default for BatchStats {
    fn default() -> Self {
        Self {
            batches_completed: 0,
            items_returned: 0,
            comments_attached: 0,
            comment_bodies: 0,
            comment_failures: 0,
            comment_timeouts: 0,
            total_duration: Duration::ZERO,
            last_batch_at: None,
        }
    }
}

impl BatchStats {
    /// Count one item's outcome
    pub fn record(&mut self, outcome: &CommentOutcome) {
        self.items_returned += 1;
        match outcome {
            CommentOutcome::Attached(count) => {
                self.comments_attached += 1;
                self.comment_bodies += count;
            }
            CommentOutcome::Failed(_) => self.comment_failures += 1,
            CommentOutcome::TimedOut => self.comment_timeouts += 1,
        }
    }

    /// Mark the batch finished after `duration`
    pub fn finish(&mut self, duration: Duration) {
        self.batches_completed += 1;
        self.total_duration += duration;
        self.last_batch_at = Some(Utc::now());
    }

    /// Fold another set of statistics into this one
    pub fn merge(&mut self, other: &BatchStats) {
        self.batches_completed += other.batches_completed;
        self.items_returned += other.items_returned;
        self.comments_attached += other.comments_attached;
        self.comment_bodies += other.comment_bodies;
        self.comment_failures += other.comment_failures;
        self.comment_timeouts += other.comment_timeouts;
        self.total_duration += other.total_duration;
        self.last_batch_at = other.last_batch_at.or(self.last_batch_at);
    }

    /// Items returned without comments
    pub fn degraded(&self) -> usize {
        self.comment_failures + self.comment_timeouts
    }

    /// Get a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} items in {:.1}s: {} with comments ({} bodies), {} failed, {} timed out",
            self.items_returned,
            self.total_duration.as_secs_f64(),
            self.comments_attached,
            self.comment_bodies,
            self.comment_failures,
            self.comment_timeouts
        )
    }
}
