//! Configuration structures for the batch coordinator
//!
//! This module defines how long the coordinator waits for one item's comments
//! and how batch progress is reported.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::thread;

/// Configuration for the batch coordinator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// How long to wait for one item's comments before giving up on them
    pub comment_timeout: Duration,
    /// Enable the per-item progress bar
    pub enable_progress_bar: bool,
    /// Log each item's comment outcome at info level
    pub verbose_logging: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            comment_timeout: thread::COMMENT_TIMEOUT,
            enable_progress_bar: true,
            verbose_logging: false,
        }
    }
}

impl CoordinatorConfig {
    /// Set the per-item comment timeout
    pub fn with_comment_timeout(mut self, timeout: Duration) -> Self {
        self.comment_timeout = timeout;
        self
    }

    /// Enable or disable the progress bar
    pub fn with_progress_bar(mut self, enabled: bool) -> Self {
        self.enable_progress_bar = enabled;
        self
    }

    /// Enable or disable verbose logging
    pub fn with_verbose_logging(mut self, enabled: bool) -> Self {
        self.verbose_logging = enabled;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.comment_timeout.is_zero() {
            return Err("Comment timeout cannot be zero".to_string());
        }

        Ok(())
    }
}
