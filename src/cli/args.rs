//! Command-line argument parsing for Reddit Fetcher
//!
//! This module defines the CLI structure using clap derive macros: listing
//! batches, single-post lookup, credential management and configuration.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::models::TimeWindow;

/// Reddit Fetcher - rate-limited Reddit listing and comment retrieval
#[derive(Parser, Debug)]
#[command(
    name = "reddit_fetcher",
    version,
    about = "Fetch top Reddit posts with their comments under the API rate limit",
    long_about = "Fetches a subreddit's top self posts and their top-level comments through the
OAuth API, pacing every request to stay under Reddit's rate limit. Output is JSON."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    pub compact: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch a subreddit's top self posts with comments
    Top(TopArgs),

    /// Fetch a single post by id with its comments
    Post(PostArgs),

    /// Manage authentication credentials
    Auth(AuthArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Arguments for the top command
#[derive(Args, Debug, Clone)]
pub struct TopArgs {
    /// Subreddit name without the r/ prefix
    #[arg(value_name = "SUBREDDIT")]
    pub subreddit: String,

    /// Maximum number of posts to return
    #[arg(short, long, default_value = "1")]
    pub limit: usize,

    /// Time window: hour, day, week, month, year or all
    #[arg(short, long, default_value = "all")]
    pub window: String,

    /// Per-post comment timeout, e.g. "5s" (overrides config)
    #[arg(long, value_name = "DURATION", value_parser = humantime_serde::re::humantime::parse_duration)]
    pub comment_timeout: Option<std::time::Duration>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the post command
#[derive(Args, Debug, Clone)]
pub struct PostArgs {
    /// Post id (base36, without the t3_ prefix)
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for authentication management
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Authentication actions
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Set up Reddit API credentials
    Setup,

    /// Verify current credentials by requesting a token
    Verify,

    /// Show authentication status
    Status,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented default configuration file
    Init {
        /// Destination (defaults to the user config directory)
        #[arg(value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// `None` defers to the configured level.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}

impl TopArgs {
    /// Reject arguments that can never produce a request
    pub fn validate(&self) -> Result<(), String> {
        if self.limit == 0 {
            return Err("Limit must be greater than 0".to_string());
        }

        self.window
            .parse::<TimeWindow>()
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}
