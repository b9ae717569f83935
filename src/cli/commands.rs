//! Command handlers for the Reddit Fetcher CLI
//!
//! This module implements the command handlers that connect CLI arguments,
//! the loaded configuration and the core client and coordinator.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::info;

use crate::app::{ClientConfig, Coordinator, RedditClient};
use crate::auth::{
    ensure_authenticated, setup_credentials, show_auth_status, verify_credentials,
    RedditCredentials,
};
use crate::cli::{AuthAction, AuthArgs, ConfigAction, ConfigArgs, GlobalArgs, PostArgs, TopArgs};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the top command
///
/// Authenticates, runs one batch and prints the batch result as JSON.
pub async fn handle_top(args: TopArgs, global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let start_time = Instant::now();
    args.validate().map_err(AppError::generic)?;

    let (client_config, mut coordinator_config) = config.to_runtime_config()?;
    if let Some(timeout) = args.comment_timeout {
        coordinator_config = coordinator_config.with_comment_timeout(timeout);
    }
    coordinator_config
        .validate()
        .map_err(AppError::generic)?;

    let show_progress = !args.no_progress && !global.quiet && atty::is(atty::Stream::Stderr);
    let progress_bar = coordinator_config.enable_progress_bar && show_progress;
    let coordinator_config = coordinator_config.with_progress_bar(progress_bar);

    let client = authenticate(client_config, show_progress).await?;
    let coordinator = Coordinator::new(coordinator_config, Arc::new(client));

    let batch = coordinator
        .run_batch(&args.subreddit, args.limit, &args.window)
        .await?;

    print_json(&batch, global.compact)?;

    let stats = coordinator.stats().await;
    info!(
        "Fetched {} posts from r/{} in {:?} ({} without comments)",
        batch.count,
        batch.subreddit,
        start_time.elapsed(),
        stats.degraded()
    );

    Ok(())
}

/// Handle the post command
pub async fn handle_post(args: PostArgs, global: &GlobalArgs, config: &AppConfig) -> Result<()> {
    let (client_config, _) = config.to_runtime_config()?;
    let show_progress = !global.quiet && atty::is(atty::Stream::Stderr);

    let client = authenticate(client_config, show_progress).await?;
    let item = client.fetch_one(&args.id).await?;

    print_json(&item, global.compact)
}

/// Handle authentication commands
pub async fn handle_auth(args: AuthArgs, config: &AppConfig) -> Result<()> {
    let (client_config, _) = config.to_runtime_config()?;

    match args.action {
        AuthAction::Setup => {
            setup_credentials(&client_config).await?;
        }
        AuthAction::Verify => {
            let credentials = RedditCredentials::from_env()?;
            if verify_credentials(&credentials, &client_config).await? {
                println!("Credentials verified successfully");
            } else {
                println!("Credential verification failed");
            }
        }
        AuthAction::Status => {
            show_auth_status(&client_config).await?;
        }
    }

    Ok(())
}

/// Handle configuration commands
pub async fn handle_config(args: ConfigArgs, config: &AppConfig) -> Result<()> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let written = AppConfig::write_default(path, force).await?;
            println!("Created default configuration file:");
            println!("   {}", written.display());
            println!("   You can customize settings by editing this file.");
        }
        ConfigAction::Show => {
            config.to_runtime_config()?;
            print!("{}", config.to_toml_string()?);
        }
    }

    Ok(())
}

/// Load credentials and exchange them for a token
///
/// Offers interactive setup only when stdin is a terminal.
async fn authenticate(config: ClientConfig, show_spinner: bool) -> Result<RedditClient> {
    let credentials = if atty::is(atty::Stream::Stdin) {
        ensure_authenticated(&config).await?
    } else {
        RedditCredentials::from_env()?
    };

    let spinner = if show_spinner {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["◐", "◓", "◑", "◒"]),
        );
        spinner.set_message("Authenticating with Reddit...");
        spinner.enable_steady_tick(Duration::from_millis(120));
        spinner
    } else {
        ProgressBar::hidden()
    };

    let result = RedditClient::new(&credentials, config).await;
    spinner.finish_and_clear();

    Ok(result?)
}

/// Write `value` to stdout as JSON
fn print_json<T: Serialize>(value: &T, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", rendered)?;
    handle.flush()?;
    Ok(())
}
