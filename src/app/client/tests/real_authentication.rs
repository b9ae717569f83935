//! Live Reddit tests
//!
//! These tests require real Reddit script-app credentials and network access.
//!
//! Setup: create a `.env` file in the project root with `REDDIT_CLIENT_ID`,
//! `REDDIT_CLIENT_SECRET`, `REDDIT_USERNAME`, `REDDIT_PASSWORD` and
//! `REDDIT_USER_AGENT`, then run
//! `cargo test real_ -- --ignored --nocapture`.

use crate::app::client::{ClientConfig, RedditClient};
use crate::app::{Coordinator, CoordinatorConfig};
use std::sync::Arc;

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .try_init()
        .ok();
}

#[tokio::test]
#[ignore] // Requires real Reddit credentials
async fn test_real_authentication() {
    init_tracing();
    dotenv::dotenv().ok();

    let client = RedditClient::from_env(ClientConfig::default())
        .await
        .expect("authentication against Reddit failed");

    println!("Token expires at {}", client.credential().expires_at());
    assert!(!client.credential().is_expired());
}

#[tokio::test]
#[ignore] // Requires real Reddit credentials and takes several seconds
async fn test_real_batch() {
    init_tracing();
    dotenv::dotenv().ok();

    let client = RedditClient::from_env(ClientConfig::default())
        .await
        .expect("authentication against Reddit failed");
    let coordinator = Coordinator::new(
        CoordinatorConfig::default().with_progress_bar(false),
        Arc::new(client),
    );

    let batch = coordinator
        .run_batch("AmItheAsshole", 2, "week")
        .await
        .expect("batch failed");

    println!("{}", serde_json::to_string_pretty(&batch).unwrap());
    assert!(batch.count <= 2);
    assert!(batch.results.iter().all(|item| item.is_self));
}
