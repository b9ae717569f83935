//! Batch orchestration tests against a mock Reddit server

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::app::client::tests::fixtures::*;
use crate::errors::FetchError;

/// Coordinator with a short comment timeout and no progress bar
fn create_test_coordinator(server: &MockServer) -> Coordinator {
    let config = CoordinatorConfig::default()
        .with_comment_timeout(Duration::from_millis(300))
        .with_progress_bar(false);
    Coordinator::new(config, Arc::new(test_client(server)))
}

#[tokio::test]
async fn test_batch_attaches_comments_in_listing_order() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "AmItheAsshole",
        vec![
            post_json("p1", "AITA for leaving early?", true),
            post_json("p2", "AITA for the group chat?", true),
        ],
    )
    .await;
    mount_thread(&server, "p1", &["NTA", "YTA"]).await;
    mount_thread(&server, "p2", &["ESH"]).await;

    let coordinator = create_test_coordinator(&server);
    let batch = coordinator
        .run_batch("AmItheAsshole", 2, "week")
        .await
        .unwrap();

    assert_eq!(batch.subreddit, "AmItheAsshole");
    assert_eq!(batch.count, 2);
    assert_eq!(batch.results[0].id, "p1");
    assert_eq!(batch.results[0].comments, vec!["NTA", "YTA"]);
    assert_eq!(batch.results[1].comments, vec!["ESH"]);

    let stats = coordinator.stats().await;
    assert_eq!(stats.batches_completed, 1);
    assert_eq!(stats.comments_attached, 2);
    assert_eq!(stats.comment_bodies, 3);
    assert_eq!(stats.degraded(), 0);
}

#[tokio::test]
async fn test_slow_thread_times_out_without_dropping_item() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "AmItheAsshole",
        vec![
            post_json("slow", "AITA for being slow?", true),
            post_json("fast", "AITA for being fast?", true),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/comments/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(thread_json("slow", &["never seen"]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;
    mount_thread(&server, "fast", &["NTA"]).await;

    let coordinator = create_test_coordinator(&server);
    let start = Instant::now();
    let batch = coordinator
        .run_batch("AmItheAsshole", 2, "all")
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(batch.count, 2);
    assert_eq!(batch.results[0].id, "slow");
    assert!(batch.results[0].comments.is_empty());
    assert_eq!(batch.results[1].comments, vec!["NTA"]);

    let stats = coordinator.stats().await;
    assert_eq!(stats.comment_timeouts, 1);
    assert_eq!(stats.comments_attached, 1);
}

#[tokio::test]
async fn test_failed_thread_leaves_comments_empty() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "AmItheAsshole",
        vec![
            post_json("gone", "AITA for deleting it?", true),
            post_json("bad", "AITA for the weird reply?", true),
            post_json("ok", "AITA for asking?", true),
        ],
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/comments/gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/comments/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([listing_json(vec![])])))
        .mount(&server)
        .await;
    mount_thread(&server, "ok", &["YTA"]).await;

    let coordinator = create_test_coordinator(&server);
    let batch = coordinator
        .run_batch("AmItheAsshole", 3, "month")
        .await
        .unwrap();

    let ids: Vec<&str> = batch.results.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["gone", "bad", "ok"]);
    assert!(batch.results[0].comments.is_empty());
    assert!(batch.results[1].comments.is_empty());
    assert_eq!(batch.results[2].comments, vec!["YTA"]);

    let stats = coordinator.stats().await;
    assert_eq!(stats.comment_failures, 2);
    assert_eq!(stats.items_returned, 3);
}

#[tokio::test]
async fn test_batch_results_respect_listing_rules() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "AmItheAsshole",
        vec![
            post_json("m1", "Monthly Discussion Thread", true),
            post_json("l1", "A link", false),
            post_json("s1", "AITA for the thermostat?", true),
            post_json("m2", "OPEN FORUM: anything goes", true),
            post_json("s2", "AITA for cancelling?", true),
            post_json("s3", "AITA for the last slice?", true),
        ],
    )
    .await;
    for id in ["s1", "s2", "s3"] {
        mount_thread(&server, id, &["NTA", ""]).await;
    }

    let coordinator = create_test_coordinator(&server);
    let limit = 2;
    let batch = coordinator
        .run_batch("AmItheAsshole", limit, "year")
        .await
        .unwrap();

    assert!(batch.count <= limit);
    assert_eq!(batch.count, batch.results.len());
    for item in &batch.results {
        let title = item.title.to_lowercase();
        assert!(!title.contains("open forum"));
        assert!(!title.contains("monthly discussion"));
        assert!(item.is_self);
        assert!(item.comments.iter().all(|c| !c.is_empty()));
    }
}

#[tokio::test]
async fn test_listing_error_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/r/banned_sub/top"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let coordinator = create_test_coordinator(&server);
    let result = coordinator.run_batch("banned_sub", 5, "all").await;

    assert!(matches!(result, Err(FetchError::Upstream { status: 404 })));
    assert_eq!(coordinator.stats().await.batches_completed, 0);
}

#[tokio::test]
async fn test_invalid_window_fails_before_any_request() {
    let server = MockServer::start().await;
    let coordinator = create_test_coordinator(&server);

    let result = coordinator.run_batch("AmItheAsshole", 5, "century").await;

    assert!(matches!(result, Err(FetchError::InvalidArgument { .. })));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn test_requests_are_paced() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "AmItheAsshole",
        vec![
            post_json("q1", "AITA one?", true),
            post_json("q2", "AITA two?", true),
            post_json("q3", "AITA three?", true),
        ],
    )
    .await;
    for id in ["q1", "q2", "q3"] {
        mount_thread(&server, id, &["NTA"]).await;
    }

    let interval = Duration::from_millis(100);
    let client_config = test_config(&server).with_min_request_interval(interval);
    let credential = crate::app::client::Credential::new(
        TEST_TOKEN,
        chrono::Utc::now() + chrono::Duration::hours(1),
    );
    let client = RedditClient::with_credential(credential, TEST_AGENT, client_config).unwrap();
    let coordinator = Coordinator::new(
        CoordinatorConfig::default().with_progress_bar(false),
        Arc::new(client),
    );

    let start = Instant::now();
    let batch = coordinator
        .run_batch("AmItheAsshole", 3, "all")
        .await
        .unwrap();

    // Listing plus three threads: three spacing intervals at least
    assert_eq!(batch.count, 3);
    assert_eq!(request_count(&server).await, 4);
    assert!(start.elapsed() >= interval * 3 - Duration::from_millis(20));
}

#[tokio::test]
async fn test_stats_accumulate_across_batches() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        "AmItheAsshole",
        vec![post_json("r1", "AITA again?", true)],
    )
    .await;
    mount_thread(&server, "r1", &["NTA"]).await;

    let coordinator = create_test_coordinator(&server);
    coordinator.run_batch("AmItheAsshole", 1, "all").await.unwrap();
    coordinator.run_batch("AmItheAsshole", 1, "all").await.unwrap();

    let stats = coordinator.stats().await;
    assert_eq!(stats.batches_completed, 2);
    assert_eq!(stats.items_returned, 2);
    assert!(stats.last_batch_at.is_some());
}

#[tokio::test]
async fn test_fetch_one_delegates_to_client() {
    let server = MockServer::start().await;
    mount_post(&server, "one", "AITA for a single post?").await;
    mount_thread(&server, "one", &["NTA"]).await;

    let coordinator = create_test_coordinator(&server);
    let item = coordinator.fetch_one("one").await.unwrap();

    assert_eq!(item.title, "AITA for a single post?");
    assert_eq!(item.comments, vec!["NTA"]);
}
