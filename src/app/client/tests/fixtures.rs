//! Shared fixtures for client and coordinator tests

use std::time::Duration;

use chrono::Utc;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::app::client::{ClientConfig, Credential, RedditClient};
use crate::auth::RedditCredentials;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_AGENT: &str = "rust:reddit_fetcher-tests:v0 (by /u/tester)";

/// Client configuration pointed at the mock server with fast pacing
pub fn test_config(server: &MockServer) -> ClientConfig {
    let mut config = ClientConfig::default()
        .with_base_url(&server.uri())
        .with_min_request_interval(Duration::from_millis(10));
    config.auth.backoff_unit = Duration::from_millis(10);
    config.request_timeout = Duration::from_secs(5);
    config
}

pub fn test_credentials() -> RedditCredentials {
    RedditCredentials {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        username: "tester".to_string(),
        password: "hunter2".to_string(),
        user_agent: TEST_AGENT.to_string(),
    }
}

/// Client with a pre-issued token, skipping the token exchange
pub fn test_client(server: &MockServer) -> RedditClient {
    test_client_with(test_config(server))
}

/// Client with a pre-acquired token and a caller-adjusted configuration
pub fn test_client_with(config: ClientConfig) -> RedditClient {
    let credential = Credential::new(TEST_TOKEN, Utc::now() + chrono::Duration::hours(1));
    RedditClient::with_credential(credential, TEST_AGENT, config).unwrap()
}

pub fn post_json(id: &str, title: &str, is_self: bool) -> Value {
    json!({
        "id": id,
        "name": format!("t3_{}", id),
        "title": title,
        "url": format!("https://www.reddit.com/r/AmItheAsshole/comments/{}/", id),
        "score": 1200,
        "created_utc": 1_700_000_000.0,
        "author": format!("author_{}", id),
        "num_comments": 42,
        "selftext": format!("story {}", id),
        "is_self": is_self,
        "subreddit": "AmItheAsshole"
    })
}

pub fn listing_json(posts: Vec<Value>) -> Value {
    let children: Vec<Value> = posts
        .into_iter()
        .map(|post| json!({"kind": "t3", "data": post}))
        .collect();
    json!({"kind": "Listing", "data": {"after": null, "children": children}})
}

pub fn thread_json(id: &str, bodies: &[&str]) -> Value {
    let comments: Vec<Value> = bodies
        .iter()
        .map(|body| json!({"kind": "t1", "data": {"body": body}}))
        .collect();
    json!([
        listing_json(vec![post_json(id, "post", true)]),
        {"kind": "Listing", "data": {"children": comments}}
    ])
}

pub fn token_json() -> Value {
    json!({
        "access_token": TEST_TOKEN,
        "token_type": "bearer",
        "expires_in": 86400,
        "scope": "*"
    })
}

pub async fn mount_listing(server: &MockServer, subreddit: &str, posts: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/r/{}/top", subreddit)))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing_json(posts)))
        .mount(server)
        .await;
}

pub async fn mount_thread(server: &MockServer, id: &str, bodies: &[&str]) {
    Mock::given(method("GET"))
        .and(path(format!("/comments/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(id, bodies)))
        .mount(server)
        .await;
}

pub async fn mount_post(server: &MockServer, id: &str, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/by_id/t3_{}", id)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(listing_json(vec![post_json(id, title, true)])),
        )
        .mount(server)
        .await;
}

/// Number of requests the server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
