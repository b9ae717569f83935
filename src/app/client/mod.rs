//! Reddit API client
//!
//! This module provides an authenticated client for the Reddit API with OAuth
//! token acquisition, request pacing, and listing/thread retrieval.
//!
//! The module is organized into specialized components:
//! - `config`: client configuration and reqwest client building
//! - `auth`: password-grant token acquisition with backoff on rate limiting
//! - `http`: authenticated, rate-limited transport
//! - `listing`: top-listing retrieval and filtering
//! - `thread`: comment thread and single-post retrieval

use std::sync::Arc;

use tracing::info;
use url::Url;

use crate::app::models::Item;
use crate::auth::RedditCredentials;
use crate::errors::{AuthError, AuthResult, FetchResult};

pub mod auth;
pub mod config;
pub mod http;
pub mod listing;
pub mod thread;

#[cfg(test)]
pub(crate) mod tests;

pub use auth::{AuthHandler, Credential, JitteredBackoff};
pub use config::{AuthConfig, ClientConfig, ListingConfig};
pub use http::{HttpHandler, RequestPermit};
pub use listing::{retain_candidates, ListingHandler};
pub use thread::{flatten_comments, ThreadHandler};

/// Client for the Reddit API
///
/// Owns its credential and the shared transport. Construct once and share
/// (usually behind an `Arc`); a new credential requires a new client.
#[derive(Debug)]
pub struct RedditClient {
    transport: Arc<HttpHandler>,
    credential: Credential,
    api_base: Url,
    listing_config: ListingConfig,
}

impl RedditClient {
    /// Acquires a token for `credentials` and builds the client
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Exhausted` if the token endpoint kept rate limiting
    /// through every attempt, or the first fatal token exchange error.
    pub async fn new(credentials: &RedditCredentials, config: ClientConfig) -> AuthResult<Self> {
        config
            .validate()
            .map_err(|reason| AuthError::InvalidInput { reason })?;

        let credential = AuthHandler::acquire(credentials, &config).await?;
        let client = Self::with_credential(credential, &credentials.user_agent, config)?;

        info!("Successfully authenticated with Reddit");
        Ok(client)
    }

    /// Loads credentials from the environment and authenticates
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` if a variable is not set, or any
    /// error from [`RedditClient::new`].
    pub async fn from_env(config: ClientConfig) -> AuthResult<Self> {
        let credentials = RedditCredentials::from_env()?;
        Self::new(&credentials, config).await
    }

    /// Builds a client around an already-issued credential
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the configuration is invalid or the transport
    /// cannot be built.
    pub fn with_credential(
        credential: Credential,
        user_agent: &str,
        config: ClientConfig,
    ) -> AuthResult<Self> {
        let api_base = config.api_base()?;
        let transport = Arc::new(HttpHandler::new(&credential, user_agent, &config)?);

        Ok(Self {
            transport,
            credential,
            api_base,
            listing_config: config.listing,
        })
    }

    /// Retrieves up to `limit` filtered self posts from a subreddit's top listing
    ///
    /// Comments are not fetched; see [`crate::app::Coordinator::run_batch`].
    ///
    /// # Errors
    ///
    /// See [`ListingHandler::fetch_top`].
    pub async fn fetch_top(&self, subreddit: &str, limit: usize, window: &str) -> FetchResult<Vec<Item>> {
        ListingHandler::new(&self.transport, &self.api_base, &self.listing_config)
            .fetch_top(subreddit, limit, window)
            .await
    }

    /// Fetches the flattened top-level comments of a post
    ///
    /// # Errors
    ///
    /// See [`ThreadHandler::fetch_comments`].
    pub async fn fetch_comments(&self, id: &str) -> FetchResult<Vec<String>> {
        self.threads().fetch_comments(id).await
    }

    /// Fetches a single post by id, with comments when they can be fetched
    ///
    /// # Errors
    ///
    /// See [`ThreadHandler::fetch_one`].
    pub async fn fetch_one(&self, id: &str) -> FetchResult<Item> {
        self.threads().fetch_one(id).await
    }

    /// Owned thread handler sharing this client's transport
    pub fn threads(&self) -> ThreadHandler {
        ThreadHandler::new(Arc::clone(&self.transport), self.api_base.clone())
    }

    /// The shared transport
    pub fn transport(&self) -> &Arc<HttpHandler> {
        &self.transport
    }

    /// The credential this client was built with
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Base URL of the API
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }
}
