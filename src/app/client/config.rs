//! HTTP client configuration and building logic
//!
//! This module handles the configuration of the token exchange, the
//! authenticated transport and the listing policy, and the construction of the
//! underlying reqwest clients.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::constants::{auth, http, limits, listing, reddit};
use crate::errors::{AuthError, AuthResult};

/// Configuration for the authenticated Reddit client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for authenticated API requests
    pub api_base_url: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// Timeout applied to every API request
    pub request_timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// Minimum spacing between API requests
    pub min_request_interval: Duration,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    pub pool_idle_timeout: Option<Duration>,
    /// Maximum number of idle connections per host
    pub pool_max_per_host: usize,
    /// Token exchange settings
    pub auth: AuthConfig,
    /// Listing filter settings
    pub listing: ListingConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: reddit::API_BASE_URL.to_string(),
            token_url: reddit::TOKEN_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            min_request_interval: limits::MIN_REQUEST_INTERVAL,
            tcp_nodelay: true,
            pool_idle_timeout: Some(http::POOL_IDLE_TIMEOUT),
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            auth: AuthConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

/// Token exchange retry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Maximum attempts, first one included
    pub max_attempts: u32,
    /// Backoff delay for attempt `n` is `backoff_unit * (2^n + U(0,1))`
    pub backoff_unit: Duration,
    /// Timeout for a single token request
    pub request_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_attempts: auth::MAX_ATTEMPTS,
            backoff_unit: auth::BACKOFF_UNIT,
            request_timeout: auth::REQUEST_TIMEOUT,
        }
    }
}

/// Listing retrieval policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    /// Extra raw entries requested beyond the caller's limit
    pub overfetch: usize,
    /// Lowercase title markers of moderator threads to drop
    pub meta_markers: Vec<String>,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            overfetch: listing::OVERFETCH,
            meta_markers: listing::META_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
        }
    }
}

impl ClientConfig {
    /// Point both the API and the token endpoint at `base`
    ///
    /// Intended for local fixtures serving both endpoints.
    pub fn with_base_url(mut self, base: &str) -> Self {
        let base = base.trim_end_matches('/');
        self.api_base_url = base.to_string();
        self.token_url = format!("{}/api/v1/access_token", base);
        self
    }

    /// Set the minimum spacing between API requests
    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    /// Parse the API base URL, normalized with a trailing slash so that
    /// relative joins append to its path
    pub fn api_base(&self) -> AuthResult<Url> {
        let mut raw = self.api_base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|e| AuthError::InvalidInput {
            reason: format!("invalid api_base_url {}: {}", self.api_base_url, e),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.min_request_interval.is_zero() {
            return Err("Minimum request interval cannot be zero".to_string());
        }

        if self.request_timeout.is_zero() {
            return Err("Request timeout cannot be zero".to_string());
        }

        if self.auth.max_attempts == 0 {
            return Err("Token exchange needs at least one attempt".to_string());
        }

        if self.auth.request_timeout.is_zero() || self.auth.request_timeout > auth::REQUEST_TIMEOUT
        {
            return Err(format!(
                "Token request timeout must be between 0 and {}s",
                auth::REQUEST_TIMEOUT.as_secs()
            ));
        }

        if self.api_base().is_err() {
            return Err(format!("Invalid API base URL: {}", self.api_base_url));
        }

        if Url::parse(&self.token_url).is_err() {
            return Err(format!("Invalid token URL: {}", self.token_url));
        }

        Ok(())
    }

    /// Builds the HTTP client used for API requests
    ///
    /// `default_headers` is attached to every request issued through the client.
    pub fn build_http_client(
        &self,
        user_agent: &str,
        default_headers: HeaderMap,
    ) -> AuthResult<Client> {
        let mut client_builder = Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(user_agent)
            .default_headers(default_headers)
            .tcp_nodelay(self.tcp_nodelay)
            .pool_max_idle_per_host(self.pool_max_per_host);

        if let Some(idle_timeout) = self.pool_idle_timeout {
            client_builder = client_builder.pool_idle_timeout(idle_timeout);
        }

        client_builder.build().map_err(AuthError::Http)
    }

    /// Builds the unauthenticated client used for the token exchange
    pub fn build_token_client(&self, user_agent: &str) -> AuthResult<Client> {
        Client::builder()
            .timeout(self.auth.request_timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(user_agent)
            .build()
            .map_err(AuthError::Http)
    }
}
