//! Authenticated, rate-limited HTTP transport
//!
//! Every API request carries the bearer credential and the identifying
//! User-Agent as default headers of the underlying reqwest client, so callers
//! never set them. Requests can only be issued through a [`RequestPermit`],
//! which is handed out by the transport's token-bucket limiter; this keeps the
//! whole client under the upstream request-rate ceiling regardless of call
//! site.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::app::client::auth::Credential;
use crate::app::client::config::ClientConfig;
use crate::errors::{AuthError, AuthResult, FetchError, FetchResult};

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// HTTP operations handler shared by every fetch
///
/// Immutable after construction; share it through an `Arc`.
#[derive(Debug)]
pub struct HttpHandler {
    client: Client,
    rate_limiter: DirectRateLimiter,
    min_request_interval: Duration,
}

impl HttpHandler {
    /// Creates a transport that injects `credential` and `user_agent` into every request
    ///
    /// # Errors
    ///
    /// Returns `AuthError` if the token cannot be used as a header value, the
    /// request interval is zero, or the HTTP client cannot be built.
    pub fn new(credential: &Credential, user_agent: &str, config: &ClientConfig) -> AuthResult<Self> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", credential.access_token()))
            .map_err(|_| AuthError::InvalidTokenResponse {
                reason: "access token is not a valid header value".to_string(),
            })?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);

        let client = config.build_http_client(user_agent, headers)?;
        let rate_limiter = Self::build_rate_limiter(config.min_request_interval)?;

        Ok(Self {
            client,
            rate_limiter,
            min_request_interval: config.min_request_interval,
        })
    }

    /// Builds a limiter releasing one request per `interval`, with no burst
    fn build_rate_limiter(interval: Duration) -> AuthResult<DirectRateLimiter> {
        let quota = Quota::with_period(interval)
            .ok_or_else(|| AuthError::InvalidInput {
                reason: "Minimum request interval must be non-zero".to_string(),
            })?
            .allow_burst(NonZeroU32::MIN);
        Ok(RateLimiter::direct(quota))
    }

    /// Waits until the rate limiter admits one more request
    pub async fn acquire(self: &Arc<Self>) -> RequestPermit {
        self.rate_limiter.until_ready().await;
        RequestPermit {
            handler: Arc::clone(self),
        }
    }

    /// Acquires a permit and issues a GET, decoding the JSON body
    ///
    /// # Errors
    ///
    /// See [`RequestPermit::get_json`].
    pub async fn get_json<T: DeserializeOwned>(self: &Arc<Self>, url: &Url) -> FetchResult<T> {
        self.acquire().await.get_json(url).await
    }

    /// Minimum spacing enforced between requests
    pub fn min_request_interval(&self) -> Duration {
        self.min_request_interval
    }
}

/// Admission for exactly one request
///
/// Owns a handle to the transport so it can be moved into a spawned task.
#[derive(Debug)]
pub struct RequestPermit {
    handler: Arc<HttpHandler>,
}

impl RequestPermit {
    /// Issues a GET and decodes the JSON body, consuming the permit
    ///
    /// # Errors
    ///
    /// - `FetchError::Http` if the request fails or times out
    /// - `FetchError::Upstream` for a non-2xx status
    /// - `FetchError::Decode` if the body does not match `T`
    pub async fn get_json<T: DeserializeOwned>(self, url: &Url) -> FetchResult<T> {
        debug!("GET {}", url);
        let response = self.handler.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
            return Err(FetchError::Upstream {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(FetchError::Decode)
    }
}
