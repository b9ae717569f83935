//! Reddit OAuth token acquisition
//!
//! This module performs the resource-owner password grant against the Reddit
//! token endpoint. Rate-limited attempts (HTTP 429) are retried with
//! exponential backoff plus jitter; every other failure is fatal on the spot.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backoff::backoff::Backoff;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::app::client::config::ClientConfig;
use crate::auth::RedditCredentials;
use crate::constants::auth;
use crate::errors::{AuthError, AuthResult};

/// Bearer credential returned by the token endpoint
///
/// The token itself never appears in `Debug` output.
#[derive(Clone)]
pub struct Credential {
    access_token: String,
    expires_at: DateTime<Utc>,
    scope: Option<String>,
}

impl Credential {
    /// Wrap an already-issued bearer token
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token: access_token.into(),
            expires_at,
            scope: None,
        }
    }

    /// Attach the scope string granted with the token
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Whether the token has passed its expiry instant
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Backoff policy yielding `unit * (2^attempt + U(0,1))`
///
/// Yields `max_attempts - 1` delays, so the operation runs at most
/// `max_attempts` times in total.
#[derive(Debug, Clone)]
pub struct JitteredBackoff {
    unit: Duration,
    max_attempts: u32,
    attempt: u32,
}

impl JitteredBackoff {
    pub fn new(unit: Duration, max_attempts: u32) -> Self {
        Self {
            unit,
            max_attempts,
            attempt: 0,
        }
    }

    /// Delay after the given 0-based failed attempt, for a jitter in `[0, 1)`
    pub fn delay_for(&self, attempt: u32, jitter: f64) -> Duration {
        let factor = 2f64.powi(attempt as i32) + jitter;
        self.unit.mul_f64(factor)
    }
}

impl Backoff for JitteredBackoff {
    fn reset(&mut self) {
        self.attempt = 0;
    }

    fn next_backoff(&mut self) -> Option<Duration> {
        if self.attempt + 1 >= self.max_attempts {
            return None;
        }
        let delay = self.delay_for(self.attempt, fastrand::f64());
        self.attempt += 1;
        Some(delay)
    }
}

/// Token endpoint response body
///
/// Reddit reports some failures with HTTP 200 and an `error` field, which may
/// be either a string or a number.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    error: Option<serde_json::Value>,
}

/// Handles Reddit token acquisition
pub struct AuthHandler;

impl AuthHandler {
    /// Obtains a bearer credential via the password grant
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Exhausted` if every allowed attempt was rate limited,
    /// or the first non-rate-limit failure otherwise.
    pub async fn acquire(
        credentials: &RedditCredentials,
        config: &ClientConfig,
    ) -> AuthResult<Credential> {
        let token_client = config.build_token_client(&credentials.user_agent)?;
        let token_client = &token_client;
        let token_url = config.token_url.as_str();
        let attempts = AtomicU32::new(0);
        let attempts_ref = &attempts;

        info!(
            "Requesting Reddit access token for user: {}",
            credentials.username
        );

        let policy = JitteredBackoff::new(config.auth.backoff_unit, config.auth.max_attempts);
        let result = backoff::future::retry_notify(
            policy,
            || async move {
                let attempt = attempts_ref.fetch_add(1, Ordering::SeqCst) + 1;
                debug!("Token exchange attempt {}", attempt);
                Self::request_token(token_client, token_url, credentials)
                    .await
                    .map_err(|e| match e {
                        AuthError::RateLimited => backoff::Error::transient(e),
                        other => backoff::Error::permanent(other),
                    })
            },
            |e: AuthError, delay: Duration| {
                warn!(
                    "Rate limited by Reddit ({}). Retrying in {:.2} seconds (attempt {}/{})",
                    e,
                    delay.as_secs_f64(),
                    attempts_ref.load(Ordering::SeqCst),
                    config.auth.max_attempts
                );
            },
        )
        .await;

        let attempts = attempts.load(Ordering::SeqCst);
        match result {
            Ok(credential) => {
                info!(
                    "Obtained access token after {} attempt(s), expires at {}",
                    attempts,
                    credential.expires_at()
                );
                Ok(credential)
            }
            Err(AuthError::RateLimited) => Err(AuthError::Exhausted {
                attempts,
                last_error: AuthError::RateLimited.to_string(),
            }),
            Err(e) => {
                warn!("Token exchange failed: {}", e);
                Err(e)
            }
        }
    }

    /// Performs one token exchange
    async fn request_token(
        client: &Client,
        token_url: &str,
        credentials: &RedditCredentials,
    ) -> AuthResult<Credential> {
        let response = client
            .post(token_url)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", auth::GRANT_TYPE),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        debug!("Token endpoint response status: {}", status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AuthError::RateLimited);
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                reason: body.chars().take(200).collect(),
            });
        }

        Self::parse_token_response(status.as_u16(), &body)
    }

    /// Turns a successful token response body into a credential
    fn parse_token_response(status: u16, body: &str) -> AuthResult<Credential> {
        let parsed: TokenResponse =
            serde_json::from_str(body).map_err(|e| AuthError::InvalidTokenResponse {
                reason: e.to_string(),
            })?;

        if let Some(error) = parsed.error {
            let reason = match error {
                serde_json::Value::String(message) => message,
                other => other.to_string(),
            };
            return Err(AuthError::Rejected { status, reason });
        }

        let access_token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::InvalidTokenResponse {
                reason: "missing access_token".to_string(),
            })?;

        let lifetime = parsed
            .expires_in
            .unwrap_or(auth::DEFAULT_TOKEN_LIFETIME_SECS);
        let credential = Credential::new(
            access_token,
            Utc::now() + chrono::Duration::seconds(lifetime),
        );

        Ok(match parsed.scope {
            Some(scope) => credential.with_scope(scope),
            None => credential,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_delays_grow_exponentially_with_jitter() {
        let unit = Duration::from_millis(100);
        let mut policy = JitteredBackoff::new(unit, 5);

        let delays: Vec<Duration> = std::iter::from_fn(|| policy.next_backoff()).collect();
        assert_eq!(delays.len(), 4);

        for (attempt, delay) in delays.iter().enumerate() {
            let floor = unit * 2u32.pow(attempt as u32);
            assert!(*delay >= floor, "delay {:?} below {:?}", delay, floor);
            assert!(*delay < floor + unit, "delay {:?} above jitter bound", delay);
        }
    }

    #[test]
    fn test_backoff_reset_and_single_attempt() {
        let mut policy = JitteredBackoff::new(Duration::from_millis(1), 2);
        assert!(policy.next_backoff().is_some());
        assert!(policy.next_backoff().is_none());
        policy.reset();
        assert!(policy.next_backoff().is_some());

        let mut single = JitteredBackoff::new(Duration::from_millis(1), 1);
        assert!(single.next_backoff().is_none());
    }

    #[test]
    fn test_delay_formula() {
        let policy = JitteredBackoff::new(Duration::from_secs(1), 5);
        assert_eq!(policy.delay_for(0, 0.0), Duration::from_secs(1));
        assert_eq!(policy.delay_for(3, 0.5), Duration::from_millis(8500));
    }

    #[test]
    fn test_parse_token_response() {
        let body = r#"{"access_token":"abc123","token_type":"bearer","expires_in":86400,"scope":"*"}"#;
        let credential = AuthHandler::parse_token_response(200, body).unwrap();
        assert_eq!(credential.access_token(), "abc123");
        assert_eq!(credential.scope(), Some("*"));
        assert!(!credential.is_expired());
        assert!(credential.expires_at() > Utc::now() + chrono::Duration::hours(23));
    }

    #[test]
    fn test_parse_token_response_error_field() {
        let result = AuthHandler::parse_token_response(200, r#"{"error":"invalid_grant"}"#);
        match result {
            Err(AuthError::Rejected { status, reason }) => {
                assert_eq!(status, 200);
                assert_eq!(reason, "invalid_grant");
            }
            other => panic!("Expected Rejected, got {:?}", other),
        }

        let result = AuthHandler::parse_token_response(200, r#"{"error":401,"message":"x"}"#);
        assert!(matches!(result, Err(AuthError::Rejected { .. })));
    }

    #[test]
    fn test_parse_token_response_missing_token() {
        let result = AuthHandler::parse_token_response(200, r#"{"token_type":"bearer"}"#);
        assert!(matches!(
            result,
            Err(AuthError::InvalidTokenResponse { .. })
        ));

        let result = AuthHandler::parse_token_response(200, "<html>oops</html>");
        assert!(matches!(
            result,
            Err(AuthError::InvalidTokenResponse { .. })
        ));
    }

    #[test]
    fn test_credential_debug_is_redacted() {
        let credential = Credential::new("super-secret-token", Utc::now());
        let debug = format!("{:?}", credential);
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("redacted"));
        assert!(credential.is_expired());
    }
}
