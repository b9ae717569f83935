//! Error types for Reddit Fetcher
//!
//! This module defines the error types for all components of the application.
//! Listing and single-item failures surface as [`FetchError`]; credential
//! acquisition failures as [`AuthError`]. Comment enrichment failures are never
//! surfaced as errors, see [`crate::app::coordinator::CommentOutcome`].

use std::path::PathBuf;
use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug)]
pub enum AuthError {
    /// A required credential environment variable is not set
    #[error("Missing Reddit credential {var}. Set it in the environment or run 'auth setup'")]
    MissingCredentials { var: String },

    /// HTTP request failed during authentication
    #[error("HTTP request failed during authentication: {0}")]
    Http(#[from] reqwest::Error),

    /// Token endpoint answered 429
    #[error("Token endpoint rate limited the request (HTTP 429)")]
    RateLimited,

    /// Token endpoint refused the grant
    #[error("Token request rejected (HTTP {status}): {reason}")]
    Rejected { status: u16, reason: String },

    /// Token endpoint answered with a body we could not use
    #[error("Invalid token response: {reason}")]
    InvalidTokenResponse { reason: String },

    /// Rate limiting persisted through every allowed attempt
    #[error("Failed to obtain access token after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },

    /// File I/O error during credential storage
    #[error("Failed to save credentials to file")]
    CredentialStorage(#[from] std::io::Error),

    /// Invalid user input or client configuration
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Listing, thread and single-item fetch errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// Caller supplied a bad argument; no request was issued
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// Request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-2xx status
    #[error("Reddit API error: HTTP {status}")]
    Upstream { status: u16 },

    /// Body did not match the expected envelope
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Body decoded but is structurally invalid
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    /// Single-item lookup returned no entries
    #[error("Post not found: {id}")]
    NotFound { id: String },

    /// Could not build a request URL
    #[error("Invalid URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

impl FetchError {
    /// Shorthand for [`FetchError::InvalidArgument`]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered as TOML
    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    /// User config directory could not be determined
    #[error("Could not determine user config directory")]
    NoConfigDir,

    /// Refusing to overwrite an existing configuration file
    #[error("Configuration file already exists: {path} (use --force to overwrite)")]
    AlreadyExists { path: PathBuf },

    /// Reading or writing a configuration file failed
    #[error("Failed to access configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Check if the error is recoverable (transient)
    pub fn is_recoverable(&self) -> bool {
        match self {
            AppError::Auth(AuthError::RateLimited)
            | AppError::Auth(AuthError::Exhausted { .. })
            | AppError::Auth(AuthError::Http(_))
            | AppError::Fetch(FetchError::Http(_)) => true,

            AppError::Fetch(FetchError::Upstream { status }) => *status == 429 || *status >= 500,

            _ => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Fetch(_) => "fetch",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
