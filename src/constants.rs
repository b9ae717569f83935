//! Application constants for Reddit Fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

use std::time::Duration;

/// Environment variable names for authentication
pub mod env {
    /// OAuth application client id
    pub const CLIENT_ID: &str = "REDDIT_CLIENT_ID";

    /// OAuth application client secret
    pub const CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";

    /// Reddit account username used for the password grant
    pub const USERNAME: &str = "REDDIT_USERNAME";

    /// Reddit account password used for the password grant
    pub const PASSWORD: &str = "REDDIT_PASSWORD";

    /// Identifying User-Agent required by the Reddit API usage policy
    pub const USER_AGENT: &str = "REDDIT_USER_AGENT";

    /// All credential variables, in the order they are written to `.env`
    pub const ALL: [&str; 5] = [CLIENT_ID, CLIENT_SECRET, USERNAME, PASSWORD, USER_AGENT];
}

/// Authentication and credential-related constants
pub mod auth {
    use super::Duration;

    /// Maximum token exchange attempts (first attempt included)
    pub const MAX_ATTEMPTS: u32 = 5;

    /// Unit multiplied into `2^attempt + jitter` for each backoff delay
    pub const BACKOFF_UNIT: Duration = Duration::from_secs(1);

    /// Upper bound for a single token exchange request
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Token lifetime assumed when the endpoint omits `expires_in`
    pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

    /// OAuth grant type used for script applications
    pub const GRANT_TYPE: &str = "password";

    /// Minimum Reddit username length
    pub const MIN_USERNAME_LENGTH: usize = 3;

    /// Maximum Reddit username length
    pub const MAX_USERNAME_LENGTH: usize = 20;

    /// Credentials file written by `auth setup`
    pub const ENV_FILE_NAME: &str = ".env";

    /// File permissions for .env file (Unix only) - owner read/write only
    #[cfg(unix)]
    pub const ENV_FILE_PERMISSIONS: u32 = 0o600;
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// User agent sent when `REDDIT_USER_AGENT` is not set
    pub const USER_AGENT: &str = "rust:reddit_fetcher:v0.1.0 (by /u/reddit_fetcher)";

    /// Upper bound applied to every upstream request
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

    /// Maximum connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 2;
}

/// Rate limiting configuration
pub mod limits {
    use super::Duration;

    /// Minimum spacing between upstream requests (API ceiling is 1 req/s)
    pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1100);
}

/// Reddit service URLs and endpoints
pub mod reddit {
    /// OAuth token endpoint
    pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

    /// Base URL for authenticated API requests
    pub const API_BASE_URL: &str = "https://oauth.reddit.com";

    /// Fullname prefix for link (post) things
    pub const LINK_PREFIX: &str = "t3_";
}

/// Listing retrieval policy
pub mod listing {
    /// Extra raw entries requested to survive filtering
    pub const OVERFETCH: usize = 5;

    /// Largest page the listing endpoint will return
    pub const MAX_PAGE_SIZE: usize = 100;

    /// Title markers identifying recurring moderator threads
    pub const META_MARKERS: [&str; 2] = ["open forum", "monthly discussion"];
}

/// Comment thread retrieval
pub mod thread {
    use super::Duration;

    /// Comments requested per thread page
    pub const COMMENT_PAGE_LIMIT: usize = 100;

    /// How long the coordinator waits for one item's comments
    pub const COMMENT_TIMEOUT: Duration = Duration::from_secs(5);
}

/// Logging and configuration file constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Configuration file locations
pub mod config {
    /// Project-local configuration file name
    pub const LOCAL_FILE_NAME: &str = "reddit-fetcher.toml";

    /// Directory under the user config dir
    pub const APP_DIR_NAME: &str = "reddit-fetcher";

    /// File name under the user config dir
    pub const FILE_NAME: &str = "config.toml";
}

// Re-export commonly used constants for convenience
pub use env::{
    CLIENT_ID as ENV_CLIENT_ID, CLIENT_SECRET as ENV_CLIENT_SECRET, PASSWORD as ENV_PASSWORD,
    USERNAME as ENV_USERNAME, USER_AGENT as ENV_USER_AGENT,
};
pub use http::{DEFAULT_TIMEOUT as HTTP_TIMEOUT, USER_AGENT};
pub use limits::MIN_REQUEST_INTERVAL;
pub use reddit::{API_BASE_URL, TOKEN_URL};
pub use thread::COMMENT_TIMEOUT;
