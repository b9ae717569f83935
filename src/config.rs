//! Configuration management for Reddit Fetcher
//!
//! This module provides TOML configuration with zero-config defaults. Every
//! section is optional; missing keys take their default value. Durations are
//! written in humantime form (`"1100ms"`, `"5s"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use humantime_serde::re::humantime;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::{AuthConfig, ClientConfig, CoordinatorConfig, ListingConfig};
use crate::constants::{
    auth, config as config_constants, http, limits, listing, logging, reddit, thread,
};
use crate::errors::{ConfigError, ConfigResult};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP client and transport settings
    pub client: ClientConfigToml,
    /// Token exchange settings
    pub auth: AuthConfigToml,
    /// Listing filter settings
    pub listing: ListingConfigToml,
    /// Batch coordinator settings
    pub coordinator: CoordinatorConfigToml,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// TOML-friendly client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfigToml {
    /// Base URL for authenticated API requests
    pub api_base_url: String,
    /// OAuth token endpoint
    pub token_url: String,
    /// Timeout applied to every API request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Minimum spacing between API requests
    #[serde(with = "humantime_serde")]
    pub min_request_interval: Duration,
    /// TCP nodelay setting
    pub tcp_nodelay: bool,
    /// Connection pool idle timeout
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections per host
    pub pool_max_per_host: usize,
}

impl Default for ClientConfigToml {
    fn default() -> Self {
        Self {
            api_base_url: reddit::API_BASE_URL.to_string(),
            token_url: reddit::TOKEN_URL.to_string(),
            request_timeout: http::DEFAULT_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            min_request_interval: limits::MIN_REQUEST_INTERVAL,
            tcp_nodelay: true,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
        }
    }
}

/// TOML-friendly token exchange configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthConfigToml {
    /// Maximum attempts, first one included
    pub max_attempts: u32,
    /// Backoff unit multiplied into `2^attempt + jitter`
    #[serde(with = "humantime_serde")]
    pub backoff_unit: Duration,
    /// Timeout for a single token request
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
}

impl Default for AuthConfigToml {
    fn default() -> Self {
        Self {
            max_attempts: auth::MAX_ATTEMPTS,
            backoff_unit: auth::BACKOFF_UNIT,
            request_timeout: auth::REQUEST_TIMEOUT,
        }
    }
}

/// TOML-friendly listing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListingConfigToml {
    /// Extra raw entries requested beyond the caller's limit
    pub overfetch: usize,
    /// Title markers of moderator threads to drop (case-insensitive)
    pub meta_markers: Vec<String>,
}

impl Default for ListingConfigToml {
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

/// TOML-friendly coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoordinatorConfigToml {
    /// How long to wait for one item's comments
    #[serde(with = "humantime_serde")]
    pub comment_timeout: Duration,
    /// Enable progress bar display
    pub enable_progress_bar: bool,
    /// Enable verbose logging
    pub verbose_logging: bool,
}

impl Default for CoordinatorConfigToml {
    fn default() -> Self {
        Self {
            comment_timeout: thread::COMMENT_TIMEOUT,
            enable_progress_bar: true,
            verbose_logging: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            colored_output: true,
        }
    }
}

impl AppConfig {
    /// Convert to validated runtime configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any section fails validation.
    pub fn to_runtime_config(&self) -> ConfigResult<(ClientConfig, CoordinatorConfig)> {
        let client = ClientConfig {
            api_base_url: self.client.api_base_url.clone(),
            token_url: self.client.token_url.clone(),
            request_timeout: self.client.request_timeout,
            connect_timeout: self.client.connect_timeout,
            min_request_interval: self.client.min_request_interval,
            tcp_nodelay: self.client.tcp_nodelay,
            pool_idle_timeout: Some(self.client.pool_idle_timeout),
            pool_max_per_host: self.client.pool_max_per_host,
            auth: AuthConfig {
                max_attempts: self.auth.max_attempts,
                backoff_unit: self.auth.backoff_unit,
                request_timeout: self.auth.request_timeout,
            },
            listing: ListingConfig {
                overfetch: self.listing.overfetch,
                meta_markers: self
                    .listing
                    .meta_markers
                    .iter()
                    .map(|marker| marker.trim().to_lowercase())
                    .filter(|marker| !marker.is_empty())
                    .collect(),
            },
        };
        client.validate().map_err(|reason| ConfigError::InvalidValue {
            field: "client".to_string(),
            reason,
        })?;

        let coordinator = CoordinatorConfig {
            comment_timeout: self.coordinator.comment_timeout,
            enable_progress_bar: self.coordinator.enable_progress_bar,
            verbose_logging: self.coordinator.verbose_logging,
        };
        coordinator
            .validate()
            .map_err(|reason| ConfigError::InvalidValue {
                field: "coordinator".to_string(),
                reason,
            })?;

        Ok((client, coordinator))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, the first existing file of
    /// `./reddit-fetcher.toml` and `<config_dir>/reddit-fetcher/config.toml` is
    /// used, falling back to defaults.
    pub async fn load(config_file_override: Option<PathBuf>) -> ConfigResult<Self> {
        let config_path = match config_file_override {
            Some(path) if path.exists() => Some(path),
            Some(path) => return Err(ConfigError::NotFound { path }),
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from(config_constants::LOCAL_FILE_NAME)];
        if let Ok(user_path) = Self::get_default_config_path() {
            search_paths.push(user_path);
        }

        let found = search_paths.into_iter().find(|path| path.exists());
        if let Some(path) = &found {
            debug!("Found config file: {}", path.display());
        }
        found
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> ConfigResult<PathBuf> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;

        Ok(config_dir
            .join(config_constants::APP_DIR_NAME)
            .join(config_constants::FILE_NAME))
    }

    /// Load configuration from a TOML file
    pub async fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: AppConfig = toml::from_str(&content)?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Write the commented default configuration
    ///
    /// Writes to `path`, or the user config path when `None`. Refuses to
    /// replace an existing file unless `force` is set.
    pub async fn write_default(path: Option<PathBuf>, force: bool) -> ConfigResult<PathBuf> {
        let config_path = match path {
            Some(path) => path,
            None => Self::get_default_config_path()?,
        };

        if config_path.exists() && !force {
            return Err(ConfigError::AlreadyExists { path: config_path });
        }

        if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        tokio::fs::write(&config_path, Self::generate_default_config_content())
            .await
            .map_err(|source| ConfigError::Io {
                path: config_path.clone(),
                source,
            })?;

        info!("Wrote default configuration to {}", config_path.display());
        Ok(config_path)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        let markers = listing::META_MARKERS
            .iter()
            .map(|marker| format!("\"{}\"", marker))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"# Reddit Fetcher Configuration
# Credentials are not stored here; set REDDIT_CLIENT_ID, REDDIT_CLIENT_SECRET,
# REDDIT_USERNAME, REDDIT_PASSWORD and REDDIT_USER_AGENT in the environment
# or run `reddit_fetcher auth setup`.

[client]
api_base_url = "{api_base}"
token_url = "{token_url}"
request_timeout = "{request_timeout}"
connect_timeout = "{connect_timeout}"
# Reddit allows roughly one request per second per client
min_request_interval = "{interval}"
tcp_nodelay = true
pool_idle_timeout = "{pool_idle}"
pool_max_per_host = {pool_max}

[auth]
# Token requests are retried with exponential backoff only on HTTP 429
max_attempts = {max_attempts}
backoff_unit = "{backoff_unit}"
request_timeout = "{auth_timeout}"

[listing]
# Extra posts requested so that filtering still leaves enough results
overfetch = {overfetch}
meta_markers = [{markers}]

[coordinator]
comment_timeout = "{comment_timeout}"
enable_progress_bar = true
verbose_logging = false

[logging]
level = "{level}"  # error, warn, info, debug, trace
colored_output = true
"#,
            api_base = reddit::API_BASE_URL,
            token_url = reddit::TOKEN_URL,
            request_timeout = humantime::format_duration(http::DEFAULT_TIMEOUT),
            connect_timeout = humantime::format_duration(http::CONNECT_TIMEOUT),
            interval = humantime::format_duration(limits::MIN_REQUEST_INTERVAL),
            pool_idle = humantime::format_duration(http::POOL_IDLE_TIMEOUT),
            pool_max = http::POOL_MAX_PER_HOST,
            max_attempts = auth::MAX_ATTEMPTS,
            backoff_unit = humantime::format_duration(auth::BACKOFF_UNIT),
            auth_timeout = humantime::format_duration(auth::REQUEST_TIMEOUT),
            overfetch = listing::OVERFETCH,
            markers = markers,
            comment_timeout = humantime::format_duration(thread::COMMENT_TIMEOUT),
            level = logging::DEFAULT_LOG_LEVEL,
        )
    }
}
