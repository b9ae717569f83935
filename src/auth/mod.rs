//! Credential management for the Reddit API
//!
//! This module loads Reddit script-app credentials from the environment and
//! provides the interactive setup, verification and status commands that
//! store them in a `.env` file.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reddit_fetcher::app::ClientConfig;
//! use reddit_fetcher::auth::{check_credentials, setup_credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! if !check_credentials() {
//!     println!("Setting up credentials...");
//!     setup_credentials(&ClientConfig::default()).await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod credentials;

pub use credentials::{
    check_credentials, ensure_authenticated, get_auth_status, prompt_credentials,
    save_credentials, save_credentials_to, setup_credentials, show_auth_status,
    verify_credentials, AuthStatus, RedditCredentials,
};
