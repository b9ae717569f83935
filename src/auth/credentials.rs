//! Reddit script-app credential management
//!
//! Credentials come from five environment variables, usually populated from a
//! `.env` file. This module loads them, reports which are present, prompts for
//! them interactively and stores them back with owner-only permissions.

use std::env;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use crate::app::client::{ClientConfig, RedditClient};
use crate::constants::{auth, env as env_constants, http};
use crate::errors::{AuthError, AuthResult};

/// Everything the password grant needs
#[derive(Clone, PartialEq, Eq)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub username: String,
    pub password: String,
    pub user_agent: String,
}

impl fmt::Debug for RedditCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedditCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl RedditCredentials {
    /// Reads credentials from the process environment
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingCredentials` naming the first required
    /// variable that is unset or empty.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads credentials through `lookup`, which maps a variable name to its value
    ///
    /// `REDDIT_USER_AGENT` is optional and falls back to a generic agent.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AuthError::MissingCredentials {
                    var: name.to_string(),
                })
        };

        Ok(Self {
            client_id: required(env_constants::CLIENT_ID)?,
            client_secret: required(env_constants::CLIENT_SECRET)?,
            username: required(env_constants::USERNAME)?,
            password: required(env_constants::PASSWORD)?,
            user_agent: lookup(env_constants::USER_AGENT)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| http::USER_AGENT.to_string()),
        })
    }

    /// The `.env` assignments for these credentials, in [`env_constants::ALL`] order
    fn assignments(&self) -> [(&'static str, &str); 5] {
        [
            (env_constants::CLIENT_ID, &self.client_id),
            (env_constants::CLIENT_SECRET, &self.client_secret),
            (env_constants::USERNAME, &self.username),
            (env_constants::PASSWORD, &self.password),
            (env_constants::USER_AGENT, &self.user_agent),
        ]
    }
}

/// Authentication status information
#[derive(Debug, Clone)]
pub struct AuthStatus {
    /// Required variables that are not set
    pub missing: Vec<&'static str>,
    /// Whether a custom user agent is configured
    pub user_agent_set: bool,
    /// Whether .env file exists in current directory
    pub dotenv_file_exists: bool,
    /// Whether credentials have been verified (None = not tested)
    pub credentials_valid: Option<bool>,
}

impl AuthStatus {
    /// Check if every required credential is available
    pub fn has_credentials(&self) -> bool {
        self.missing.is_empty()
    }

    /// Get descriptive status message for display
    pub fn status_message(&self) -> String {
        match (self.has_credentials(), self.credentials_valid) {
            (false, _) => format!(
                "Missing credentials ({}) - run 'auth setup' to configure",
                self.missing.join(", ")
            ),
            (true, None) => "Credentials configured but not verified".to_string(),
            (true, Some(true)) => "Credentials configured and verified".to_string(),
            (true, Some(false)) => "Credentials configured but invalid".to_string(),
        }
    }
}

/// Check current authentication status
pub fn get_auth_status() -> AuthStatus {
    let is_set = |name: &str| env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false);

    AuthStatus {
        missing: env_constants::ALL
            .iter()
            .copied()
            .filter(|name| *name != env_constants::USER_AGENT && !is_set(name))
            .collect(),
        user_agent_set: is_set(env_constants::USER_AGENT),
        dotenv_file_exists: Path::new(auth::ENV_FILE_NAME).exists(),
        credentials_valid: None,
    }
}

/// Check if every required credential exists in the environment
pub fn check_credentials() -> bool {
    get_auth_status().has_credentials()
}

fn read_line(prompt: &str) -> AuthResult<String> {
    print!("{}", prompt);
    io::stdout().flush().map_err(AuthError::CredentialStorage)?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .map_err(AuthError::CredentialStorage)?;
    Ok(line.trim().to_string())
}

fn read_secret(prompt: &str) -> AuthResult<String> {
    let secret = rpassword::prompt_password(prompt)
        .map_err(|e| AuthError::CredentialStorage(io::Error::new(io::ErrorKind::Other, e)))?;
    Ok(secret.trim().to_string())
}

fn non_empty(value: String, what: &str) -> AuthResult<String> {
    if value.is_empty() {
        return Err(AuthError::InvalidInput {
            reason: format!("{} cannot be empty", what),
        });
    }
    Ok(value)
}

/// Prompt user for credentials interactively
pub fn prompt_credentials() -> AuthResult<RedditCredentials> {
    println!("Create a \"script\" app at https://www.reddit.com/prefs/apps to obtain a client id and secret.");
    println!();

    let client_id = non_empty(read_line("Client ID: ")?, "Client ID")?;
    let client_secret = non_empty(read_secret("Client secret: ")?, "Client secret")?;

    let username = non_empty(read_line("Reddit username: ")?, "Username")?;
    if !is_valid_username(&username) {
        return Err(AuthError::InvalidInput {
            reason: format!(
                "Username should be {}-{} letters, digits, hyphens or underscores",
                auth::MIN_USERNAME_LENGTH,
                auth::MAX_USERNAME_LENGTH
            ),
        });
    }

    let password = non_empty(read_secret("Reddit password: ")?, "Password")?;

    let default_agent = default_user_agent(&username);
    let user_agent = read_line(&format!("User agent [{}]: ", default_agent))?;
    let user_agent = if user_agent.is_empty() {
        default_agent
    } else {
        user_agent
    };

    Ok(RedditCredentials {
        client_id,
        client_secret,
        username,
        password,
        user_agent,
    })
}

/// User agent in the `platform:app:version (by /u/name)` form Reddit asks for
fn default_user_agent(username: &str) -> String {
    format!(
        "rust:{}:v{} (by /u/{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        username
    )
}

fn is_valid_username(username: &str) -> bool {
    if username.len() < auth::MIN_USERNAME_LENGTH || username.len() > auth::MAX_USERNAME_LENGTH {
        return false;
    }

    username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Rewrites `existing` .env content with `credentials`, keeping unrelated lines
fn merge_env_content(existing: &str, credentials: &RedditCredentials) -> String {
    let assignments = credentials.assignments();
    let mut written = [false; 5];
    let mut lines = Vec::new();

    for line in existing.lines() {
        let trimmed = line.trim_start();
        let replaced = assignments
            .iter()
            .position(|(name, _)| trimmed.starts_with(&format!("{}=", name)));

        match replaced {
            Some(index) if !written[index] => {
                let (name, value) = assignments[index];
                lines.push(format!("{}={}", name, value));
                written[index] = true;
            }
            // Duplicate assignment of a credential we already wrote
            Some(_) => {}
            None => lines.push(line.to_string()),
        }
    }

    for (index, (name, value)) in assignments.iter().enumerate() {
        if !written[index] {
            lines.push(format!("{}={}", name, value));
        }
    }

    let mut content = lines.join("\n");
    content.push('\n');
    content
}

/// Save credentials to the given .env file with owner-only permissions
pub fn save_credentials_to(path: &Path, credentials: &RedditCredentials) -> AuthResult<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };

    let content = merge_env_content(&existing, credentials);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(content.as_bytes())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(auth::ENV_FILE_PERMISSIONS);
        file.set_permissions(perms)?;
    }

    Ok(())
}

/// Save credentials to `.env` in the current directory
pub fn save_credentials(credentials: &RedditCredentials) -> AuthResult<()> {
    save_credentials_to(Path::new(auth::ENV_FILE_NAME), credentials)?;

    println!("Credentials saved to {} file", auth::ENV_FILE_NAME);

    #[cfg(unix)]
    println!("File permissions set to owner-only (600)");

    #[cfg(not(unix))]
    println!(
        "Warning: File permissions not set (non-Unix system). Please ensure .env file is protected."
    );

    Ok(())
}

/// Verify credentials by performing a token exchange
///
/// Returns `Ok(false)` when Reddit refuses the credentials; only a
/// configuration problem is an error.
pub async fn verify_credentials(
    credentials: &RedditCredentials,
    config: &ClientConfig,
) -> AuthResult<bool> {
    println!("Verifying credentials with Reddit...");

    match RedditClient::new(credentials, config.clone()).await {
        Ok(client) => {
            println!(
                "Credentials verified successfully! Token valid until {}",
                client.credential().expires_at()
            );
            Ok(true)
        }
        Err(AuthError::InvalidInput { reason }) => Err(AuthError::InvalidInput { reason }),
        Err(e) => {
            println!("Credential verification failed: {}", e);
            Ok(false)
        }
    }
}

fn confirm(prompt: &str, default_yes: bool) -> AuthResult<bool> {
    let response = read_line(prompt)?.to_lowercase();
    Ok(if default_yes {
        !response.starts_with('n')
    } else {
        response.starts_with('y')
    })
}

/// Interactive credential setup workflow
pub async fn setup_credentials(config: &ClientConfig) -> AuthResult<()> {
    println!("Reddit Authentication Setup");
    println!("===========================");
    println!();
    println!("This will configure the Reddit script-app credentials used for API access.");
    println!(
        "Your credentials will be stored in a {} file in the current directory.",
        auth::ENV_FILE_NAME
    );
    println!();

    if check_credentials() {
        println!("Warning: Credentials are already configured.");
        if !confirm("Do you want to update them? [y/N]: ", false)? {
            println!("Setup cancelled.");
            return Ok(());
        }
        println!();
    }

    let credentials = prompt_credentials()?;

    println!();
    println!("Saving credentials...");
    save_credentials(&credentials)?;

    println!();
    if verify_credentials(&credentials, config).await? {
        println!();
        println!("Setup complete! You can now fetch listings.");
    } else {
        println!();
        println!("Setup failed. Please check your credentials and try again.");
        println!("   You can run 'auth setup' again to re-enter your credentials.");
    }

    Ok(())
}

/// Show current authentication status
pub async fn show_auth_status(config: &ClientConfig) -> AuthResult<()> {
    let mut status = get_auth_status();

    println!("Reddit Authentication Status");
    println!("============================");
    println!();

    for name in env_constants::ALL {
        let state = match env::var(name) {
            Ok(value) if name == env_constants::USERNAME || name == env_constants::USER_AGENT => {
                format!("{} (set)", value)
            }
            Ok(_) => "Set".to_string(),
            Err(_) if name == env_constants::USER_AGENT => {
                format!("Not set (default: {})", http::USER_AGENT)
            }
            Err(_) => "Not set".to_string(),
        };
        println!("{}: {}", name, state);
    }

    println!(
        "{} file: {}",
        auth::ENV_FILE_NAME,
        if status.dotenv_file_exists {
            "Exists"
        } else {
            "Not found"
        }
    );
    println!();

    if status.has_credentials() {
        let credentials = RedditCredentials::from_env()?;
        println!("Testing credentials...");
        status.credentials_valid = Some(verify_credentials(&credentials, config).await?);
        println!();
    }

    println!("Status: {}", status.status_message());

    if !status.has_credentials() {
        println!();
        println!("To configure credentials, run: reddit_fetcher auth setup");
    } else if status.credentials_valid == Some(false) {
        println!();
        println!("To update credentials, run: reddit_fetcher auth setup");
    }

    Ok(())
}

/// Load credentials, offering interactive setup when some are missing
pub async fn ensure_authenticated(config: &ClientConfig) -> AuthResult<RedditCredentials> {
    if let Ok(credentials) = RedditCredentials::from_env() {
        return Ok(credentials);
    }

    println!("This command requires Reddit API credentials.");
    println!();

    if !confirm("Would you like to set up authentication now? [Y/n]: ", true)? {
        return RedditCredentials::from_env();
    }

    println!();
    let credentials = prompt_credentials()?;
    save_credentials(&credentials)?;

    if !verify_credentials(&credentials, config).await? {
        return Err(AuthError::InvalidInput {
            reason: "Reddit rejected the supplied credentials".to_string(),
        });
    }

    Ok(credentials)
}
