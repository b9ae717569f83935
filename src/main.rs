//! Reddit Fetcher CLI application
//!
//! Command-line interface for fetching a subreddit's top posts and their
//! comments through the rate-limited OAuth API.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use reddit_fetcher::cli::{handle_auth, handle_config, handle_post, handle_top, Cli, Commands};
use reddit_fetcher::config::AppConfig;
use reddit_fetcher::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("Reddit Fetcher v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Top(args) => {
            info!("Executing top command for r/{}", args.subreddit);
            handle_top(args, &cli.global, &config).await
        }
        Commands::Post(args) => {
            info!("Executing post command for {}", args.id);
            handle_post(args, &cli.global, &config).await
        }
        Commands::Auth(args) => {
            info!("Executing auth command");
            handle_auth(args, &config).await
        }
        Commands::Config(args) => handle_config(args, &config).await,
    }
}

/// Initialize logging from CLI verbosity, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let level = cli
        .log_level()
        .map(|level| level.to_string().to_lowercase())
        .unwrap_or_else(|| config.logging.level.clone());

    let mut filter = EnvFilter::from_default_env();
    match format!("reddit_fetcher={}", level).parse() {
        Ok(directive) => filter = filter.add_directive(directive),
        Err(e) => eprintln!("Ignoring invalid log level {:?}: {}", level, e),
    }

    // Logs go to stderr so stdout stays valid JSON
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(config.logging.colored_output && atty::is(atty::Stream::Stderr))
        .with_level(true)
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}
