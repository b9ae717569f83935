//! Command-line interface components
//!
//! This module contains CLI-specific code for the Reddit Fetcher application:
//! argument parsing and the command handlers.

pub mod args;
pub mod commands;

pub use args::{
    AuthAction, AuthArgs, Cli, Commands, ConfigAction, ConfigArgs, GlobalArgs, PostArgs, TopArgs,
};
pub use commands::{handle_auth, handle_config, handle_post, handle_top};
