//! Core application functionality
//!
//! This module contains the command line front end:
//! - CLI parsing and validation
//! - Configuration and settings resolution
//! - The subcommand implementations and the runner that drives them

pub mod cli;
pub mod commands;
pub mod config;
pub mod platform;
pub mod runner;

// Re-export commonly used items
pub use cli::{CliArgs, Command};
pub use config::{ConfigFile, Settings};
pub use runner::run_app;
