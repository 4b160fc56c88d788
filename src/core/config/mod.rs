//! Configuration management
//!
//! This module handles all configuration aspects:
//! - User configuration files
//! - Resolving CLI arguments and config file into run settings

pub mod settings;
pub mod user_config;

pub use settings::{Settings, DEFAULT_KERN_TYPE, DEFAULT_LOG_LEVEL};
pub use user_config::ConfigFile;
