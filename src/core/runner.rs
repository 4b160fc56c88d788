//! Application runner logic
//!
//! Resolves settings, installs logging and drives the async command on a
//! tokio runtime.

use crate::core::cli::{CliArgs, Command};
use crate::core::commands::run_command;
use crate::core::config::{ConfigFile, Settings};
use crate::logging;
use anyhow::{Context, Result};
use tracing::warn;

/// Run fontmerge with the given CLI arguments.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    // init-config must work before any config exists
    if cli_args.command == Command::InitConfig {
        return ConfigFile::initialize_config_directory();
    }

    cli_args.validate().map_err(anyhow::Error::msg)?;

    let config = ConfigFile::load();
    let settings = Settings::resolve(&cli_args, config.as_ref().ok().and_then(Option::as_ref));
    let _log_guard = logging::init_logging(&settings.log_level, settings.log_to_file)
        .context("Failed to set up logging")?;
    if let Err(error) = &config {
        warn!("Ignoring user settings: {error:#}");
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(run_command(cli_args.command, &settings))
}
