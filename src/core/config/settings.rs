//! Resolved run settings
//!
//! Priority order for every setting:
//! 1. CLI argument
//! 2. Config file setting (~/.config/fontmerge/settings.json)
//! 3. Built-in default

use crate::core::cli::{CliArgs, Command};
use crate::core::config::ConfigFile;
use tracing::debug;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_KERN_TYPE: &str = "kern";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub log_level: String,
    pub log_to_file: bool,
    pub warn_about_duplicates: bool,
    pub kern_type: String,
    pub pretty_output: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_to_file: false,
            warn_about_duplicates: true,
            kern_type: DEFAULT_KERN_TYPE.to_string(),
            pretty_output: true,
        }
    }
}

impl Settings {
    pub fn resolve(cli_args: &CliArgs, config: Option<&ConfigFile>) -> Self {
        let defaults = Settings::default();
        let config = config.cloned().unwrap_or_default();

        let cli_kern_type = match &cli_args.command {
            Command::SplitKerning { kern_type, .. } | Command::FlipKerning { kern_type, .. } => {
                kern_type.clone()
            }
            _ => None,
        };
        let cli_duplicate_warnings = match &cli_args.command {
            Command::Merge {
                no_duplicate_warnings: true,
                ..
            } => Some(false),
            _ => None,
        };

        let settings = Settings {
            log_level: cli_args
                .log_level
                .clone()
                .or(config.log_level)
                .unwrap_or(defaults.log_level),
            log_to_file: cli_args.log_file,
            warn_about_duplicates: cli_duplicate_warnings
                .or(config.warn_about_duplicates)
                .unwrap_or(defaults.warn_about_duplicates),
            kern_type: cli_kern_type
                .or(config.default_kern_type)
                .unwrap_or(defaults.kern_type),
            pretty_output: cli_args
                .pretty_output()
                .or(config.pretty_output)
                .unwrap_or(defaults.pretty_output),
        };
        debug!("Resolved settings: {:?}", settings);
        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(argv: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("fontmerge").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_without_config() {
        let settings = Settings::resolve(&args(&["classify", "font.json"]), None);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn config_overrides_defaults() {
        let config = ConfigFile {
            log_level: Some("debug".into()),
            warn_about_duplicates: Some(false),
            default_kern_type: Some("vkrn".into()),
            pretty_output: Some(false),
        };
        let settings = Settings::resolve(&args(&["flip-kerning", "f.json", "-o", "o.json"]), Some(&config));
        assert_eq!(settings.log_level, "debug");
        assert!(!settings.warn_about_duplicates);
        assert_eq!(settings.kern_type, "vkrn");
        assert!(!settings.pretty_output);
    }

    #[test]
    fn cli_overrides_config() {
        let config = ConfigFile {
            log_level: Some("debug".into()),
            warn_about_duplicates: Some(true),
            default_kern_type: Some("vkrn".into()),
            pretty_output: Some(false),
        };

        let merge = args(&[
            "--log-level", "warn", "--pretty", "merge", "a.json", "b.json", "-o", "o.json",
            "--no-duplicate-warnings",
        ]);
        let settings = Settings::resolve(&merge, Some(&config));
        assert_eq!(settings.log_level, "warn");
        assert!(!settings.warn_about_duplicates);
        assert!(settings.pretty_output);

        let split = args(&["split-kerning", "f.json", "--kern-type", "kern", "-o", "o.json"]);
        assert_eq!(Settings::resolve(&split, Some(&config)).kern_type, "kern");
    }
}
