//! Command line interface for fontmerge
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// fontmerge CLI arguments
///
/// Examples:
///   fontmerge merge Latin.ufo Arabic.json -o Merged.json
///   fontmerge split-kerning Font.json -o split.json --flip-rtl
///   fontmerge flip-kerning Font.json --kern-type kern -o flipped.json
///   fontmerge classify Font.ufo
///   fontmerge init-config
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "fontmerge",
    version,
    about = "Merge font sources and split, flip and merge their kerning",
    long_about = "fontmerge merges two font sources into one, combining glyphs, axes, sources, kerning and features. It also splits kerning into LTR and RTL tables and flips kerning direction. Inputs are .json font documents or .ufo directories."
)]
pub struct CliArgs {
    #[clap(subcommand)]
    pub command: Command,

    /// Log level for fontmerge messages (error, warn, info, debug, trace)
    #[clap(
        long = "log-level",
        global = true,
        help = "Log level (overrides settings.json; RUST_LOG overrides both)"
    )]
    pub log_level: Option<String>,

    /// Also write logs to ~/.config/fontmerge/logs/
    #[clap(long = "log-file", global = true, help = "Also write logs to a daily log file")]
    pub log_file: bool,

    /// Write indented JSON
    #[clap(long = "pretty", global = true, conflicts_with = "compact")]
    pub pretty: bool,

    /// Write JSON without whitespace
    #[clap(long = "compact", global = true)]
    pub compact: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Merge font B into font A; B wins where both define something
    Merge {
        #[clap(help = "Base font (A)")]
        input_a: PathBuf,
        #[clap(help = "Font merged on top (B)")]
        input_b: PathBuf,
        #[clap(long = "output", short = 'o', help = "Output .json font document")]
        output: PathBuf,
        #[clap(
            long = "no-duplicate-warnings",
            help = "Don't warn about glyphs present in both fonts"
        )]
        no_duplicate_warnings: bool,
    },

    /// Split kerning into LTR and RTL tables
    SplitKerning {
        font: PathBuf,
        #[clap(long = "kern-type", help = "Kern type to split (default: kern)")]
        kern_type: Option<String>,
        #[clap(long = "output", short = 'o')]
        output: PathBuf,
        #[clap(long = "flip-rtl", help = "Store the RTL table with sides swapped")]
        flip_rtl: bool,
    },

    /// Swap side 1 and side 2 of a kerning table
    FlipKerning {
        font: PathBuf,
        #[clap(long = "kern-type", help = "Kern type to flip (default: kern)")]
        kern_type: Option<String>,
        #[clap(long = "output", short = 'o')]
        output: PathBuf,
    },

    /// Print the LTR and RTL glyph sets of a font as JSON
    Classify { font: PathBuf },

    /// Create ~/.config/fontmerge with a default settings.json
    InitConfig,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// Checks that inputs exist and that no output would overwrite an input,
    /// so mistakes are reported before any work starts.
    pub fn validate(&self) -> Result<(), String> {
        let (inputs, output): (Vec<&Path>, Option<&Path>) = match &self.command {
            Command::Merge {
                input_a,
                input_b,
                output,
                ..
            } => (vec![input_a.as_path(), input_b.as_path()], Some(output.as_path())),
            Command::SplitKerning { font, output, .. } | Command::FlipKerning { font, output, .. } => {
                (vec![font.as_path()], Some(output.as_path()))
            }
            Command::Classify { font } => (vec![font.as_path()], None),
            Command::InitConfig => (vec![], None),
        };

        for input in &inputs {
            if !input.exists() {
                return Err(format!(
                    "Font source does not exist: {}\nMake sure the path is correct and the file exists.",
                    input.display()
                ));
            }
            if input.is_dir() && !input.join("metainfo.plist").exists() {
                return Err(format!(
                    "Not a valid UFO directory: missing metainfo.plist in {}",
                    input.display()
                ));
            }
        }

        if let Some(output) = output {
            if inputs.iter().any(|input| *input == output) {
                return Err(format!(
                    "Refusing to overwrite input: {}\nChoose a different output path.",
                    output.display()
                ));
            }
        }

        Ok(())
    }

    /// `Some(true)` for `--pretty`, `Some(false)` for `--compact`
    pub fn pretty_output(&self) -> Option<bool> {
        match (self.pretty, self.compact) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
