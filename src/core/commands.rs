//! Implementations of the CLI subcommands

use crate::backend::json::{write_font, write_json};
use crate::backend::{open_font_backend, read_full_font, FontBackendMerger};
use crate::core::cli::Command;
use crate::core::config::{ConfigFile, Settings};
use crate::error::FontMergeError;
use crate::font_source::{Font, FEA_LANGUAGE};
use crate::kerning::{
    classify_glyphs_by_direction, flip_kerning_direction, split_kerning_by_direction,
    GlyphDirections, KerningTable,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// The two tables written by `split-kerning`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitKerningOutput {
    pub ltr: KerningTable,
    pub rtl: KerningTable,
}

pub async fn run_command(command: Command, settings: &Settings) -> Result<()> {
    match command {
        Command::Merge {
            input_a,
            input_b,
            output,
            ..
        } => merge(&input_a, &input_b, &output, settings).await,
        Command::SplitKerning {
            font,
            output,
            flip_rtl,
            ..
        } => split_kerning(&font, &output, flip_rtl, settings).await,
        Command::FlipKerning { font, output, .. } => flip_kerning(&font, &output, settings).await,
        Command::Classify { font } => classify(&font, settings).await,
        Command::InitConfig => ConfigFile::initialize_config_directory(),
    }
}

async fn load_font(path: &Path) -> Result<Font> {
    let backend = open_font_backend(path)
        .await
        .with_context(|| format!("Failed to open font source {}", path.display()))?;
    let font = read_full_font(backend.as_ref())
        .await
        .with_context(|| format!("Failed to read font source {}", path.display()))?;
    Ok(font)
}

pub async fn merge(input_a: &Path, input_b: &Path, output: &Path, settings: &Settings) -> Result<()> {
    let backend_a = open_font_backend(input_a)
        .await
        .with_context(|| format!("Failed to open font source {}", input_a.display()))?;
    let backend_b = open_font_backend(input_b)
        .await
        .with_context(|| format!("Failed to open font source {}", input_b.display()))?;

    let merger = FontBackendMerger::new(backend_a, backend_b)
        .warn_about_duplicates(settings.warn_about_duplicates);
    let font = read_full_font(&merger)
        .await
        .context("Failed to merge fonts")?;

    write_font(output, &font, settings.pretty_output)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Wrote merged font to {}", output.display());
    Ok(())
}

fn kerning_table<'a>(font: &'a Font, kern_type: &str) -> Result<&'a KerningTable, FontMergeError> {
    font.kerning
        .get(kern_type)
        .ok_or_else(|| FontMergeError::MissingKernType(kern_type.to_string()))
}

/// Classify the glyphs of `font` using its own feature code.
pub fn font_directions(font: &Font) -> GlyphDirections {
    let feature_text = if font.features.language == FEA_LANGUAGE {
        font.features.text.as_str()
    } else {
        warn!(
            "Ignoring features in language '{}' for direction classification",
            font.features.language
        );
        ""
    };
    classify_glyphs_by_direction(&font.glyph_map, feature_text, &font.axes)
}

pub fn split_font_kerning(
    font: &Font,
    kern_type: &str,
    flip_rtl: bool,
) -> Result<SplitKerningOutput, FontMergeError> {
    let table = kerning_table(font, kern_type)?;
    let directions = font_directions(font);
    let (ltr, rtl) = split_kerning_by_direction(table, &directions);
    let rtl = if flip_rtl {
        flip_kerning_direction(&rtl)
    } else {
        rtl
    };
    info!(
        "Split {} pairs into {} LTR and {} RTL pairs",
        table.pair_count(),
        ltr.pair_count(),
        rtl.pair_count()
    );
    Ok(SplitKerningOutput { ltr, rtl })
}

pub async fn split_kerning(
    font_path: &Path,
    output: &Path,
    flip_rtl: bool,
    settings: &Settings,
) -> Result<()> {
    let font = load_font(font_path).await?;
    let split = split_font_kerning(&font, &settings.kern_type, flip_rtl)?;
    write_json(output, &split, settings.pretty_output)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

pub async fn flip_kerning(font_path: &Path, output: &Path, settings: &Settings) -> Result<()> {
    let font = load_font(font_path).await?;
    let flipped = flip_kerning_direction(kerning_table(&font, &settings.kern_type)?);
    write_json(output, &flipped, settings.pretty_output)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;
    Ok(())
}

pub async fn classify(font_path: &Path, settings: &Settings) -> Result<()> {
    let font = load_font(font_path).await?;
    let directions = font_directions(&font);
    let json = if settings.pretty_output {
        serde_json::to_string_pretty(&directions)?
    } else {
        serde_json::to_string(&directions)?
    };
    println!("{json}");
    Ok(())
}
