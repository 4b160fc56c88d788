//! Font interchange documents on disk
//!
//! A whole [`Font`] serialized as one JSON document. Kerning tables are
//! validated on load so that broken documents fail early with the kern type
//! in the error.

use crate::error::{FontMergeError, Result};
use crate::font_source::Font;
use serde::Serialize;
use std::path::Path;
use tracing::debug;

pub async fn load_font(path: &Path) -> Result<Font> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| FontMergeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let font: Font = serde_json::from_slice(&bytes).map_err(|source| FontMergeError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    validate_kerning(&font)?;
    debug!(
        "Loaded {} glyphs and {} kerning tables from {}",
        font.glyphs.len(),
        font.kerning.len(),
        path.display()
    );
    Ok(font)
}

pub fn validate_kerning(font: &Font) -> Result<()> {
    for (kern_type, table) in &font.kerning {
        table
            .validate()
            .map_err(|reason| FontMergeError::InvalidKerning {
                kern_type: kern_type.clone(),
                reason,
            })?;
    }
    Ok(())
}

/// Write any serializable value as JSON, creating parent directories.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, pretty: bool) -> Result<()> {
    let io_error = |source| FontMergeError::Io {
        path: path.to_path_buf(),
        source,
    };
    let json_error = |source| FontMergeError::Json {
        path: path.to_path_buf(),
        source,
    };

    let mut bytes = if pretty {
        serde_json::to_vec_pretty(value).map_err(json_error)?
    } else {
        serde_json::to_vec(value).map_err(json_error)?
    };
    bytes.push(b'\n');

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_error)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_error)
}

pub async fn write_font(path: &Path, font: &Font, pretty: bool) -> Result<()> {
    write_json(path, font, pretty).await
}
