//! Font backends
//!
//! A backend is anything that can answer the read queries of
//! [`ReadableFontBackend`]. Everything in this crate that consumes fonts,
//! the merger included, goes through that trait, so merged fonts can be
//! merged again or written out like any other font.

pub mod copy;
pub mod features;
pub mod json;
pub mod memory;
pub mod merger;
pub mod null;
pub mod ufo;

use crate::error::{FontMergeError, Result};
use crate::font_source::{
    Axes, CustomData, FontInfo, FontSource, GlyphMap, ImageData, OpenTypeFeatures, VariableGlyph,
};
use crate::kerning::KerningTable;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::path::Path;

pub use copy::read_full_font;
pub use features::{ConcatFeatureMerger, FeatureMerger};
pub use memory::MemoryBackend;
pub use merger::FontBackendMerger;
pub use null::NullBackend;

/// Read access to one font.
#[async_trait]
pub trait ReadableFontBackend: Send + Sync {
    async fn get_glyph(&self, glyph_name: &str) -> Result<Option<VariableGlyph>>;

    async fn get_font_info(&self) -> Result<FontInfo>;

    async fn get_axes(&self) -> Result<Axes>;

    /// Sources keyed by source identifier, in the font's own order.
    async fn get_sources(&self) -> Result<IndexMap<String, FontSource>>;

    async fn get_glyph_map(&self) -> Result<GlyphMap>;

    /// Kerning tables keyed by kern type.
    async fn get_kerning(&self) -> Result<BTreeMap<String, KerningTable>>;

    async fn get_features(&self) -> Result<OpenTypeFeatures>;

    async fn get_custom_data(&self) -> Result<CustomData>;

    async fn get_units_per_em(&self) -> Result<u32>;

    async fn get_background_image(&self, _image_identifier: &str) -> Result<Option<ImageData>> {
        Ok(None)
    }

    /// True for backends that stand in for "no font at all".
    fn is_placeholder(&self) -> bool {
        false
    }
}

/// Open a font file as a backend, picking the reader by extension.
///
/// `.json` files are font interchange documents, `.ufo` directories are
/// read through norad.
pub async fn open_font_backend(path: &Path) -> Result<Box<dyn ReadableFontBackend>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    let font = match extension.as_deref() {
        Some("json") => json::load_font(path).await?,
        Some("ufo") => {
            let path = path.to_path_buf();
            tokio::task::spawn_blocking(move || ufo::load_ufo(&path)).await??
        }
        _ => return Err(FontMergeError::UnsupportedFormat(path.to_path_buf())),
    };
    Ok(Box::new(MemoryBackend::new(font)))
}
