//! The empty placeholder font

use crate::backend::ReadableFontBackend;
use crate::error::Result;
use crate::font_source::{
    Axes, CustomData, FontInfo, FontSource, GlyphMap, OpenTypeFeatures, VariableGlyph,
};
use crate::kerning::KerningTable;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::BTreeMap;

/// A font without any data. As the first input of a merger it yields the
/// second input unchanged, without a units-per-em warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBackend;

pub const NULL_UNITS_PER_EM: u32 = 1000;

#[async_trait]
impl ReadableFontBackend for NullBackend {
    async fn get_glyph(&self, _glyph_name: &str) -> Result<Option<VariableGlyph>> {
        Ok(None)
    }

    async fn get_font_info(&self) -> Result<FontInfo> {
        Ok(FontInfo::default())
    }

    async fn get_axes(&self) -> Result<Axes> {
        Ok(Axes::default())
    }

    async fn get_sources(&self) -> Result<IndexMap<String, FontSource>> {
        Ok(IndexMap::new())
    }

    async fn get_glyph_map(&self) -> Result<GlyphMap> {
        Ok(GlyphMap::new())
    }

    async fn get_kerning(&self) -> Result<BTreeMap<String, KerningTable>> {
        Ok(BTreeMap::new())
    }

    async fn get_features(&self) -> Result<OpenTypeFeatures> {
        Ok(OpenTypeFeatures::fea(""))
    }

    async fn get_custom_data(&self) -> Result<CustomData> {
        Ok(CustomData::new())
    }

    async fn get_units_per_em(&self) -> Result<u32> {
        Ok(NULL_UNITS_PER_EM)
    }

    fn is_placeholder(&self) -> bool {
        true
    }
}
