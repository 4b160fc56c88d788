//! A backend that serves a font held entirely in memory

use crate::backend::ReadableFontBackend;
use crate::error::Result;
use crate::font_source::{
    Axes, CustomData, Font, FontInfo, FontSource, GlyphMap, ImageData, OpenTypeFeatures,
    VariableGlyph,
};
use crate::kerning::KerningTable;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    font: Font,
    images: BTreeMap<String, ImageData>,
}

impl MemoryBackend {
    pub fn new(font: Font) -> Self {
        Self {
            font,
            images: BTreeMap::new(),
        }
    }

    pub fn with_background_image(mut self, identifier: impl Into<String>, image: ImageData) -> Self {
        self.images.insert(identifier.into(), image);
        self
    }
}

#[async_trait]
impl ReadableFontBackend for MemoryBackend {
    async fn get_glyph(&self, glyph_name: &str) -> Result<Option<VariableGlyph>> {
        Ok(self.font.glyphs.get(glyph_name).cloned())
    }

    async fn get_font_info(&self) -> Result<FontInfo> {
        Ok(self.font.font_info.clone())
    }

    async fn get_axes(&self) -> Result<Axes> {
        Ok(self.font.axes.clone())
    }

    async fn get_sources(&self) -> Result<IndexMap<String, FontSource>> {
        Ok(self.font.sources.clone())
    }

    async fn get_glyph_map(&self) -> Result<GlyphMap> {
        Ok(self.font.glyph_map.clone())
    }

    async fn get_kerning(&self) -> Result<BTreeMap<String, KerningTable>> {
        Ok(self.font.kerning.clone())
    }

    async fn get_features(&self) -> Result<OpenTypeFeatures> {
        Ok(self.font.features.clone())
    }

    async fn get_custom_data(&self) -> Result<CustomData> {
        Ok(self.font.custom_data.clone())
    }

    async fn get_units_per_em(&self) -> Result<u32> {
        Ok(self.font.units_per_em)
    }

    async fn get_background_image(&self, image_identifier: &str) -> Result<Option<ImageData>> {
        Ok(self.images.get(image_identifier).cloned())
    }
}
