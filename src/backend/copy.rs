//! Reading a whole font out of a backend

use crate::backend::ReadableFontBackend;
use crate::error::Result;
use crate::font_source::Font;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Query every part of `backend` and collect it into one [`Font`].
///
/// Glyphs listed in the glyph map but not returned by the backend are
/// skipped with a warning.
pub async fn read_full_font(backend: &dyn ReadableFontBackend) -> Result<Font> {
    let glyph_map = backend.get_glyph_map().await?;

    let mut glyphs = BTreeMap::new();
    for glyph_name in glyph_map.keys() {
        match backend.get_glyph(glyph_name).await? {
            Some(glyph) => {
                glyphs.insert(glyph_name.clone(), glyph);
            }
            None => warn!("Glyph '{glyph_name}' is in the glyph map but has no data"),
        }
    }
    debug!("Read {} of {} glyphs", glyphs.len(), glyph_map.len());

    let font = Font {
        units_per_em: backend.get_units_per_em().await?,
        font_info: backend.get_font_info().await?,
        glyphs,
        glyph_map,
        axes: backend.get_axes().await?,
        sources: backend.get_sources().await?,
        kerning: backend.get_kerning().await?,
        features: backend.get_features().await?,
        custom_data: backend.get_custom_data().await?,
    };
    info!(
        "Collected font with {} glyphs, {} sources and {} kerning tables",
        font.glyph_map.len(),
        font.sources.len(),
        font.kerning.len()
    );
    Ok(font)
}
