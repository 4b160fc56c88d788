//! Merging feature code of two fonts

use crate::error::{FontMergeError, Result};
use crate::font_source::GlyphMap;

/// Combines the feature code of two fonts.
///
/// Returns the merged feature text together with the glyph map it is valid
/// for; the merger checks that this glyph map covers exactly the merged
/// glyph set.
pub trait FeatureMerger: Send + Sync {
    fn merge_features(
        &self,
        text_a: &str,
        glyph_map_a: &GlyphMap,
        text_b: &str,
        glyph_map_b: &GlyphMap,
    ) -> Result<(String, GlyphMap)>;
}

/// Appends the feature code of B after the feature code of A.
///
/// Sufficient when both fonts use disjoint class and lookup names; feature
/// blocks for the same tag are merged by the feature compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConcatFeatureMerger;

impl FeatureMerger for ConcatFeatureMerger {
    fn merge_features(
        &self,
        text_a: &str,
        glyph_map_a: &GlyphMap,
        text_b: &str,
        glyph_map_b: &GlyphMap,
    ) -> Result<(String, GlyphMap)> {
        if has_include(text_a) || has_include(text_b) {
            return Err(FontMergeError::FeatureMerge(
                "feature code with include statements can't be concatenated".to_string(),
            ));
        }

        let mut text = text_a.trim_end().to_string();
        text.push_str("\n\n");
        text.push_str(text_b.trim_end());
        text.push('\n');

        let mut glyph_map = glyph_map_a.clone();
        glyph_map.extend(glyph_map_b.iter().map(|(name, codes)| (name.clone(), codes.clone())));
        Ok((text, glyph_map))
    }
}

fn has_include(text: &str) -> bool {
    text.lines()
        .any(|line| line.trim_start().starts_with("include"))
}
