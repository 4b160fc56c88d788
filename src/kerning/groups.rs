//! Kerning group direction buckets

use crate::kerning::direction::GlyphDirections;
use crate::kerning::table::KerningGroups;

/// The groups of one side, split by writing direction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifiedGroups {
    pub ltr: KerningGroups,
    pub neutral: KerningGroups,
    pub rtl: KerningGroups,
}

/// A group is LTR if it has an LTR glyph and no RTL glyph, RTL the other way
/// around, and neutral when it has both or neither.
pub fn classify_groups_by_direction(
    groups: &KerningGroups,
    directions: &GlyphDirections,
) -> ClassifiedGroups {
    let mut classified = ClassifiedGroups::default();

    for (group_name, glyph_names) in groups {
        let is_ltr = glyph_names.iter().any(|glyph| directions.is_ltr(glyph));
        let is_rtl = glyph_names.iter().any(|glyph| directions.is_rtl(glyph));

        let bucket = match (is_ltr, is_rtl) {
            (true, false) => &mut classified.ltr,
            (false, true) => &mut classified.rtl,
            _ => &mut classified.neutral,
        };
        bucket.insert(group_name.clone(), glyph_names.clone());
    }

    classified
}
