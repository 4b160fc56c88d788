//! Kerning direction and merge engine
//!
//! This module contains everything that operates on kerning tables:
//! - The table data model and its flat/nested forms
//! - Glyph and group classification by writing direction
//! - Splitting a table into LTR and RTL tables, and flipping side roles
//! - Group name disambiguation and the two merge variants
//! - Subsetting kerning to a glyph set

pub mod direction;
pub mod disambiguate;
pub mod groups;
pub mod merge;
pub mod split;
pub mod subset;
pub mod substitutions;
pub mod table;

// Re-export commonly used items
pub use direction::{
    classify_glyphs_by_direction, BidiOracle, Direction, DirectionClassifier, GlyphDirections,
    UnicodeBidiOracle,
};
pub use disambiguate::{disambiguate_kerning_group_names, GroupNameStrategy};
pub use groups::{classify_groups_by_direction, ClassifiedGroups};
pub use merge::{merge_kern_tables, merge_kerning};
pub use split::{flip_kerning_direction, split_kerning_by_direction};
pub use subset::{subset_kern_table, subset_kerning};
pub use substitutions::{FeaCompiler, FeatureCompiler, SubstitutionTable};
pub use table::{KerningGroups, KerningTable, KerningValues, GROUP_MARKER};
