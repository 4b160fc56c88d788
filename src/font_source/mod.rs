//! Font source data structures
//!
//! This module contains the interchange data model for a whole font:
//! info, axes, sources, glyphs and features. Kerning lives in
//! [`crate::kerning`].

pub mod axes;
pub mod data;
pub mod location;

// Explicit re-exports for public API
pub use axes::{AxisKind, AxisValueLabel, Axes, CrossAxisMapping, DiscreteFontAxis, FontAxis};
pub use data::{
    CustomData, Font, FontInfo, FontSource, GlyphAxis, GlyphMap, GlyphSource, Guideline,
    ImageData, ImageType, LineMetric, OpenTypeFeatures, VariableGlyph, FEA_LANGUAGE,
};
pub use location::{Location, LocationKey};
