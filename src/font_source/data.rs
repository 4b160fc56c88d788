//! Interchange structures for font-level data
//!
//! Field names serialize in camelCase so the JSON documents match the
//! interchange format used by the editor's font sessions.

use crate::font_source::axes::Axes;
use crate::font_source::location::Location;
use crate::kerning::KerningTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form per-object data, keyed by reverse-domain strings.
pub type CustomData = BTreeMap<String, serde_json::Value>;

/// Glyph name to the code points it is encoded at.
pub type GlyphMap = BTreeMap<String, Vec<u32>>;

/// The only feature language that can be merged.
pub const FEA_LANGUAGE: &str = "fea";

/// Font-wide naming and licensing information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_major: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_minor: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trademark: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designer: Option<String>,
    #[serde(rename = "designerURL", skip_serializing_if = "Option::is_none")]
    pub designer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(rename = "manufacturerURL", skip_serializing_if = "Option::is_none")]
    pub manufacturer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_description: Option<String>,
    #[serde(rename = "licenseInfoURL", skip_serializing_if = "Option::is_none")]
    pub license_info_url: Option<String>,
    #[serde(rename = "vendorID", skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

impl FontInfo {
    /// Shallow union of two infos; fields set in `other` win.
    pub fn merged_with(&self, other: &FontInfo) -> FontInfo {
        fn pick<T: Clone>(a: &Option<T>, b: &Option<T>) -> Option<T> {
            b.clone().or_else(|| a.clone())
        }

        let mut custom_data = self.custom_data.clone();
        custom_data.extend(other.custom_data.clone());

        FontInfo {
            family_name: pick(&self.family_name, &other.family_name),
            version_major: pick(&self.version_major, &other.version_major),
            version_minor: pick(&self.version_minor, &other.version_minor),
            copyright: pick(&self.copyright, &other.copyright),
            trademark: pick(&self.trademark, &other.trademark),
            description: pick(&self.description, &other.description),
            sample_text: pick(&self.sample_text, &other.sample_text),
            designer: pick(&self.designer, &other.designer),
            designer_url: pick(&self.designer_url, &other.designer_url),
            manufacturer: pick(&self.manufacturer, &other.manufacturer),
            manufacturer_url: pick(&self.manufacturer_url, &other.manufacturer_url),
            license_description: pick(&self.license_description, &other.license_description),
            license_info_url: pick(&self.license_info_url, &other.license_info_url),
            vendor_id: pick(&self.vendor_id, &other.vendor_id),
            custom_data,
        }
    }
}

/// A single line metric (ascender, x-height, ...) of a source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineMetric {
    pub value: f64,
    #[serde(default)]
    pub zone: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Guideline {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
    pub locked: bool,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

/// One interpolation source of the font
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontSource {
    pub name: String,
    #[serde(default)]
    pub is_sparse: bool,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub line_metrics_horizontal_layout: BTreeMap<String, LineMetric>,
    #[serde(default)]
    pub line_metrics_vertical_layout: BTreeMap<String, LineMetric>,
    #[serde(default)]
    pub italic_angle: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub guidelines: Vec<Guideline>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenTypeFeatures {
    #[serde(default = "default_feature_language")]
    pub language: String,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

fn default_feature_language() -> String {
    FEA_LANGUAGE.to_string()
}

impl OpenTypeFeatures {
    pub fn fea(text: impl Into<String>) -> Self {
        Self {
            language: FEA_LANGUAGE.to_string(),
            text: text.into(),
            custom_data: CustomData::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphAxis {
    pub name: String,
    pub min_value: f64,
    pub default_value: f64,
    pub max_value: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphSource {
    pub name: String,
    pub layer_name: String,
    #[serde(default)]
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_base: Option<String>,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

/// A glyph with all of its sources and layers.
///
/// Layer contents are carried as opaque JSON; nothing in this crate looks
/// inside outlines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableGlyph {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axes: Vec<GlyphAxis>,
    #[serde(default)]
    pub sources: Vec<GlyphSource>,
    #[serde(default)]
    pub layers: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

impl VariableGlyph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            axes: Vec::new(),
            sources: Vec::new(),
            layers: BTreeMap::new(),
            custom_data: CustomData::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Png,
    Jpeg,
}

/// Raw background image bytes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(rename = "type")]
    pub image_type: ImageType,
    pub data: Vec<u8>,
}

/// A whole font as a single interchange document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Font {
    pub units_per_em: u32,
    pub font_info: FontInfo,
    pub glyphs: BTreeMap<String, VariableGlyph>,
    pub glyph_map: GlyphMap,
    pub axes: Axes,
    pub sources: IndexMap<String, FontSource>,
    pub kerning: BTreeMap<String, KerningTable>,
    pub features: OpenTypeFeatures,
    pub custom_data: CustomData,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            units_per_em: 1000,
            font_info: FontInfo::default(),
            glyphs: BTreeMap::new(),
            glyph_map: GlyphMap::new(),
            axes: Axes::default(),
            sources: IndexMap::new(),
            kerning: BTreeMap::new(),
            features: OpenTypeFeatures::fea(""),
            custom_data: CustomData::new(),
        }
    }
}
