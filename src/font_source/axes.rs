//! Variation axes
//!
//! An axis is either continuous (a min/default/max range) or discrete
//! (an explicit set of allowed values). Both may carry a piecewise-linear
//! user-to-source mapping.

use crate::font_source::data::CustomData;
use crate::font_source::location::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisValueLabel {
    pub name: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_value: Option<f64>,
    #[serde(default)]
    pub elidable: bool,
    #[serde(default)]
    pub older_sibling: bool,
}

/// A continuous variation axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontAxis {
    /// Identifies the axis; locations are keyed by it
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub tag: String,
    pub min_value: f64,
    pub default_value: f64,
    pub max_value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapping: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_labels: Vec<AxisValueLabel>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

impl FontAxis {
    pub fn new(name: &str, tag: &str, min_value: f64, default_value: f64, max_value: f64) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            tag: tag.to_string(),
            min_value,
            default_value,
            max_value,
            mapping: Vec::new(),
            value_labels: Vec::new(),
            hidden: false,
            custom_data: CustomData::new(),
        }
    }
}

/// An axis restricted to an enumerated set of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscreteFontAxis {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub tag: String,
    pub values: Vec<f64>,
    pub default_value: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mapping: Vec<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_labels: Vec<AxisValueLabel>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AxisKind {
    Continuous(FontAxis),
    Discrete(DiscreteFontAxis),
}

impl AxisKind {
    pub fn name(&self) -> &str {
        match self {
            AxisKind::Continuous(axis) => &axis.name,
            AxisKind::Discrete(axis) => &axis.name,
        }
    }

    pub fn default_value(&self) -> f64 {
        match self {
            AxisKind::Continuous(axis) => axis.default_value,
            AxisKind::Discrete(axis) => axis.default_value,
        }
    }

    pub fn mapping(&self) -> &[[f64; 2]] {
        match self {
            AxisKind::Continuous(axis) => &axis.mapping,
            AxisKind::Discrete(axis) => &axis.mapping,
        }
    }
}

impl From<FontAxis> for AxisKind {
    fn from(axis: FontAxis) -> Self {
        AxisKind::Continuous(axis)
    }
}

impl From<DiscreteFontAxis> for AxisKind {
    fn from(axis: DiscreteFontAxis) -> Self {
        AxisKind::Discrete(axis)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossAxisMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_description: Option<String>,
    pub input_location: Location,
    pub output_location: Location,
}

/// The axis space of a font
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Axes {
    pub axes: Vec<AxisKind>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mappings: Vec<CrossAxisMapping>,
    #[serde(rename = "elidedFallBackname", skip_serializing_if = "Option::is_none")]
    pub elided_fallback_name: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_data: CustomData,
}

impl Axes {
    /// The location where every axis sits at its default value.
    pub fn default_location(&self) -> Location {
        self.axes
            .iter()
            .map(|axis| (axis.name().to_string(), axis.default_value()))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&AxisKind> {
        self.axes.iter().find(|axis| axis.name() == name)
    }
}
