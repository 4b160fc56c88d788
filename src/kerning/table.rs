//! The kerning table data model
//!
//! Kerning values form a sparse matrix: the outer key is the left pair key,
//! the inner key is the right pair key, and each leaf holds one optional
//! value per interpolation source. A pair key starting with
//! [`GROUP_MARKER`] refers to a group, anything else names a glyph.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Prefix that marks a pair key as a group reference.
pub const GROUP_MARKER: char = '@';

/// One value slot per source identifier; `None` means "no value for this
/// source", which is not the same as zero.
pub type KerningValues = Vec<Option<f64>>;

pub type KerningGroups = BTreeMap<String, Vec<String>>;

pub type NestedKerningValues = BTreeMap<String, BTreeMap<String, KerningValues>>;

pub type FlatKerningValues = BTreeMap<(String, String), KerningValues>;

/// One side of a kerning pair, resolved from its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKey<'a> {
    Group(&'a str),
    Glyph(&'a str),
}

impl<'a> PairKey<'a> {
    pub fn parse(key: &'a str) -> Self {
        match key.strip_prefix(GROUP_MARKER) {
            Some(group_name) => PairKey::Group(group_name),
            None => PairKey::Glyph(key),
        }
    }

    pub fn group_name(self) -> Option<&'a str> {
        match self {
            PairKey::Group(name) => Some(name),
            PairKey::Glyph(_) => None,
        }
    }
}

/// Build the pair key that refers to `group_name`.
pub fn group_key(group_name: &str) -> String {
    format!("{GROUP_MARKER}{group_name}")
}

/// Kerning data for one kern type (e.g. one writing direction)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KerningTable {
    #[serde(default, alias = "leftGroups")]
    pub groups_side1: KerningGroups,
    #[serde(default, alias = "rightGroups")]
    pub groups_side2: KerningGroups,
    #[serde(default)]
    pub source_identifiers: Vec<String>,
    #[serde(default)]
    pub values: NestedKerningValues,
}

impl KerningTable {
    /// Build a table from a flat `(left, right)` keyed value map.
    pub fn from_flat(
        groups_side1: KerningGroups,
        groups_side2: KerningGroups,
        source_identifiers: Vec<String>,
        values: FlatKerningValues,
    ) -> Self {
        Self {
            groups_side1,
            groups_side2,
            source_identifiers,
            values: nest_values(values),
        }
    }

    pub fn flat_values(&self) -> FlatKerningValues {
        unnest_values(&self.values)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.groups_side1.is_empty() && self.groups_side2.is_empty()
    }

    pub fn pair_count(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }

    /// Check the structural invariants: group keys resolve on their side and
    /// every value vector has one slot per source identifier.
    pub fn validate(&self) -> Result<(), String> {
        let expected_len = self.source_identifiers.len();
        for (left, right_dict) in &self.values {
            check_group_reference(left, &self.groups_side1, "side 1")?;
            for (right, values) in right_dict {
                check_group_reference(right, &self.groups_side2, "side 2")?;
                if values.len() != expected_len {
                    return Err(format!(
                        "pair ({left}, {right}) has {} values, expected {expected_len}",
                        values.len()
                    ));
                }
            }
        }
        Ok(())
    }
}

fn check_group_reference(key: &str, groups: &KerningGroups, side: &str) -> Result<(), String> {
    match PairKey::parse(key) {
        PairKey::Group(name) if !groups.contains_key(name) => {
            Err(format!("pair key '{key}' refers to unknown {side} group '{name}'"))
        }
        _ => Ok(()),
    }
}

pub fn unnest_values(values: &NestedKerningValues) -> FlatKerningValues {
    values
        .iter()
        .flat_map(|(left, right_dict)| {
            right_dict
                .iter()
                .map(move |(right, values)| ((left.clone(), right.clone()), values.clone()))
        })
        .collect()
}

pub fn nest_values(values: FlatKerningValues) -> NestedKerningValues {
    let mut nested = NestedKerningValues::new();
    for ((left, right), values) in values {
        nested.entry(left).or_default().insert(right, values);
    }
    nested
}
