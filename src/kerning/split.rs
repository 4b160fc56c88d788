//! Splitting kerning by writing direction, and flipping its handedness

use crate::kerning::direction::GlyphDirections;
use crate::kerning::groups::{classify_groups_by_direction, ClassifiedGroups};
use crate::kerning::table::{FlatKerningValues, KerningGroups, KerningTable, PairKey};
use std::collections::BTreeSet;

/// Split one kerning table into an LTR and an RTL table.
///
/// A pair goes to the RTL table when either side is RTL, otherwise to the
/// LTR table, so pairs between neutral glyphs end up LTR. Neutral groups are
/// kept in each output only if that output still references them.
pub fn split_kerning_by_direction(
    kerning: &KerningTable,
    directions: &GlyphDirections,
) -> (KerningTable, KerningTable) {
    let side1 = classify_groups_by_direction(&kerning.groups_side1, directions);
    let side2 = classify_groups_by_direction(&kerning.groups_side2, directions);

    let mut ltr_values = FlatKerningValues::new();
    let mut rtl_values = FlatKerningValues::new();

    for ((left, right), values) in kerning.flat_values() {
        let left_is_rtl = key_is_rtl(&left, &side1, directions);
        let right_is_rtl = key_is_rtl(&right, &side2, directions);

        if left_is_rtl || right_is_rtl {
            rtl_values.insert((left, right), values);
        } else {
            ltr_values.insert((left, right), values);
        }
    }

    let ltr = build_direction_table(&side1.ltr, &side2.ltr, &side1, &side2, kerning, ltr_values);
    let rtl = build_direction_table(&side1.rtl, &side2.rtl, &side1, &side2, kerning, rtl_values);
    (ltr, rtl)
}

fn key_is_rtl(key: &str, groups: &ClassifiedGroups, directions: &GlyphDirections) -> bool {
    match PairKey::parse(key) {
        PairKey::Group(name) => groups.rtl.contains_key(name),
        PairKey::Glyph(name) => directions.is_rtl(name),
    }
}

fn build_direction_table(
    direction_side1: &KerningGroups,
    direction_side2: &KerningGroups,
    side1: &ClassifiedGroups,
    side2: &ClassifiedGroups,
    kerning: &KerningTable,
    values: FlatKerningValues,
) -> KerningTable {
    let (neutral_side1, neutral_side2) =
        filter_groups_by_value_usage(&side1.neutral, &side2.neutral, &values);

    let mut groups_side1 = direction_side1.clone();
    groups_side1.extend(neutral_side1);
    let mut groups_side2 = direction_side2.clone();
    groups_side2.extend(neutral_side2);

    KerningTable::from_flat(
        groups_side1,
        groups_side2,
        kerning.source_identifiers.clone(),
        values,
    )
}

fn filter_groups_by_value_usage(
    groups_side1: &KerningGroups,
    groups_side2: &KerningGroups,
    values: &FlatKerningValues,
) -> (KerningGroups, KerningGroups) {
    let mut used_side1 = BTreeSet::new();
    let mut used_side2 = BTreeSet::new();
    for (left, right) in values.keys() {
        if let Some(name) = PairKey::parse(left).group_name() {
            used_side1.insert(name);
        }
        if let Some(name) = PairKey::parse(right).group_name() {
            used_side2.insert(name);
        }
    }

    let keep = |groups: &KerningGroups, used: &BTreeSet<&str>| -> KerningGroups {
        groups
            .iter()
            .filter(|(name, _)| used.contains(name.as_str()))
            .map(|(name, glyphs)| (name.clone(), glyphs.clone()))
            .collect()
    };

    (keep(groups_side1, &used_side1), keep(groups_side2, &used_side2))
}

/// Swap the roles of side 1 and side 2: groups trade places and every pair
/// `(left, right)` becomes `(right, left)`.
pub fn flip_kerning_direction(kerning: &KerningTable) -> KerningTable {
    let flipped: FlatKerningValues = kerning
        .flat_values()
        .into_iter()
        .map(|((left, right), values)| ((right, left), values))
        .collect();

    KerningTable::from_flat(
        kerning.groups_side2.clone(),
        kerning.groups_side1.clone(),
        kerning.source_identifiers.clone(),
        flipped,
    )
}
