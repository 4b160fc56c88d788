//! Restricting kerning to a glyph set

use crate::kerning::table::{KerningGroups, KerningTable, PairKey};
use std::collections::{BTreeMap, BTreeSet};

/// Keep only the kerning that involves glyphs from `glyph_names`.
///
/// Tables left without values are dropped.
pub fn subset_kerning(
    kerning: &BTreeMap<String, KerningTable>,
    glyph_names: &BTreeSet<String>,
) -> BTreeMap<String, KerningTable> {
    kerning
        .iter()
        .map(|(kern_type, table)| (kern_type.clone(), subset_kern_table(table, glyph_names)))
        .filter(|(_, table)| !table.values.is_empty())
        .collect()
}

/// Filter group members to `glyph_names`, drop groups that end up empty,
/// and drop every pair whose key no longer resolves.
pub fn subset_kern_table(table: &KerningTable, glyph_names: &BTreeSet<String>) -> KerningTable {
    let groups_side1 = subset_groups(&table.groups_side1, glyph_names);
    let groups_side2 = subset_groups(&table.groups_side2, glyph_names);

    let keeps = |key: &str, groups: &KerningGroups| match PairKey::parse(key) {
        PairKey::Group(name) => groups.contains_key(name),
        PairKey::Glyph(name) => glyph_names.contains(name),
    };

    let values = table
        .values
        .iter()
        .filter(|(left, _)| keeps(left, &groups_side1))
        .filter_map(|(left, right_dict)| {
            let right_dict: BTreeMap<_, _> = right_dict
                .iter()
                .filter(|(right, _)| keeps(right, &groups_side2))
                .map(|(right, values)| (right.clone(), values.clone()))
                .collect();
            (!right_dict.is_empty()).then(|| (left.clone(), right_dict))
        })
        .collect();

    KerningTable {
        groups_side1,
        groups_side2,
        source_identifiers: table.source_identifiers.clone(),
        values,
    }
}

fn subset_groups(groups: &KerningGroups, glyph_names: &BTreeSet<String>) -> KerningGroups {
    groups
        .iter()
        .filter_map(|(name, glyphs)| {
            let glyphs: Vec<String> = glyphs
                .iter()
                .filter(|glyph| glyph_names.contains(*glyph))
                .cloned()
                .collect();
            (!glyphs.is_empty()).then(|| (name.clone(), glyphs))
        })
        .collect()
}
