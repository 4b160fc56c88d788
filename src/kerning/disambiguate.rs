//! Group name disambiguation
//!
//! Before two kerning tables can share one group namespace, the group
//! names of one of them are renamed where they collide with the other's.
//! Renaming is deterministic: conflicting names are handled in sorted
//! order and get the first free `name.N` suffix.

use crate::kerning::table::{group_key, KerningGroups, KerningTable};
use std::collections::{BTreeMap, BTreeSet};

/// Which groups of the other table a table's groups are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupNameStrategy {
    /// Side 1 against side 1, side 2 against side 2. Groups with the same
    /// name and identical glyph lists are the same group and stay as is.
    MergeCompatible,
    /// Cross-font merging: side 1 is checked against the other table's
    /// side 2 as well as its side 1, side 2 against side 2. Every shared
    /// name is renamed.
    MirrorMerge,
}

impl GroupNameStrategy {
    fn allows_identical_contents(self) -> bool {
        matches!(self, GroupNameStrategy::MergeCompatible)
    }

    fn side1_reserved(self, other: &KerningTable) -> Vec<&KerningGroups> {
        match self {
            GroupNameStrategy::MergeCompatible => vec![&other.groups_side1],
            GroupNameStrategy::MirrorMerge => vec![&other.groups_side2, &other.groups_side1],
        }
    }

    fn side2_reserved(self, other: &KerningTable) -> Vec<&KerningGroups> {
        vec![&other.groups_side2]
    }
}

/// Renames for one side: group names, and the pair keys referring to them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMaps {
    pub groups: BTreeMap<String, String>,
    pub pair_keys: BTreeMap<String, String>,
}

impl RenameMaps {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    fn rename_key(&self, key: &str) -> String {
        self.pair_keys
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

/// Compute renames for `groups` so that none of its names is used by any of
/// the `reserved` group sets.
pub fn conflict_resolution_mappings(
    groups: &KerningGroups,
    reserved: &[&KerningGroups],
    allow_identical_contents: bool,
) -> RenameMaps {
    let conflicting: BTreeSet<&String> = groups
        .keys()
        .filter(|name| reserved.iter().any(|other| other.contains_key(*name)))
        .collect();

    if conflicting.is_empty() {
        return RenameMaps::default();
    }

    let mut used_names: BTreeSet<String> = groups
        .keys()
        .chain(reserved.iter().flat_map(|other| other.keys()))
        .cloned()
        .collect();

    let mut maps = RenameMaps::default();
    for name in conflicting {
        let identical = reserved
            .iter()
            .filter_map(|other| other.get(name))
            .all(|glyphs| Some(glyphs) == groups.get(name));
        if allow_identical_contents && identical {
            continue;
        }

        let new_name = (1..)
            .map(|count| format!("{name}.{count}"))
            .find(|candidate| !used_names.contains(candidate))
            .unwrap_or_else(|| unreachable!("unbounded suffix search"));
        used_names.insert(new_name.clone());

        maps.pair_keys.insert(group_key(name), group_key(&new_name));
        maps.groups.insert(name.clone(), new_name);
    }
    maps
}

pub fn rename_groups(groups: &KerningGroups, renames: &RenameMaps) -> KerningGroups {
    groups
        .iter()
        .map(|(name, glyphs)| {
            let name = renames.groups.get(name).unwrap_or(name);
            (name.clone(), glyphs.clone())
        })
        .collect()
}

/// Rename the groups of `table` that collide with `other`'s groups, along
/// with every pair key that refers to them. Returns `table` untouched when
/// nothing collides.
pub fn disambiguate_kerning_group_names(
    table: KerningTable,
    other: &KerningTable,
    strategy: GroupNameStrategy,
) -> KerningTable {
    let allow_identical = strategy.allows_identical_contents();
    let side1 = conflict_resolution_mappings(
        &table.groups_side1,
        &strategy.side1_reserved(other),
        allow_identical,
    );
    let side2 = conflict_resolution_mappings(
        &table.groups_side2,
        &strategy.side2_reserved(other),
        allow_identical,
    );

    if side1.is_empty() && side2.is_empty() {
        return table;
    }

    let values = table
        .values
        .iter()
        .map(|(left, right_dict)| {
            let right_dict = right_dict
                .iter()
                .map(|(right, values)| (side2.rename_key(right), values.clone()))
                .collect();
            (side1.rename_key(left), right_dict)
        })
        .collect();

    KerningTable {
        groups_side1: rename_groups(&table.groups_side1, &side1),
        groups_side2: rename_groups(&table.groups_side2, &side2),
        source_identifiers: table.source_identifiers,
        values,
    }
}
