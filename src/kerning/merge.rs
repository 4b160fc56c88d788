//! Merging two kerning tables into one

use crate::kerning::disambiguate::{disambiguate_kerning_group_names, GroupNameStrategy};
use crate::kerning::table::{KerningTable, KerningValues, NestedKerningValues};
use std::collections::{BTreeSet, HashMap};

/// Append the pairs of `b` to `a`; both must share the same source
/// identifiers. `b`'s groups are renamed where they differ from `a`'s
/// groups of the same name, and `b` wins for pairs present in both.
pub fn merge_kerning(a: &KerningTable, b: &KerningTable) -> KerningTable {
    assert_eq!(
        a.source_identifiers, b.source_identifiers,
        "kerning tables to append must have the same source identifiers"
    );

    let b = disambiguate_kerning_group_names(b.clone(), a, GroupNameStrategy::MergeCompatible);

    let mut values = a.flat_values();
    values.extend(b.flat_values());

    let mut groups_side1 = a.groups_side1.clone();
    groups_side1.extend(b.groups_side1);
    let mut groups_side2 = a.groups_side2.clone();
    groups_side2.extend(b.groups_side2);

    KerningTable::from_flat(
        groups_side1,
        groups_side2,
        a.source_identifiers.clone(),
        values,
    )
}

/// Merge the kerning of two different fonts.
///
/// The tables may have different source identifiers: the merged table uses
/// `a`'s identifiers followed by the ones only `b` has, and value vectors
/// get `None` for sources their table did not have. `a`'s groups are
/// renamed away from `b`'s first; afterwards the two tables must not share
/// any group name or left pair key.
pub fn merge_kern_tables(a: &KerningTable, b: &KerningTable) -> KerningTable {
    let a = disambiguate_kerning_group_names(a.clone(), b, GroupNameStrategy::MirrorMerge);

    assert!(
        is_disjoint(a.groups_side1.keys(), b.groups_side1.keys()),
        "side 1 group names overlap after disambiguation"
    );
    assert!(
        is_disjoint(a.groups_side2.keys(), b.groups_side2.keys()),
        "side 2 group names overlap after disambiguation"
    );
    assert!(
        is_disjoint(a.values.keys(), b.values.keys()),
        "left pair keys overlap after disambiguation"
    );

    let mut source_identifiers = a.source_identifiers.clone();
    for identifier in &b.source_identifiers {
        if !source_identifiers.contains(identifier) {
            source_identifiers.push(identifier.clone());
        }
    }

    let mut values = remap_values(&a.values, &a.source_identifiers, &source_identifiers);
    values.extend(remap_values(&b.values, &b.source_identifiers, &source_identifiers));

    let mut groups_side1 = a.groups_side1;
    groups_side1.extend(b.groups_side1.clone());
    let mut groups_side2 = a.groups_side2;
    groups_side2.extend(b.groups_side2.clone());

    KerningTable {
        groups_side1,
        groups_side2,
        source_identifiers,
        values,
    }
}

fn is_disjoint<'a>(
    a: impl Iterator<Item = &'a String>,
    b: impl Iterator<Item = &'a String>,
) -> bool {
    let a: BTreeSet<_> = a.collect();
    b.into_iter().all(|key| !a.contains(key))
}

/// Re-slot every value vector from `from` identifiers to `to` identifiers.
fn remap_values(
    values: &NestedKerningValues,
    from: &[String],
    to: &[String],
) -> NestedKerningValues {
    let indices: HashMap<&str, usize> = from
        .iter()
        .enumerate()
        .map(|(i, identifier)| (identifier.as_str(), i))
        .collect();
    let slots: Vec<Option<usize>> = to
        .iter()
        .map(|identifier| indices.get(identifier.as_str()).copied())
        .collect();

    let remap = |values: &KerningValues| -> KerningValues {
        slots
            .iter()
            .map(|slot| slot.and_then(|i| values.get(i).copied().flatten()))
            .collect()
    };

    values
        .iter()
        .map(|(left, right_dict)| {
            let right_dict = right_dict
                .iter()
                .map(|(right, values)| (right.clone(), remap(values)))
                .collect();
            (left.clone(), right_dict)
        })
        .collect()
}
