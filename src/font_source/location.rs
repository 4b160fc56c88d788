//! Designspace locations

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Axis name to axis value
pub type Location = BTreeMap<String, f64>;

/// A totally ordered, hashable-by-value view of a [`Location`].
///
/// Used to find sources of two fonts that sit at the same place in the
/// merged axis space.
#[derive(Debug, Clone)]
pub struct LocationKey(Vec<(String, f64)>);

impl LocationKey {
    pub fn new(location: &Location) -> Self {
        // -0.0 and 0.0 name the same location
        Self(
            location
                .iter()
                .map(|(name, value)| (name.clone(), value + 0.0))
                .collect(),
        )
    }
}

impl From<&Location> for LocationKey {
    fn from(location: &Location) -> Self {
        Self::new(location)
    }
}

impl PartialEq for LocationKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LocationKey {}

impl PartialOrd for LocationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LocationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        for ((name_a, value_a), (name_b, value_b)) in self.0.iter().zip(&other.0) {
            let ordering = name_a
                .cmp(name_b)
                .then_with(|| value_a.total_cmp(value_b));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        self.0.len().cmp(&other.0.len())
    }
}
