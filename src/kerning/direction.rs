//! Glyph writing-direction classification
//!
//! Glyphs are classified by the bidi class of the code points they are
//! encoded at, and the classification is carried over to every glyph they
//! can be substituted with. Feature code provides the substitutions; glyph
//! naming conventions provide a fallback for sources whose features are
//! not written yet.

use crate::font_source::{Axes, GlyphMap};
use crate::kerning::substitutions::{
    add_substitution, FeaCompiler, FeatureCompiler, SubstitutionTable,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::{debug, error};
use unicode_bidi::BidiClass;

/// Code point to the glyph encoded there.
pub type Cmap = BTreeMap<u32, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

/// The LTR and RTL glyph sets of a font. The sets are disjoint; glyphs in
/// neither set are unclassified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphDirections {
    pub ltr: BTreeSet<String>,
    pub rtl: BTreeSet<String>,
}

impl GlyphDirections {
    pub fn direction(&self, glyph_name: &str) -> Option<Direction> {
        if self.rtl.contains(glyph_name) {
            Some(Direction::Rtl)
        } else if self.ltr.contains(glyph_name) {
            Some(Direction::Ltr)
        } else {
            None
        }
    }

    pub fn is_rtl(&self, glyph_name: &str) -> bool {
        self.rtl.contains(glyph_name)
    }

    pub fn is_ltr(&self, glyph_name: &str) -> bool {
        self.ltr.contains(glyph_name)
    }
}

/// Classifies glyphs by the Unicode bidi class of their code points.
pub trait BidiOracle: Send + Sync {
    fn classify(
        &self,
        cmap: &Cmap,
        substitutions: Option<&SubstitutionTable>,
        extra_substitutions: &SubstitutionTable,
    ) -> GlyphDirections;
}

/// [`BidiOracle`] backed by the `unicode-bidi` character tables.
///
/// `R` and `AL` code points are RTL; `L`, `EN` and `AN` are LTR. A glyph
/// that can be reached from both directions ends up unclassified.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeBidiOracle;

pub fn code_point_direction(code_point: u32) -> Option<Direction> {
    let c = char::from_u32(code_point)?;
    match unicode_bidi::bidi_class(c) {
        BidiClass::R | BidiClass::AL => Some(Direction::Rtl),
        BidiClass::L | BidiClass::EN | BidiClass::AN => Some(Direction::Ltr),
        _ => None,
    }
}

impl BidiOracle for UnicodeBidiOracle {
    fn classify(
        &self,
        cmap: &Cmap,
        substitutions: Option<&SubstitutionTable>,
        extra_substitutions: &SubstitutionTable,
    ) -> GlyphDirections {
        let mut ltr_seed = BTreeSet::new();
        let mut rtl_seed = BTreeSet::new();
        for (&code_point, glyph_name) in cmap {
            match code_point_direction(code_point) {
                Some(Direction::Ltr) => ltr_seed.insert(glyph_name.as_str()),
                Some(Direction::Rtl) => rtl_seed.insert(glyph_name.as_str()),
                None => false,
            };
        }

        let mut edges: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for table in substitutions.into_iter().chain([extra_substitutions]) {
            for (from, targets) in table {
                edges
                    .entry(from.as_str())
                    .or_default()
                    .extend(targets.iter().map(String::as_str));
            }
        }

        let ltr = closure(&ltr_seed, &rtl_seed, &edges);
        let rtl = closure(&rtl_seed, &ltr_seed, &edges);

        GlyphDirections {
            ltr: ltr.difference(&rtl).map(|g| g.to_string()).collect(),
            rtl: rtl.difference(&ltr).map(|g| g.to_string()).collect(),
        }
    }
}

/// Every glyph reachable from `seed`, never stepping onto a glyph that is
/// directly encoded with the opposite direction.
fn closure<'a>(
    seed: &BTreeSet<&'a str>,
    opposite: &BTreeSet<&'a str>,
    edges: &BTreeMap<&'a str, BTreeSet<&'a str>>,
) -> BTreeSet<&'a str> {
    let mut reached: BTreeSet<&str> = seed.difference(opposite).copied().collect();
    let mut queue: VecDeque<&str> = reached.iter().copied().collect();

    while let Some(glyph) = queue.pop_front() {
        for &target in edges.get(glyph).into_iter().flatten() {
            if !opposite.contains(target) && reached.insert(target) {
                queue.push_back(target);
            }
        }
    }
    reached
}

/// Guess substitution edges from glyph naming conventions.
///
/// `alef-ar.init` is reachable from `alef-ar`, and the ligature
/// `lam_alef-ar.fina` from both `lam-ar` and `alef-ar`.
pub fn name_heuristic_substitutions<'a>(
    glyph_names: impl IntoIterator<Item = &'a String>,
) -> SubstitutionTable {
    let mut table = SubstitutionTable::new();

    for glyph_name in glyph_names {
        let base = glyph_name.split('.').next().unwrap_or_default();
        if base.is_empty() {
            continue;
        }
        add_substitution(&mut table, base, glyph_name);

        let (stem, extension) = match base.rsplit_once('-') {
            Some((stem, extension)) if !stem.is_empty() && !extension.is_empty() => {
                (stem, Some(extension))
            }
            _ => (base, None),
        };

        for component in stem.split('_').filter(|c| !c.is_empty()) {
            let component = match extension {
                Some(extension) => format!("{component}-{extension}"),
                None => component.to_string(),
            };
            add_substitution(&mut table, &component, glyph_name);
        }
    }
    table
}

/// Build a cmap from a glyph map; the first glyph (in name order) claiming a
/// code point keeps it.
pub fn cmap_from_glyph_map(glyph_map: &GlyphMap) -> Cmap {
    let mut cmap = Cmap::new();
    for (glyph_name, code_points) in glyph_map {
        for &code_point in code_points {
            cmap.entry(code_point).or_insert_with(|| glyph_name.clone());
        }
    }
    cmap
}

/// Classifies the glyphs of a font into LTR and RTL sets.
#[derive(Debug, Clone, Default)]
pub struct DirectionClassifier<C = FeaCompiler, B = UnicodeBidiOracle> {
    compiler: C,
    bidi: B,
}

impl<C: FeatureCompiler, B: BidiOracle> DirectionClassifier<C, B> {
    pub fn new(compiler: C, bidi: B) -> Self {
        Self { compiler, bidi }
    }

    pub fn classify(&self, glyph_map: &GlyphMap, feature_text: &str, axes: &Axes) -> GlyphDirections {
        let cmap = cmap_from_glyph_map(glyph_map);
        let extra_substitutions = name_heuristic_substitutions(glyph_map.keys());

        let directions = self.bidi.classify(&cmap, None, &extra_substitutions);
        if directions.rtl.is_empty() {
            debug!("No RTL glyphs found; skipping feature substitution closure");
            return directions;
        }

        let glyph_order: Vec<String> = std::iter::once(".notdef".to_string())
            .chain(glyph_map.keys().filter(|name| *name != ".notdef").cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let substitutions = match self
            .compiler
            .compile_substitutions(feature_text, &glyph_order, axes)
        {
            Ok(table) => Some(table),
            Err(e) => {
                error!("Could not compile features for direction classification: {e}");
                None
            }
        };

        self.bidi
            .classify(&cmap, substitutions.as_ref(), &extra_substitutions)
    }
}

/// Classify with the built-in feature reader and Unicode bidi tables.
pub fn classify_glyphs_by_direction(
    glyph_map: &GlyphMap,
    feature_text: &str,
    axes: &Axes,
) -> GlyphDirections {
    DirectionClassifier::<FeaCompiler, UnicodeBidiOracle>::default()
        .classify(glyph_map, feature_text, axes)
}


#[cfg(test)]
mod tests {
    use super::test_data::*;
    use super::*;
    use crate::error::{FontMergeError, Result};
    use crate::font_source::FontAxis;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn names(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn classify_mixed_font() {
        let axes = Axes {
            axes: vec![FontAxis::new("Weight", "wght", 100.0, 400.0, 900.0).into()],
            ..Default::default()
        };
        let directions = classify_glyphs_by_direction(&mixed_glyph_map(), MIXED_FEATURES, &axes);
        assert_eq!(
            directions.ltr,
            names(&["A", "A.alt", "C", "D", "F", "O", "O.alt", "V", "zero"])
        );
        assert_eq!(
            directions.rtl,
            names(&["alef-ar", "alef-ar.init", "beh-ar", "beh-ar.init"])
        );
        assert_eq!(directions.direction("period"), None);
    }

    #[test]
    fn heuristic_edges() {
        let glyphs = names(&["alef-ar.init", "lam_alef-ar.fina", "f_i", "a.sc"]);
        let table = name_heuristic_substitutions(&glyphs);
        assert!(table["alef-ar"].contains("alef-ar.init"));
        assert!(table["lam-ar"].contains("lam_alef-ar.fina"));
        assert!(table["alef-ar"].contains("lam_alef-ar.fina"));
        assert!(table["f"].contains("f_i"));
        assert!(table["i"].contains("f_i"));
        assert!(table["a"].contains("a.sc"));
        assert!(!table.contains_key("f_i"));
    }

    #[test]
    fn heuristics_classify_without_features() {
        let mut glyph_map = mixed_glyph_map();
        glyph_map.insert("lam-ar".into(), vec![0x0644]);
        glyph_map.insert("lam_alef-ar".into(), vec![]);
        let directions = classify_glyphs_by_direction(&glyph_map, "", &Axes::default());
        assert!(directions.is_rtl("lam_alef-ar"));
        assert!(directions.is_rtl("beh-ar.init"));
        assert!(directions.is_ltr("O.alt"));
    }

    struct FailingCompiler(AtomicUsize);

    impl FeatureCompiler for FailingCompiler {
        fn compile_substitutions(&self, _: &str, _: &[String], _: &Axes) -> Result<SubstitutionTable> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(FontMergeError::FeatureCompile("boom".into()))
        }
    }

    #[test]
    fn glyph_range_substitutions_carry_direction() {
        let glyph_map: GlyphMap = [
            ("a", vec![0x0627]),
            ("b", vec![0x0628]),
            ("c", vec![0x062A]),
            ("x1", vec![]),
            ("x2", vec![]),
            ("x3", vec![]),
        ]
        .into_iter()
        .map(|(name, code_points)| (name.to_string(), code_points))
        .collect();

        let directions = classify_glyphs_by_direction(
            &glyph_map,
            "feature init { sub [a - c] by [x1 - x3]; } init;",
            &Axes::default(),
        );
        assert_eq!(directions.rtl, names(&["a", "b", "c", "x1", "x2", "x3"]));
        assert!(directions.ltr.is_empty());
    }

    #[test]
    fn compile_failure_degrades_to_heuristics() {
        let mut glyph_map = mixed_glyph_map();
        glyph_map.insert("beh-ar.swsh".into(), vec![]);
        let classifier = DirectionClassifier::new(FailingCompiler(AtomicUsize::new(0)), UnicodeBidiOracle);
        let directions = classifier.classify(&glyph_map, "garbage", &Axes::default());
        assert_eq!(classifier.compiler.0.load(Ordering::SeqCst), 1);
        assert!(directions.is_rtl("beh-ar.swsh"));
        assert!(directions.is_rtl("alef-ar"));
    }

    #[test]
    fn latin_only_font_skips_feature_compilation() {
        let glyph_map: GlyphMap = [("A".to_string(), vec![0x41])].into_iter().collect();
        let classifier = DirectionClassifier::new(FailingCompiler(AtomicUsize::new(0)), UnicodeBidiOracle);
        let directions = classifier.classify(&glyph_map, "", &Axes::default());
        assert_eq!(classifier.compiler.0.load(Ordering::SeqCst), 0);
        assert_eq!(directions.ltr, names(&["A"]));
    }

    #[test]
    fn glyph_reached_from_both_directions_is_unclassified() {
        let cmap: Cmap = [(0x41, "A".to_string()), (0x0627, "alef-ar".to_string())]
            .into_iter()
            .collect();
        let mut subs = SubstitutionTable::new();
        add_substitution(&mut subs, "A", "shared");
        add_substitution(&mut subs, "alef-ar", "shared");
        let directions = UnicodeBidiOracle.classify(&cmap, Some(&subs), &SubstitutionTable::new());
        assert_eq!(directions.direction("shared"), None);
        assert_eq!(directions.direction("A"), Some(Direction::Ltr));
    }
}
