//! Merging two fonts behind the backend read contract
//!
//! [`FontBackendMerger`] presents inputs A and B as one font. Where both
//! fonts define the same thing, B wins. The merger is itself a
//! [`ReadableFontBackend`], so merges can be nested.

use crate::backend::features::{ConcatFeatureMerger, FeatureMerger};
use crate::backend::ReadableFontBackend;
use crate::error::Result;
use crate::font_source::{
    AxisKind, Axes, CustomData, FontInfo, FontSource, GlyphMap, ImageData, Location, LocationKey,
    OpenTypeFeatures, VariableGlyph, FEA_LANGUAGE,
};
use crate::kerning::{merge_kern_tables, subset_kerning, KerningTable};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::OnceCell;
use tracing::{debug, error, warn};

/// Glyph maps of both inputs and their union.
#[derive(Debug)]
struct PreparedGlyphMaps {
    glyph_map_a: GlyphMap,
    glyph_map_b: GlyphMap,
    merged: GlyphMap,
    names_a: BTreeSet<String>,
    names_b: BTreeSet<String>,
}

/// The merged sources plus the identifiers A's sources were renamed to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSources {
    pub sources: IndexMap<String, FontSource>,
    pub identifier_mapping_a: BTreeMap<String, String>,
}

pub struct FontBackendMerger {
    input_a: Box<dyn ReadableFontBackend>,
    input_b: Box<dyn ReadableFontBackend>,
    feature_merger: Box<dyn FeatureMerger>,
    warn_about_duplicates: bool,
    glyph_maps: OnceCell<PreparedGlyphMaps>,
    merged_axes: OnceCell<Axes>,
    merged_sources: OnceCell<MergedSources>,
}

impl FontBackendMerger {
    pub fn new(input_a: Box<dyn ReadableFontBackend>, input_b: Box<dyn ReadableFontBackend>) -> Self {
        Self {
            input_a,
            input_b,
            feature_merger: Box::new(ConcatFeatureMerger),
            warn_about_duplicates: true,
            glyph_maps: OnceCell::new(),
            merged_axes: OnceCell::new(),
            merged_sources: OnceCell::new(),
        }
    }

    pub fn with_feature_merger(mut self, feature_merger: impl FeatureMerger + 'static) -> Self {
        self.feature_merger = Box::new(feature_merger);
        self
    }

    pub fn warn_about_duplicates(mut self, warn: bool) -> Self {
        self.warn_about_duplicates = warn;
        self
    }

    async fn glyph_maps(&self) -> Result<&PreparedGlyphMaps> {
        self.glyph_maps
            .get_or_try_init(|| async {
                let glyph_map_a = self.input_a.get_glyph_map().await?;
                let glyph_map_b = self.input_b.get_glyph_map().await?;
                Ok(prepare_glyph_maps(glyph_map_a, glyph_map_b))
            })
            .await
    }

    pub async fn merged_axes(&self) -> Result<&Axes> {
        self.merged_axes
            .get_or_try_init(|| async {
                let axes_a = self.input_a.get_axes().await?;
                let axes_b = self.input_b.get_axes().await?;
                Ok(merge_axes(axes_a, axes_b))
            })
            .await
    }

    pub async fn merged_sources(&self) -> Result<&MergedSources> {
        self.merged_sources
            .get_or_try_init(|| async {
                let default_location = self.merged_axes().await?.default_location();
                let sources_a = self.input_a.get_sources().await?;
                let sources_b = self.input_b.get_sources().await?;
                Ok(merge_sources(&default_location, sources_a, sources_b))
            })
            .await
    }
}

fn prepare_glyph_maps(glyph_map_a: GlyphMap, glyph_map_b: GlyphMap) -> PreparedGlyphMaps {
    let mut cmap = cmap_from_glyph_map(&glyph_map_a);
    for (code_point, glyph_name_b) in cmap_from_glyph_map(&glyph_map_b) {
        if let Some(glyph_name_a) = cmap.get(&code_point).filter(|name| **name != glyph_name_b) {
            warn!(
                "Merger: Code point U+{code_point:04X} is mapped to {glyph_name_a} in A and to {glyph_name_b} in B; using B"
            );
        }
        cmap.insert(code_point, glyph_name_b);
    }

    let mut encoded: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for (code_point, glyph_name) in &cmap {
        encoded.entry(glyph_name.as_str()).or_default().push(*code_point);
    }

    let names_a: BTreeSet<String> = glyph_map_a.keys().cloned().collect();
    let names_b: BTreeSet<String> = glyph_map_b.keys().cloned().collect();
    let merged = names_a
        .union(&names_b)
        .map(|name| {
            let code_points = encoded.get(name.as_str()).cloned().unwrap_or_default();
            (name.clone(), code_points)
        })
        .collect();

    PreparedGlyphMaps {
        glyph_map_a,
        glyph_map_b,
        merged,
        names_a,
        names_b,
    }
}

/// Code point to glyph name. Code points claimed by several glyphs go to
/// the first glyph in name order.
fn cmap_from_glyph_map(glyph_map: &GlyphMap) -> BTreeMap<u32, String> {
    let mut cmap = BTreeMap::new();
    for (glyph_name, code_points) in glyph_map {
        for &code_point in code_points {
            match cmap.get(&code_point) {
                Some(existing) => warn!(
                    "Merger: Code point U+{code_point:04X} is mapped multiple times: {existing}, {glyph_name}"
                ),
                None => {
                    cmap.insert(code_point, glyph_name.clone());
                }
            }
        }
    }
    cmap
}

fn merge_axes(axes_a: Axes, axes_b: Axes) -> Axes {
    let mut axes: Vec<AxisKind> = axes_b
        .axes
        .iter()
        .map(|axis_b| match axes_a.get(axis_b.name()) {
            Some(axis_a) => merge_axis(axis_a, axis_b),
            None => axis_b.clone(),
        })
        .collect();
    axes.extend(
        axes_a
            .axes
            .iter()
            .filter(|axis_a| axes_b.get(axis_a.name()).is_none())
            .cloned(),
    );

    let mut custom_data = axes_a.custom_data;
    custom_data.extend(axes_b.custom_data);

    Axes {
        axes,
        mappings: if axes_b.mappings.is_empty() {
            axes_a.mappings
        } else {
            axes_b.mappings
        },
        elided_fallback_name: axes_b.elided_fallback_name.or(axes_a.elided_fallback_name),
        custom_data,
    }
}

fn merge_axis(axis_a: &AxisKind, axis_b: &AxisKind) -> AxisKind {
    let name = axis_b.name();
    if axis_a.mapping() != axis_b.mapping() {
        error!(
            "Merger: Axis mappings should be the same; {name}, A: {:?}, B: {:?}",
            axis_a.mapping(),
            axis_b.mapping()
        );
    }
    if axis_a.default_value() != axis_b.default_value() {
        error!(
            "Merger: Axis default values should be the same; {name}, A: {}, B: {}",
            axis_a.default_value(),
            axis_b.default_value()
        );
    }

    match (axis_a, axis_b) {
        (AxisKind::Continuous(a), AxisKind::Continuous(b)) => {
            let mut merged = b.clone();
            merged.min_value = a.min_value.min(b.min_value);
            merged.max_value = a.max_value.max(b.max_value);
            merged.into()
        }
        (AxisKind::Discrete(a), AxisKind::Discrete(b)) => {
            let mut values: Vec<f64> = a.values.iter().chain(&b.values).copied().collect();
            values.sort_by(f64::total_cmp);
            values.dedup();
            let mut merged = b.clone();
            merged.values = values;
            merged.into()
        }
        _ => {
            error!("Merger: Can't merge continuous axis with discrete axis: {name}");
            axis_b.clone()
        }
    }
}

fn merge_sources(
    default_location: &Location,
    sources_a: IndexMap<String, FontSource>,
    sources_b: IndexMap<String, FontSource>,
) -> MergedSources {
    let by_location = |sources: IndexMap<String, FontSource>| {
        sources
            .into_iter()
            .map(|(identifier, mut source)| {
                let mut location = default_location.clone();
                location.extend(source.location);
                source.location = location;
                (LocationKey::new(&source.location), (identifier, source))
            })
            .collect::<BTreeMap<_, _>>()
    };
    let mut by_location_a = by_location(sources_a);
    let mut by_location_b = by_location(sources_b);

    let mut used_identifiers: BTreeSet<String> = by_location_b
        .values()
        .map(|(identifier, _)| identifier.clone())
        .collect();

    let locations: BTreeSet<LocationKey> = by_location_a
        .keys()
        .chain(by_location_b.keys())
        .cloned()
        .collect();

    let mut merged = MergedSources::default();
    for location in locations {
        match (by_location_a.remove(&location), by_location_b.remove(&location)) {
            (Some((id_a, source_a)), Some((id_b, mut source_b))) => {
                let mut horizontal = source_a.line_metrics_horizontal_layout;
                horizontal.extend(source_b.line_metrics_horizontal_layout);
                let mut vertical = source_a.line_metrics_vertical_layout;
                vertical.extend(source_b.line_metrics_vertical_layout);
                let mut custom_data = source_a.custom_data;
                custom_data.extend(source_b.custom_data);

                source_b.line_metrics_horizontal_layout = horizontal;
                source_b.line_metrics_vertical_layout = vertical;
                source_b.custom_data = custom_data;

                merged.identifier_mapping_a.insert(id_a, id_b.clone());
                merged.sources.insert(id_b, source_b);
            }
            (None, Some((id_b, source_b))) => {
                merged.sources.insert(id_b, source_b);
            }
            (Some((id_a, source_a)), None) => {
                let identifier = if used_identifiers.contains(&id_a) {
                    let renamed = (1..)
                        .map(|count| format!("{id_a}.{count}"))
                        .find(|candidate| !used_identifiers.contains(candidate))
                        .unwrap_or_else(|| unreachable!("unbounded suffix search"));
                    debug!("Merger: Renaming source '{id_a}' of A to '{renamed}'");
                    merged.identifier_mapping_a.insert(id_a, renamed.clone());
                    renamed
                } else {
                    id_a
                };
                used_identifiers.insert(identifier.clone());
                merged.sources.insert(identifier, source_a);
            }
            (None, None) => {}
        }
    }
    merged
}

#[async_trait]
impl ReadableFontBackend for FontBackendMerger {
    async fn get_glyph(&self, glyph_name: &str) -> Result<Option<VariableGlyph>> {
        let glyphs = self.glyph_maps().await?;
        if glyphs.names_b.contains(glyph_name) {
            if glyphs.names_a.contains(glyph_name) && self.warn_about_duplicates {
                warn!("Merger: Glyph '{glyph_name}' exists in both fonts");
            }
            self.input_b.get_glyph(glyph_name).await
        } else if glyphs.names_a.contains(glyph_name) {
            self.input_a.get_glyph(glyph_name).await
        } else {
            Ok(None)
        }
    }

    async fn get_font_info(&self) -> Result<FontInfo> {
        let info_a = self.input_a.get_font_info().await?;
        let info_b = self.input_b.get_font_info().await?;
        Ok(info_a.merged_with(&info_b))
    }

    async fn get_axes(&self) -> Result<Axes> {
        Ok(self.merged_axes().await?.clone())
    }

    async fn get_sources(&self) -> Result<IndexMap<String, FontSource>> {
        Ok(self.merged_sources().await?.sources.clone())
    }

    async fn get_glyph_map(&self) -> Result<GlyphMap> {
        Ok(self.glyph_maps().await?.merged.clone())
    }

    async fn get_kerning(&self) -> Result<BTreeMap<String, KerningTable>> {
        let glyphs = self.glyph_maps().await?;
        let sources = self.merged_sources().await?;

        let names_a_only: BTreeSet<String> =
            glyphs.names_a.difference(&glyphs.names_b).cloned().collect();
        let mut kerning_a = subset_kerning(&self.input_a.get_kerning().await?, &names_a_only);
        let mut kerning_b = subset_kerning(&self.input_b.get_kerning().await?, &glyphs.names_b);

        let kern_types: BTreeSet<String> =
            kerning_a.keys().chain(kerning_b.keys()).cloned().collect();

        let mut kerning = BTreeMap::new();
        for kern_type in kern_types {
            let table_a = kerning_a.remove(&kern_type).map(|mut table| {
                for identifier in &mut table.source_identifiers {
                    if let Some(mapped) = sources.identifier_mapping_a.get(identifier) {
                        *identifier = mapped.clone();
                    }
                }
                table
            });
            let table_b = kerning_b.remove(&kern_type);

            let table = match (table_a, table_b) {
                (Some(a), Some(b)) => merge_kern_tables(&a, &b),
                (Some(a), None) => a,
                (None, Some(b)) => b,
                (None, None) => continue,
            };
            kerning.insert(kern_type, table);
        }
        Ok(kerning)
    }

    async fn get_features(&self) -> Result<OpenTypeFeatures> {
        let glyphs = self.glyph_maps().await?;
        let features_a = self.input_a.get_features().await?;
        let features_b = self.input_b.get_features().await?;

        if features_a.language != FEA_LANGUAGE || features_b.language != FEA_LANGUAGE {
            warn!("Merger: Can't merge feature languages other than {FEA_LANGUAGE}");
            return Ok(features_b);
        }
        if features_a.text.trim().is_empty() {
            return Ok(features_b);
        }
        if features_b.text.trim().is_empty() {
            return Ok(features_a);
        }

        let (text, merged_glyph_map) = self.feature_merger.merge_features(
            &features_a.text,
            &glyphs.glyph_map_a,
            &features_b.text,
            &glyphs.glyph_map_b,
        )?;
        assert!(
            merged_glyph_map.keys().eq(glyphs.merged.keys()),
            "merged feature code must cover exactly the merged glyph set"
        );
        Ok(OpenTypeFeatures::fea(text))
    }

    async fn get_custom_data(&self) -> Result<CustomData> {
        let mut custom_data = self.input_a.get_custom_data().await?;
        custom_data.extend(self.input_b.get_custom_data().await?);
        Ok(custom_data)
    }

    async fn get_units_per_em(&self) -> Result<u32> {
        let units_a = self.input_a.get_units_per_em().await?;
        let units_b = self.input_b.get_units_per_em().await?;
        if units_a != units_b && !self.input_a.is_placeholder() {
            warn!("Merger: Fonts have different units-per-em; A: {units_a}, B: {units_b}");
        }
        Ok(units_b)
    }

    async fn get_background_image(&self, image_identifier: &str) -> Result<Option<ImageData>> {
        for input in [&self.input_b, &self.input_a] {
            if let Some(image) = input.get_background_image(image_identifier).await? {
                return Ok(Some(image));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, NullBackend};
    use crate::font_source::{Font, FontAxis, ImageType, LineMetric};
    use crate::logging::capture::capture_logs;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn font(value: serde_json::Value) -> Font {
        serde_json::from_value(value).unwrap()
    }

    fn latin() -> Font {
        font(json!({
            "unitsPerEm": 1000,
            "fontInfo": {"familyName": "Test Sans", "designer": "Latin Designer"},
            "glyphMap": {"A": [65], "O": [79], "V": [86], "period": [46], "space": [32]},
            "glyphs": {
                "A": {"name": "A", "sources": [], "layers": {}},
                "period": {"name": "period", "sources": [], "layers": {"x": 1}},
            },
            "axes": {"axes": [
                {"name": "Weight", "tag": "wght", "minValue": 400, "defaultValue": 400, "maxValue": 700},
            ]},
            "sources": {
                "regular": {"name": "Regular", "location": {},
                    "lineMetricsHorizontalLayout": {"xHeight": {"value": 500}}},
                "bold": {"name": "Bold", "location": {"Weight": 700}},
            },
            "kerning": {"kern": {
                "groupsSide1": {"O": ["O"]},
                "groupsSide2": {"A": ["A"]},
                "sourceIdentifiers": ["regular", "bold"],
                "values": {"@O": {"@A": [-10, -20]}, "V": {"period": [-50, -60]}},
            }},
            "features": {"language": "fea", "text": "feature kern { } kern;"},
            "customData": {"com.example.a": 1, "com.example.shared": "a"},
        }))
    }

    fn arabic() -> Font {
        font(json!({
            "unitsPerEm": 1000,
            "fontInfo": {"familyName": "Test Sans Arabic"},
            "glyphMap": {"alef-ar": [0x0627], "beh-ar": [0x0628], "period": [46], "space": [32, 160]},
            "glyphs": {"period": {"name": "period", "sources": [], "layers": {"x": 2}}},
            "axes": {"axes": [
                {"name": "Weight", "tag": "wght", "minValue": 300, "defaultValue": 400, "maxValue": 600},
                {"name": "Width", "tag": "wdth", "minValue": 75, "defaultValue": 100, "maxValue": 100},
            ]},
            "sources": {
                "bold": {"name": "Arabic Light", "location": {"Weight": 300}},
                "ar-regular": {"name": "Arabic Regular", "location": {"Weight": 400, "Width": 100},
                    "lineMetricsHorizontalLayout": {"ascender": {"value": 750}}},
            },
            "kerning": {"kern": {
                "groupsSide1": {"alef": ["alef-ar"]},
                "groupsSide2": {"A": ["beh-ar"]},
                "sourceIdentifiers": ["ar-regular", "bold"],
                "values": {"@alef": {"@A": [-5, -6]}},
            }},
            "features": {"language": "fea", "text": "feature init { } init;"},
            "customData": {"com.example.b": 2, "com.example.shared": "b"},
        }))
    }

    fn merger() -> FontBackendMerger {
        FontBackendMerger::new(
            Box::new(MemoryBackend::new(latin())),
            Box::new(MemoryBackend::new(arabic())),
        )
    }

    #[tokio::test]
    async fn glyph_map_and_glyphs() {
        let merger = merger();
        let glyph_map = merger.get_glyph_map().await.unwrap();

        assert_eq!(
            glyph_map.keys().collect::<Vec<_>>(),
            ["A", "O", "V", "alef-ar", "beh-ar", "period", "space"]
        );
        assert_eq!(glyph_map["space"], vec![32, 160]);

        let period = merger.get_glyph("period").await.unwrap().unwrap();
        assert_eq!(period.layers["x"], json!(2));
        assert!(merger.get_glyph("A").await.unwrap().is_some());
        assert!(merger.get_glyph("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn axes_are_unioned() {
        let axes = merger().get_axes().await.unwrap();
        let names: Vec<_> = axes.axes.iter().map(AxisKind::name).collect();
        assert_eq!(names, ["Weight", "Width"]);

        match &axes.axes[0] {
            AxisKind::Continuous(weight) => {
                assert_eq!(weight.min_value, 300.0);
                assert_eq!(weight.max_value, 700.0);
            }
            other => panic!("unexpected axis {other:?}"),
        }
    }

    #[test]
    fn discrete_axes_union_their_values() {
        let discrete = |values: &[f64]| {
            AxisKind::Discrete(crate::font_source::DiscreteFontAxis {
                name: "Italic".into(),
                label: "Italic".into(),
                tag: "ital".into(),
                values: values.to_vec(),
                default_value: 0.0,
                mapping: Vec::new(),
                value_labels: Vec::new(),
                hidden: false,
                custom_data: Default::default(),
            })
        };
        match merge_axis(&discrete(&[0.0, 1.0]), &discrete(&[1.0, 0.5])) {
            AxisKind::Discrete(axis) => assert_eq!(axis.values, [0.0, 0.5, 1.0]),
            other => panic!("unexpected axis {other:?}"),
        }

        let continuous: AxisKind = FontAxis::new("Italic", "ital", 0.0, 0.0, 1.0).into();
        assert_eq!(merge_axis(&continuous, &discrete(&[0.0])), discrete(&[0.0]));
    }

    #[tokio::test]
    async fn sources_merge_by_location() {
        let merger = merger();
        let merged = merger.merged_sources().await.unwrap();

        // A's "regular" and B's "ar-regular" sit at the default location
        assert_eq!(merged.identifier_mapping_a["regular"], "ar-regular");
        // A's "bold" is A-only but its identifier is taken by B
        assert_eq!(merged.identifier_mapping_a["bold"], "bold.1");

        let identifiers: Vec<_> = merged.sources.keys().collect();
        assert_eq!(identifiers, ["bold", "ar-regular", "bold.1"]);

        let regular = &merged.sources["ar-regular"];
        assert_eq!(regular.location["Width"], 100.0);
        assert_eq!(regular.location["Weight"], 400.0);
        assert_eq!(
            regular.line_metrics_horizontal_layout["xHeight"],
            LineMetric { value: 500.0, ..Default::default() }
        );
        assert!(regular.line_metrics_horizontal_layout.contains_key("ascender"));
    }

    #[tokio::test]
    async fn kerning_is_subset_and_merged() {
        let kerning = merger().get_kerning().await.unwrap();
        let kern = &kerning["kern"];

        assert_eq!(kern.source_identifiers, ["ar-regular", "bold.1", "bold"]);
        // "period" belongs to B, so A's pair against it is dropped
        assert!(!kern.values.contains_key("V"));
        assert_eq!(kern.values["@O"]["@A.1"], vec![Some(-10.0), Some(-20.0), None]);
        assert_eq!(kern.values["@alef"]["@A"], vec![Some(-5.0), None, Some(-6.0)]);
        assert_eq!(kern.groups_side2["A"], ["beh-ar"]);
        assert_eq!(kern.groups_side2["A.1"], ["A"]);
        assert!(kern.validate().is_ok());
    }

    #[tokio::test]
    async fn scalar_data() {
        let merger = merger();
        let info = merger.get_font_info().await.unwrap();
        assert_eq!(info.family_name.as_deref(), Some("Test Sans Arabic"));
        assert_eq!(info.designer.as_deref(), Some("Latin Designer"));

        let custom_data = merger.get_custom_data().await.unwrap();
        assert_eq!(custom_data["com.example.shared"], json!("b"));
        assert_eq!(custom_data.len(), 3);

        assert_eq!(merger.get_units_per_em().await.unwrap(), 1000);

        let features = merger.get_features().await.unwrap();
        assert_eq!(
            features.text,
            "feature kern { } kern;\n\nfeature init { } init;\n"
        );
    }

    #[tokio::test]
    async fn features_pass_through_when_one_side_is_empty() {
        let mut b = arabic();
        b.features = OpenTypeFeatures::fea("");
        let merger = FontBackendMerger::new(
            Box::new(MemoryBackend::new(latin())),
            Box::new(MemoryBackend::new(b)),
        );
        assert_eq!(merger.get_features().await.unwrap().text, "feature kern { } kern;");

        let mut b = arabic();
        b.features.language = "other".into();
        let merger = FontBackendMerger::new(
            Box::new(MemoryBackend::new(latin())),
            Box::new(MemoryBackend::new(b)),
        );
        assert_eq!(merger.get_features().await.unwrap().language, "other");
    }

    struct DroppingFeatureMerger;

    impl FeatureMerger for DroppingFeatureMerger {
        fn merge_features(
            &self,
            text_a: &str,
            glyph_map_a: &GlyphMap,
            _text_b: &str,
            _glyph_map_b: &GlyphMap,
        ) -> Result<(String, GlyphMap)> {
            Ok((text_a.to_string(), glyph_map_a.clone()))
        }
    }

    #[tokio::test]
    #[should_panic(expected = "merged glyph set")]
    async fn feature_merge_must_cover_all_glyphs() {
        let merger = merger().with_feature_merger(DroppingFeatureMerger);
        let _ = merger.get_features().await;
    }

    #[tokio::test]
    async fn null_backend_as_first_input() {
        let merger = FontBackendMerger::new(
            Box::new(NullBackend),
            Box::new(MemoryBackend::new(arabic())),
        );
        assert_eq!(merger.get_glyph_map().await.unwrap().len(), 4);
        assert_eq!(merger.get_kerning().await.unwrap(), arabic().kerning);
        assert_eq!(merger.get_units_per_em().await.unwrap(), 1000);
        assert_eq!(merger.get_sources().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn background_images_prefer_b() {
        let image = |byte: u8| ImageData {
            image_type: ImageType::Png,
            data: vec![byte],
        };
        let merger = FontBackendMerger::new(
            Box::new(
                MemoryBackend::new(latin())
                    .with_background_image("shared", image(1))
                    .with_background_image("only-a", image(2)),
            ),
            Box::new(MemoryBackend::new(arabic()).with_background_image("shared", image(3))),
        );

        assert_eq!(merger.get_background_image("shared").await.unwrap(), Some(image(3)));
        assert_eq!(merger.get_background_image("only-a").await.unwrap(), Some(image(2)));
        assert_eq!(merger.get_background_image("none").await.unwrap(), None);
    }

    #[test]
    fn conflicting_code_points_across_fonts_warn_and_b_wins() {
        let (logs, _guard) = capture_logs();
        let glyph_map_a: GlyphMap = [("hyphen".to_string(), vec![0x2D]), ("A".into(), vec![0x41])]
            .into_iter()
            .collect();
        let glyph_map_b: GlyphMap = [("hyphen-ar".to_string(), vec![0x2D]), ("A".into(), vec![0x41])]
            .into_iter()
            .collect();

        let prepared = prepare_glyph_maps(glyph_map_a, glyph_map_b);
        assert_eq!(prepared.merged["hyphen-ar"], vec![0x2D]);
        assert!(prepared.merged["hyphen"].is_empty());
        assert_eq!(prepared.merged["A"], vec![0x41]);

        let logs = logs.contents();
        assert!(logs.contains("U+002D is mapped to hyphen in A and to hyphen-ar in B"), "{logs}");
        assert!(!logs.contains("U+0041"), "{logs}");
    }

    #[test]
    fn mismatched_axis_defaults_and_mappings_keep_b() {
        let (logs, _guard) = capture_logs();
        let mut axis_a = FontAxis::new("Weight", "wght", 100.0, 400.0, 900.0);
        axis_a.mapping = vec![[100.0, 20.0], [900.0, 180.0]];
        let mut axis_b = FontAxis::new("Weight", "wght", 200.0, 500.0, 800.0);
        axis_b.mapping = vec![[200.0, 40.0], [800.0, 160.0]];

        match merge_axis(&axis_a.into(), &axis_b.clone().into()) {
            AxisKind::Continuous(merged) => {
                assert_eq!(merged.default_value, 500.0);
                assert_eq!(merged.mapping, axis_b.mapping);
                assert_eq!((merged.min_value, merged.max_value), (100.0, 900.0));
            }
            other => panic!("unexpected axis {other:?}"),
        }

        let logs = logs.contents();
        assert!(logs.contains("Axis mappings should be the same; Weight"), "{logs}");
        assert!(logs.contains("Axis default values should be the same; Weight, A: 400, B: 500"), "{logs}");
    }

    #[tokio::test]
    async fn units_per_em_mismatch_uses_b() {
        let (logs, _guard) = capture_logs();
        let mut b = arabic();
        b.units_per_em = 2048;

        let merger = FontBackendMerger::new(
            Box::new(MemoryBackend::new(latin())),
            Box::new(MemoryBackend::new(b.clone())),
        );
        assert_eq!(merger.get_units_per_em().await.unwrap(), 2048);
        assert!(logs.contents().contains("different units-per-em; A: 1000, B: 2048"));

        let warnings_before = logs.contents().matches("units-per-em").count();
        let merger = FontBackendMerger::new(Box::new(NullBackend), Box::new(MemoryBackend::new(b)));
        assert_eq!(merger.get_units_per_em().await.unwrap(), 2048);
        assert_eq!(logs.contents().matches("units-per-em").count(), warnings_before);
    }

    #[derive(Default)]
    struct CallCounts {
        glyph_map: AtomicUsize,
        axes: AtomicUsize,
        sources: AtomicUsize,
    }

    /// Counts the queries the merger memoizes.
    struct CountingBackend {
        inner: MemoryBackend,
        counts: Arc<CallCounts>,
    }

    impl CountingBackend {
        fn boxed(font: Font, counts: &Arc<CallCounts>) -> Box<dyn ReadableFontBackend> {
            Box::new(Self {
                inner: MemoryBackend::new(font),
                counts: Arc::clone(counts),
            })
        }
    }

    #[async_trait]
    impl ReadableFontBackend for CountingBackend {
        async fn get_glyph(&self, glyph_name: &str) -> Result<Option<VariableGlyph>> {
            self.inner.get_glyph(glyph_name).await
        }

        async fn get_font_info(&self) -> Result<FontInfo> {
            self.inner.get_font_info().await
        }

        async fn get_axes(&self) -> Result<Axes> {
            self.counts.axes.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.get_axes().await
        }

        async fn get_sources(&self) -> Result<IndexMap<String, FontSource>> {
            self.counts.sources.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.get_sources().await
        }

        async fn get_glyph_map(&self) -> Result<GlyphMap> {
            self.counts.glyph_map.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            self.inner.get_glyph_map().await
        }

        async fn get_kerning(&self) -> Result<BTreeMap<String, KerningTable>> {
            self.inner.get_kerning().await
        }

        async fn get_features(&self) -> Result<OpenTypeFeatures> {
            self.inner.get_features().await
        }

        async fn get_custom_data(&self) -> Result<CustomData> {
            self.inner.get_custom_data().await
        }

        async fn get_units_per_em(&self) -> Result<u32> {
            self.inner.get_units_per_em().await
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_calls_share_one_computation() {
        let counts_a = Arc::new(CallCounts::default());
        let counts_b = Arc::new(CallCounts::default());
        let merger = Arc::new(FontBackendMerger::new(
            CountingBackend::boxed(latin(), &counts_a),
            CountingBackend::boxed(arabic(), &counts_b),
        ));

        let tasks: Vec<_> = (0..4)
            .map(|_| {
                let merger = Arc::clone(&merger);
                tokio::spawn(async move {
                    let (sources, axes, kerning) = tokio::join!(
                        merger.get_sources(),
                        merger.get_axes(),
                        merger.get_kerning()
                    );
                    (sources.unwrap(), axes.unwrap(), kerning.unwrap())
                })
            })
            .collect();

        let mut results = Vec::new();
        for task in tasks {
            results.push(task.await.unwrap());
        }
        assert!(results.windows(2).all(|pair| pair[0] == pair[1]));

        for counts in [&counts_a, &counts_b] {
            assert_eq!(counts.glyph_map.load(Ordering::SeqCst), 1);
            assert_eq!(counts.axes.load(Ordering::SeqCst), 1);
            assert_eq!(counts.sources.load(Ordering::SeqCst), 1);
        }
    }
}
