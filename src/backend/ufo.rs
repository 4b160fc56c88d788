//! Read-only UFO import
//!
//! A UFO holds a single master, so the result has no axes and exactly one
//! source. Kerning groups are recognized by their `public.kern1.` and
//! `public.kern2.` prefixes; other groups are not kerning data and are left
//! out.

use crate::error::{FontMergeError, Result};
use crate::font_source::{
    Font, FontInfo, FontSource, GlyphMap, GlyphSource, LineMetric, OpenTypeFeatures,
    VariableGlyph,
};
use crate::kerning::table::group_key;
use crate::kerning::KerningTable;
use indexmap::IndexMap;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const KERN1_PREFIX: &str = "public.kern1.";
const KERN2_PREFIX: &str = "public.kern2.";

/// Identifier of the one source of an imported UFO.
pub const UFO_SOURCE_IDENTIFIER: &str = "default";

/// Load a UFO font from disk and convert it to the interchange model.
pub fn load_ufo(path: &Path) -> Result<Font> {
    let ufo = norad::Font::load(path).map_err(|source| FontMergeError::Ufo {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(font_from_ufo(&ufo))
}

pub fn font_from_ufo(ufo: &norad::Font) -> Font {
    let info = &ufo.font_info;
    let source_name = info
        .style_name
        .clone()
        .unwrap_or_else(|| "Regular".to_string());

    let mut glyphs = BTreeMap::new();
    let mut glyph_map = GlyphMap::new();
    for glyph in ufo.default_layer().iter() {
        let name = glyph.name().to_string();
        glyph_map.insert(
            name.clone(),
            glyph.codepoints.iter().map(|c| c as u32).collect(),
        );
        glyphs.insert(name.clone(), variable_glyph_from_ufo(glyph, &source_name));
    }

    let mut sources = IndexMap::new();
    sources.insert(
        UFO_SOURCE_IDENTIFIER.to_string(),
        source_from_ufo_info(info, &source_name),
    );

    let mut kerning = BTreeMap::new();
    let table = kerning_from_ufo(ufo);
    if !table.is_empty() {
        kerning.insert("kern".to_string(), table);
    }

    debug!(
        "Converted UFO with {} glyphs and {} kerning pairs",
        glyphs.len(),
        ufo.kerning.values().map(BTreeMap::len).sum::<usize>()
    );

    Font {
        units_per_em: info
            .units_per_em
            .map(|units| units.as_f64().round() as u32)
            .unwrap_or(1000),
        font_info: font_info_from_ufo(info),
        glyphs,
        glyph_map,
        axes: Default::default(),
        sources,
        kerning,
        features: OpenTypeFeatures::fea(ufo.features.clone()),
        custom_data: Default::default(),
    }
}

fn font_info_from_ufo(info: &norad::FontInfo) -> FontInfo {
    FontInfo {
        family_name: info.family_name.clone(),
        version_major: info.version_major,
        version_minor: info.version_minor.and_then(|minor| i32::try_from(minor).ok()),
        copyright: info.copyright.clone(),
        trademark: info.trademark.clone(),
        description: info.open_type_name_description.clone(),
        designer: info.open_type_name_designer.clone(),
        designer_url: info.open_type_name_designer_url.clone(),
        manufacturer: info.open_type_name_manufacturer.clone(),
        manufacturer_url: info.open_type_name_manufacturer_url.clone(),
        license_description: info.open_type_name_license.clone(),
        license_info_url: info.open_type_name_license_url.clone(),
        vendor_id: info.open_type_os2_vendor_id.clone(),
        ..Default::default()
    }
}

fn source_from_ufo_info(info: &norad::FontInfo, source_name: &str) -> FontSource {
    let metric = |value: f64| LineMetric {
        value,
        ..Default::default()
    };

    let mut line_metrics = BTreeMap::new();
    line_metrics.insert("baseline".to_string(), metric(0.0));
    let optional_metrics = [
        ("ascender", info.ascender),
        ("descender", info.descender),
        ("xHeight", info.x_height),
        ("capHeight", info.cap_height),
    ];
    for (name, value) in optional_metrics {
        if let Some(value) = value {
            line_metrics.insert(name.to_string(), metric(value));
        }
    }

    FontSource {
        name: source_name.to_string(),
        line_metrics_horizontal_layout: line_metrics,
        italic_angle: info.italic_angle.unwrap_or(0.0),
        ..Default::default()
    }
}

fn variable_glyph_from_ufo(glyph: &norad::Glyph, source_name: &str) -> VariableGlyph {
    let layer_name = UFO_SOURCE_IDENTIFIER.to_string();
    let mut variable_glyph = VariableGlyph::new(glyph.name().to_string());
    variable_glyph.sources.push(GlyphSource {
        name: source_name.to_string(),
        layer_name: layer_name.clone(),
        location: Default::default(),
        location_base: None,
        inactive: false,
        custom_data: Default::default(),
    });
    variable_glyph
        .layers
        .insert(layer_name, json!({ "glyph": static_glyph_json(glyph) }));
    variable_glyph
}

/// Outline, components and advance of one UFO glyph as layer JSON.
fn static_glyph_json(glyph: &norad::Glyph) -> Value {
    let contours: Vec<Value> = glyph.contours.iter().map(contour_json).collect();
    let components: Vec<Value> = glyph
        .components
        .iter()
        .map(|component| {
            let t = &component.transform;
            json!({
                "name": component.base.to_string(),
                "transformation": {
                    "xx": t.x_scale, "xy": t.xy_scale,
                    "yx": t.yx_scale, "yy": t.y_scale,
                    "dx": t.x_offset, "dy": t.y_offset,
                },
            })
        })
        .collect();

    json!({
        "path": {"contours": contours},
        "components": components,
        "xAdvance": glyph.width,
    })
}

fn contour_json(contour: &norad::Contour) -> Value {
    let points = &contour.points;
    let is_closed = points
        .first()
        .map_or(true, |point| point.typ != norad::PointType::Move);

    let json_points: Vec<Value> = points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let mut json_point = json!({"x": point.x, "y": point.y});
            if point.typ == norad::PointType::OffCurve {
                // Off-curve points take their flavor from the next on-curve point
                let next_on_curve = points
                    .iter()
                    .cycle()
                    .skip(index + 1)
                    .take(points.len())
                    .find(|next| next.typ != norad::PointType::OffCurve);
                let flavor = match next_on_curve.map(|next| &next.typ) {
                    Some(norad::PointType::QCurve) | None => "quad",
                    _ => "cubic",
                };
                json_point["type"] = json!(flavor);
            } else if point.smooth {
                json_point["smooth"] = json!(true);
            }
            json_point
        })
        .collect();

    json!({"points": json_points, "isClosed": is_closed})
}

/// Convert UFO groups and kerning into a single-source kerning table.
fn kerning_from_ufo(ufo: &norad::Font) -> KerningTable {
    let mut groups_side1 = BTreeMap::new();
    let mut groups_side2 = BTreeMap::new();
    for (group_name, members) in &ufo.groups {
        let group_name = group_name.to_string();
        let members: Vec<String> = members.iter().map(|member| member.to_string()).collect();
        if let Some(name) = group_name.strip_prefix(KERN1_PREFIX) {
            groups_side1.insert(name.to_string(), members);
        } else if let Some(name) = group_name.strip_prefix(KERN2_PREFIX) {
            groups_side2.insert(name.to_string(), members);
        }
    }

    let mut values = BTreeMap::new();
    for (left, right_dict) in &ufo.kerning {
        let left = pair_key(&left.to_string(), KERN1_PREFIX);
        let right_dict: BTreeMap<String, Vec<Option<f64>>> = right_dict
            .iter()
            .map(|(right, value)| (pair_key(&right.to_string(), KERN2_PREFIX), vec![Some(*value)]))
            .collect();
        values.insert(left, right_dict);
    }

    KerningTable {
        groups_side1,
        groups_side2,
        source_identifiers: vec![UFO_SOURCE_IDENTIFIER.to_string()],
        values,
    }
}

fn pair_key(ufo_key: &str, prefix: &str) -> String {
    match ufo_key.strip_prefix(prefix) {
        Some(group_name) => group_key(group_name),
        None => ufo_key.to_string(),
    }
}
