//! Substitution closure input for direction classification
//!
//! Direction classification only needs to know which glyph can turn into
//! which other glyph. [`FeatureCompiler`] is the seam to the feature
//! compiler; [`FeaCompiler`] compiles the feature code with `fea-rs` and
//! reads the substitution edges back out of the compiled GSUB table.

use crate::error::{FontMergeError, Result};
use crate::font_source::Axes;
use fea_rs::compile::{NopFeatureProvider, NopVariationInfo};
use fea_rs::parse::{SourceLoadError, SourceResolver};
use fea_rs::{Compiler, GlyphIdent, GlyphMap};
use read_fonts::tables::gsub::{SingleSubst, SubstitutionSubtables};
use read_fonts::types::GlyphId;
use read_fonts::{FontRef, ReadError, TableProvider};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::path::Path;
use std::sync::Arc;

/// Glyph name to the glyph names it may be substituted with.
pub type SubstitutionTable = BTreeMap<String, BTreeSet<String>>;

/// Compiles feature code far enough to extract substitution edges.
pub trait FeatureCompiler: Send + Sync {
    fn compile_substitutions(
        &self,
        feature_text: &str,
        glyph_order: &[String],
        axes: &Axes,
    ) -> Result<SubstitutionTable>;
}

/// Add `from -> to` to a substitution table.
pub fn add_substitution(table: &mut SubstitutionTable, from: &str, to: &str) {
    if from != to {
        table
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
    }
}

const FEATURE_FILE_NAME: &str = "features.fea";

/// Compiles feature code with `fea-rs`.
///
/// Single, multiple, alternate, ligature and reverse chaining lookups
/// contribute edges, also when they are only reachable from a contextual
/// lookup. Ligature components each get an edge to the ligature glyph.
/// Include statements are not resolved and fail the compilation.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeaCompiler;

impl FeatureCompiler for FeaCompiler {
    fn compile_substitutions(
        &self,
        feature_text: &str,
        glyph_order: &[String],
        _axes: &Axes,
    ) -> Result<SubstitutionTable> {
        let glyph_map: GlyphMap = glyph_order
            .iter()
            .map(|name| GlyphIdent::from(name.as_str()))
            .collect();
        let resolver = InMemoryResolver {
            path: OsString::from(FEATURE_FILE_NAME),
            text: feature_text.into(),
        };

        let binary = Compiler::<'_, NopFeatureProvider, NopVariationInfo>::new(FEATURE_FILE_NAME, &glyph_map)
            .with_resolver(resolver)
            .compile_binary()
            .map_err(|error| FontMergeError::FeatureCompile(error.to_string()))?;

        substitutions_from_binary(&binary, glyph_order)
            .map_err(|error| FontMergeError::FeatureCompile(error.to_string()))
    }
}

/// Serves the feature text as the only source file.
struct InMemoryResolver {
    path: OsString,
    text: Arc<str>,
}

impl SourceResolver for InMemoryResolver {
    fn get_contents(&self, path: &Path) -> Result<Arc<str>, SourceLoadError> {
        if path.as_os_str() == self.path.as_os_str() {
            Ok(self.text.clone())
        } else {
            Err(SourceLoadError::new(
                path.to_path_buf(),
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ))
        }
    }
}

fn substitutions_from_binary(
    binary: &[u8],
    glyph_order: &[String],
) -> Result<SubstitutionTable, ReadError> {
    let mut edges = EdgeCollector {
        glyph_order,
        table: SubstitutionTable::new(),
    };

    let font = FontRef::new(binary)?;
    let gsub = match font.gsub() {
        Ok(gsub) => gsub,
        Err(ReadError::TableIsMissing(_)) => return Ok(edges.table),
        Err(error) => return Err(error),
    };

    for lookup in gsub.lookup_list()?.lookups().iter() {
        match lookup?.subtables()? {
            SubstitutionSubtables::Single(subtables) => {
                for subtable in subtables.iter() {
                    match subtable? {
                        SingleSubst::Format1(table) => {
                            let delta = i32::from(table.delta_glyph_id());
                            for glyph in table.coverage()?.iter() {
                                let target = (glyph.to_u32() as i32 + delta) & 0xFFFF;
                                edges.add(glyph.into(), GlyphId::from(target as u32));
                            }
                        }
                        SingleSubst::Format2(table) => {
                            let coverage = table.coverage()?;
                            for (glyph, target) in
                                coverage.iter().zip(table.substitute_glyph_ids())
                            {
                                edges.add(glyph.into(), GlyphId::from(target.get()));
                            }
                        }
                    }
                }
            }
            SubstitutionSubtables::Multiple(subtables) => {
                for subtable in subtables.iter() {
                    let table = subtable?;
                    let coverage = table.coverage()?;
                    for (glyph, sequence) in coverage.iter().zip(table.sequences().iter()) {
                        for target in sequence?.substitute_glyph_ids() {
                            edges.add(glyph.into(), GlyphId::from(target.get()));
                        }
                    }
                }
            }
            SubstitutionSubtables::Alternate(subtables) => {
                for subtable in subtables.iter() {
                    let table = subtable?;
                    let coverage = table.coverage()?;
                    for (glyph, alternates) in coverage.iter().zip(table.alternate_sets().iter()) {
                        for target in alternates?.alternate_glyph_ids() {
                            edges.add(glyph.into(), GlyphId::from(target.get()));
                        }
                    }
                }
            }
            SubstitutionSubtables::Ligature(subtables) => {
                for subtable in subtables.iter() {
                    let table = subtable?;
                    let coverage = table.coverage()?;
                    for (first, ligatures) in coverage.iter().zip(table.ligature_sets().iter()) {
                        for ligature in ligatures?.ligatures().iter() {
                            let ligature = ligature?;
                            let target = GlyphId::from(ligature.ligature_glyph());
                            edges.add(first.into(), target);
                            for component in ligature.component_glyph_ids() {
                                edges.add(GlyphId::from(component.get()), target);
                            }
                        }
                    }
                }
            }
            SubstitutionSubtables::Reverse(subtables) => {
                for subtable in subtables.iter() {
                    let table = subtable?;
                    let coverage = table.coverage()?;
                    for (glyph, target) in coverage.iter().zip(table.substitute_glyph_ids()) {
                        edges.add(glyph.into(), GlyphId::from(target.get()));
                    }
                }
            }
            // contextual lookups only point at other lookups in the list
            SubstitutionSubtables::Contextual(_) | SubstitutionSubtables::ChainContextual(_) => {}
        }
    }
    Ok(edges.table)
}

struct EdgeCollector<'a> {
    glyph_order: &'a [String],
    table: SubstitutionTable,
}

impl EdgeCollector<'_> {
    fn name(&self, glyph: GlyphId) -> Option<&str> {
        self.glyph_order
            .get(glyph.to_u32() as usize)
            .map(String::as_str)
    }

    fn add(&mut self, from: GlyphId, to: GlyphId) {
        if let (Some(from), Some(to)) = (self.name(from), self.name(to)) {
            let (from, to) = (from.to_string(), to.to_string());
            add_substitution(&mut self.table, &from, &to);
        }
    }
}
