//! End-to-end scenarios across backends, merger and commands

#[cfg(test)]
fn mixed_font() -> crate::font_source::Font {
    use crate::font_source::{Font, OpenTypeFeatures};
    use crate::kerning::direction::test_data::{mixed_glyph_map, MIXED_FEATURES};
    use crate::kerning::table::test_data::mixed_direction_table;

    let mut font = Font {
        glyph_map: mixed_glyph_map(),
        features: OpenTypeFeatures::fea(MIXED_FEATURES),
        ..Default::default()
    };
    font.kerning.insert("kern".into(), mixed_direction_table());
    font
}

#[cfg(test)]
mod command_tests {
    use super::mixed_font;
    use crate::backend::json::{load_font, write_font};
    use crate::core::cli::Command;
    use crate::core::commands::{run_command, split_font_kerning, SplitKerningOutput};
    use crate::core::config::Settings;
    use crate::error::FontMergeError;
    use crate::kerning::direction::test_data::mixed_directions;
    use crate::kerning::table::test_data::mixed_direction_table;
    use crate::kerning::{
        flip_kerning_direction, split_kerning_by_direction, subset_kern_table, KerningTable,
    };

    #[tokio::test]
    async fn split_kerning_writes_both_directions() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("mixed.json");
        let output = dir.path().join("split.json");
        write_font(&font_path, &mixed_font(), false).await.unwrap();

        let command = Command::SplitKerning {
            font: font_path,
            kern_type: None,
            output: output.clone(),
            flip_rtl: true,
        };
        run_command(command, &Settings::default()).await.unwrap();

        let written: SplitKerningOutput =
            serde_json::from_slice(&tokio::fs::read(&output).await.unwrap()).unwrap();
        let (ltr, rtl) = split_kerning_by_direction(&mixed_direction_table(), &mixed_directions());
        assert_eq!(written.ltr, ltr);
        assert_eq!(written.rtl, flip_kerning_direction(&rtl));
        assert_eq!(written.rtl.values["@beh"]["@alef"], vec![Some(-11.0)]);
    }

    #[tokio::test]
    async fn flip_kerning_writes_flipped_table() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("mixed.json");
        let output = dir.path().join("flipped.json");
        write_font(&font_path, &mixed_font(), true).await.unwrap();

        let command = Command::FlipKerning {
            font: font_path,
            kern_type: Some("kern".into()),
            output: output.clone(),
        };
        run_command(command, &Settings::default()).await.unwrap();

        let written: KerningTable =
            serde_json::from_slice(&tokio::fs::read(&output).await.unwrap()).unwrap();
        assert_eq!(flip_kerning_direction(&written), mixed_direction_table());
    }

    #[test]
    fn missing_kern_type_is_reported() {
        match split_font_kerning(&mixed_font(), "vkrn", false) {
            Err(FontMergeError::MissingKernType(kern_type)) => assert_eq!(kern_type, "vkrn"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_kern_type_fails_the_command() {
        let dir = tempfile::tempdir().unwrap();
        let font_path = dir.path().join("mixed.json");
        write_font(&font_path, &mixed_font(), false).await.unwrap();

        let settings = Settings {
            kern_type: "vkrn".into(),
            ..Default::default()
        };
        let command = Command::FlipKerning {
            font: font_path,
            kern_type: None,
            output: dir.path().join("out.json"),
        };
        let error = run_command(command, &settings).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<FontMergeError>(),
            Some(FontMergeError::MissingKernType(_))
        ));
        assert!(!dir.path().join("out.json").exists());
    }

    #[tokio::test]
    async fn merge_command_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let latin_path = dir.path().join("latin.json");
        let arabic_path = dir.path().join("arabic.ufo");
        let output = dir.path().join("out").join("merged.json");

        let mut latin = mixed_font();
        latin.glyph_map.retain(|name, _| !name.ends_with("-ar") && !name.contains("-ar."));
        latin.kerning.insert(
            "kern".into(),
            subset_kern_table(
                &mixed_direction_table(),
                &latin.glyph_map.keys().cloned().collect(),
            ),
        );
        write_font(&latin_path, &latin, false).await.unwrap();

        let mut ufo = norad::Font::new();
        for (name, code_point) in [("alef-ar", '\u{0627}'), ("period", '.')] {
            let mut glyph = norad::Glyph::new(name);
            glyph.codepoints.insert(code_point);
            ufo.default_layer_mut().insert_glyph(glyph);
        }
        ufo.save(&arabic_path).unwrap();

        let command = Command::Merge {
            input_a: latin_path,
            input_b: arabic_path,
            output: output.clone(),
            no_duplicate_warnings: false,
        };
        run_command(command, &Settings::default()).await.unwrap();

        let merged = load_font(&output).await.unwrap();
        assert!(merged.glyph_map.contains_key("alef-ar"));
        assert!(merged.glyph_map.contains_key("A"));
        assert_eq!(merged.glyph_map["period"], vec!['.' as u32]);
        assert!(merged.glyphs.contains_key("period"));
        // latin pairs against "period" now belong to the UFO's glyph
        let kern = &merged.kerning["kern"];
        assert!(kern.values["F"].get("period").is_none());
        assert!(kern.validate().is_ok());
        assert_eq!(merged.sources.len(), 1);
    }
}

#[cfg(test)]
mod merger_tests {
    use super::mixed_font;
    use crate::backend::{read_full_font, FontBackendMerger, MemoryBackend, NullBackend};
    use crate::font_source::Font;

    fn split_font() -> (Font, Font) {
        let font = mixed_font();
        let mut latin = Font::default();
        let mut arabic = Font::default();
        for (name, code_points) in &font.glyph_map {
            let target = if name.contains("-ar") { &mut arabic } else { &mut latin };
            target.glyph_map.insert(name.clone(), code_points.clone());
        }
        (latin, arabic)
    }

    #[tokio::test]
    async fn merging_is_nestable() {
        let (latin, arabic) = split_font();

        let direct = FontBackendMerger::new(
            Box::new(MemoryBackend::new(latin.clone())),
            Box::new(MemoryBackend::new(arabic.clone())),
        );
        let nested = FontBackendMerger::new(
            Box::new(FontBackendMerger::new(
                Box::new(NullBackend),
                Box::new(MemoryBackend::new(latin)),
            )),
            Box::new(MemoryBackend::new(arabic)),
        );

        let direct = read_full_font(&direct).await.unwrap();
        let nested = read_full_font(&nested).await.unwrap();
        assert_eq!(direct, nested);
        assert_eq!(direct.glyph_map, mixed_font().glyph_map);
    }
}
