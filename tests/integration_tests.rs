//! Integration tests for dualsub
//!
//! These tests exercise the subtitle transforms and track matching through
//! the public API, using real files in temporary directories.

use dualsub::mkv::{extension_for_codec, match_tracks, parse_identify_json, SubtitleTrack};
use dualsub::subtitle::{
    cues, merge_items, merge_subtitles, read_subtitle_file, shift_items, shift_subtitles, srt, Cue,
    SubtitleItem, SubtitleSource,
};
use dualsub::DualsubError;

use std::path::Path;

fn write(path: &Path, content: &str) {
    std::fs::write(path, content).unwrap();
}

// ============================================================================
// Merge Tests
// ============================================================================

mod merge_tests {
    use super::*;

    #[test]
    fn test_two_color_merge_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.srt");
        let b = dir.path().join("b.srt");
        let out = dir.path().join("merged.srt");
        write(&a, "1\n00:00:00,000 --> 00:00:01,000\nhi\n");
        write(&b, "1\n00:00:00,500 --> 00:00:01,500\nyo\n");

        merge_subtitles(
            &SubtitleSource::new(&a).with_color("white"),
            &SubtitleSource::new(&b).with_color("yellow"),
            &out,
        )
        .unwrap();

        let merged = read_subtitle_file(&out).unwrap();
        assert_eq!(
            merged,
            vec![
                SubtitleItem::Cue(Cue::new(0, 1000, "<font color=\"white\">hi</font>")),
                SubtitleItem::Cue(Cue::new(500, 1500, "<font color=\"yellow\">yo</font>")),
            ]
        );
    }

    #[test]
    fn test_merge_is_sorted_and_keeps_every_cue() {
        let a: Vec<SubtitleItem> = (0..20)
            .map(|i| SubtitleItem::Cue(Cue::new((i * 737) % 5000, 6000, format!("a{i}"))))
            .collect();
        let b: Vec<SubtitleItem> = (0..15)
            .map(|i| SubtitleItem::Cue(Cue::new((i * 411) % 5000, 6000, format!("b{i}"))))
            .collect();

        let merged = merge_items(a.clone(), b.clone());
        assert_eq!(cues(&merged).count(), a.len() + b.len());

        let merged_cues: Vec<&Cue> = cues(&merged).collect();
        for pair in merged_cues.windows(2) {
            assert!(pair[0].start <= pair[1].start);
            if pair[0].start == pair[1].start && pair[0].text.starts_with('b') {
                assert!(!pair[1].text.starts_with('a'), "b cue ahead of a cue at equal start");
            }
        }
    }

    #[test]
    fn test_merge_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.srt");
        write(&a, "1\n00:00:00,000 --> 00:00:01,000\nhi\n");

        let result = merge_subtitles(
            &SubtitleSource::new(&a),
            &SubtitleSource::new(dir.path().join("missing.srt")),
            &dir.path().join("out.srt"),
        );
        assert!(matches!(result, Err(DualsubError::FileNotFound(_))));
    }
}

// ============================================================================
// Shift Tests
// ============================================================================

mod shift_tests {
    use super::*;

    #[test]
    fn test_shift_to_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.srt");
        let output = dir.path().join("out.srt");
        write(&input, "1\n00:00:01,000 --> 00:00:02,000\none\n");

        shift_subtitles(2500, &input, &output).unwrap();

        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "1\n00:00:03,500 --> 00:00:04,500\none\n"
        );
        // Input untouched
        assert_eq!(
            std::fs::read_to_string(&input).unwrap(),
            "1\n00:00:01,000 --> 00:00:02,000\none\n"
        );
    }

    #[test]
    fn test_shift_round_trip_through_srt() {
        let original = srt::parse(
            "1\n00:00:00,100 --> 00:00:00,900\na\n\n2\n01:00:00,000 --> 01:00:01,000\nb\n",
        )
        .unwrap();

        for offset in [1_i64, -1, 500, -500, 86_400_000, -86_400_000] {
            let shifted = srt::parse(&srt::format(&shift_items(&original, offset).unwrap())).unwrap();
            let back = shift_items(&shifted, -offset).unwrap();
            assert_eq!(back, original, "offset {offset}");
        }
    }

    #[test]
    fn test_shift_zero_always_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.srt");
        write(&input, "1\n00:00:01,000 --> 00:00:02,000\none\n");

        let result = shift_subtitles(0, &input, &input);
        assert!(matches!(result, Err(DualsubError::InvalidOffset)));
    }
}

// ============================================================================
// Track Tests
// ============================================================================

mod track_tests {
    use super::*;

    fn identify(tracks: &str) -> String {
        format!(r#"{{"container": {{"type": "Matroska"}}, "tracks": [{}]}}"#, tracks)
    }

    #[test]
    fn test_match_across_files_ignores_ids() {
        let first = parse_identify_json(
            "mkvmerge",
            &identify(
                r#"{"id": 2, "type": "subtitles", "codec": "SubRip/SRT", "properties": {"language": "eng"}},
                   {"id": 3, "type": "subtitles", "codec": "SubRip/SRT", "properties": {"language": "jpn"}}"#,
            ),
        )
        .unwrap();
        let second = parse_identify_json(
            "mkvmerge",
            &identify(
                r#"{"id": 1, "type": "audio", "codec": "AAC"},
                   {"id": 4, "type": "subtitles", "codec": "SubRip/SRT", "properties": {"language": "jpn"}},
                   {"id": 5, "type": "subtitles", "codec": "SubRip/SRT", "properties": {"language": "eng"}}"#,
            ),
        )
        .unwrap();

        let result = match_tracks(&first, &second);
        assert!(result.all_found);
        let ids: Vec<u64> = result.found.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![5, 4]);
    }

    #[test]
    fn test_forced_flag_breaks_match() {
        let targets = parse_identify_json(
            "mkvmerge",
            &identify(r#"{"id": 2, "type": "subtitles", "codec": "SubRip/SRT", "properties": {"language": "eng"}}"#),
        )
        .unwrap();
        let candidates = parse_identify_json(
            "mkvmerge",
            &identify(
                r#"{"id": 2, "type": "subtitles", "codec": "SubRip/SRT", "properties": {"language": "eng", "forced_track": true}}"#,
            ),
        )
        .unwrap();

        assert!(!match_tracks(&targets, &candidates).all_found);
    }

    #[test]
    fn test_equivalence_symmetry_over_variants() {
        let base = SubtitleTrack {
            id: 0,
            track_type: "subtitles".to_string(),
            codec: "SubRip/SRT".to_string(),
            language: Some("eng".to_string()),
            track_name: None,
            is_default: false,
            is_forced: false,
        };
        let mut variants = vec![base.clone()];
        for flip in 0..4 {
            let mut v = base.clone();
            v.id = flip + 10;
            match flip {
                0 => v.language = None,
                1 => v.track_name = Some("Signs".to_string()),
                2 => v.is_default = true,
                _ => v.codec = "HDMV PGS".to_string(),
            }
            variants.push(v);
        }

        for a in &variants {
            assert!(a.is_equivalent(a));
            for b in &variants {
                assert_eq!(a.is_equivalent(b), b.is_equivalent(a));
            }
        }
    }

    #[test]
    fn test_extension_table() {
        assert_eq!(extension_for_codec("SubStationAlpha"), ".ass");
        assert_eq!(extension_for_codec("HDMV PGS"), ".sup");
        assert_eq!(extension_for_codec("VobSub"), ".sub");
        assert_eq!(extension_for_codec("S_TEXT/UTF8"), ".srt");
    }
}
