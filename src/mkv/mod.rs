pub mod extract;
pub mod inspect;
pub mod matcher;

pub use extract::{extension_for_codec, output_file_name, SubtitleExtractor};
pub use inspect::{parse_identify_json, TrackInspector};
pub use matcher::{match_tracks, MatchResult};

use std::fmt;

/// Track type reported by mkvmerge for subtitle tracks.
pub const SUBTITLES: &str = "subtitles";

/// A subtitle track as reported by the demuxer for one container file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleTrack {
    /// Demuxer-assigned id, only unique within one file.
    pub id: u64,
    pub track_type: String,
    pub codec: String,
    pub language: Option<String>,
    pub track_name: Option<String>,
    pub is_default: bool,
    pub is_forced: bool,
}

impl SubtitleTrack {
    /// Whether `other` describes the same track in a different file.
    ///
    /// Every field except `id` takes part, since ids are not stable across files.
    pub fn is_equivalent(&self, other: &SubtitleTrack) -> bool {
        self.track_type == other.track_type
            && self.codec == other.codec
            && self.language == other.language
            && self.track_name == other.track_name
            && self.is_default == other.is_default
            && self.is_forced == other.is_forced
    }

    pub fn language_or_empty(&self) -> &str {
        self.language.as_deref().unwrap_or("")
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} [{}]",
            self.id,
            self.codec,
            self.language.as_deref().unwrap_or("und")
        )?;
        if let Some(ref name) = self.track_name {
            write!(f, " \"{}\"", name)?;
        }
        if self.is_default {
            write!(f, " (default)")?;
        }
        if self.is_forced {
            write!(f, " (forced)")?;
        }
        Ok(())
    }
}
