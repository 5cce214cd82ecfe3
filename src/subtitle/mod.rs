pub mod merge;
pub mod shift;
pub mod srt;

pub use merge::{merge_items, merge_subtitles, SubtitleSource};
pub use shift::{shift_items, shift_subtitles};

use crate::error::{DualsubError, Result};
use std::path::Path;

/// One timed subtitle entry. Times are signed milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    pub start: i64,
    pub end: i64,
    pub text: String,
}

impl Cue {
    pub fn new(start: i64, end: i64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
        }
    }

    /// Copy of this cue with its text wrapped in a font color tag.
    pub fn colored(&self, color: &str) -> Self {
        Self {
            start: self.start,
            end: self.end,
            text: format!("<font color=\"{}\">{}</font>", color, self.text),
        }
    }

    /// Copy moved by `offset_ms`, or `None` if either time overflows.
    pub fn shifted(&self, offset_ms: i64) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add(offset_ms)?,
            end: self.end.checked_add(offset_ms)?,
            text: self.text.clone(),
        })
    }
}

/// An element of a subtitle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtitleItem {
    /// Non-cue content, passed through untouched by every transform.
    Header(String),
    Cue(Cue),
}

impl SubtitleItem {
    /// Sort key; headers count as starting at 0.
    pub fn start(&self) -> i64 {
        match self {
            SubtitleItem::Header(_) => 0,
            SubtitleItem::Cue(cue) => cue.start,
        }
    }

    pub fn as_cue(&self) -> Option<&Cue> {
        match self {
            SubtitleItem::Cue(cue) => Some(cue),
            SubtitleItem::Header(_) => None,
        }
    }
}

/// Iterate over the cues of a parsed file, skipping headers.
pub fn cues(items: &[SubtitleItem]) -> impl Iterator<Item = &Cue> {
    items.iter().filter_map(SubtitleItem::as_cue)
}

/// Read and parse an SRT file.
///
/// Fails with `EmptyFile` when the file holds nothing but whitespace.
pub fn read_subtitle_file(path: &Path) -> Result<Vec<SubtitleItem>> {
    if !path.exists() {
        return Err(DualsubError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| DualsubError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    if content.trim().is_empty() {
        return Err(DualsubError::EmptyFile(path.to_path_buf()));
    }

    srt::parse(&content)
}

/// Serialize items as SRT and write them to `path`, replacing any existing file.
pub fn write_subtitle_file(path: &Path, items: &[SubtitleItem]) -> Result<()> {
    std::fs::write(path, srt::format(items))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colored_leaves_original_untouched() {
        let cue = Cue::new(0, 1000, "hi");
        let colored = cue.colored("white");
        assert_eq!(colored.text, "<font color=\"white\">hi</font>");
        assert_eq!(colored.start, 0);
        assert_eq!(colored.end, 1000);
        assert_eq!(cue.text, "hi");
    }

    #[test]
    fn test_shifted_overflow() {
        let cue = Cue::new(1000, 2000, "hi");
        assert_eq!(cue.shifted(-3000), Some(Cue::new(-2000, -1000, "hi")));
        assert_eq!(cue.shifted(i64::MAX), None);
        assert_eq!(Cue::new(i64::MIN + 5, 0, "x").shifted(-10), None);
    }

    #[test]
    fn test_header_start_is_zero() {
        let header = SubtitleItem::Header("NOTE".to_string());
        assert_eq!(header.start(), 0);
        assert!(header.as_cue().is_none());
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_subtitle_file(Path::new("/nonexistent/sub.srt"));
        assert!(matches!(result, Err(DualsubError::FileNotFound(_))));
    }

    #[test]
    fn test_read_whitespace_only_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.srt");
        std::fs::write(&path, "  \n\n\t\n").unwrap();

        match read_subtitle_file(&path) {
            Err(DualsubError::EmptyFile(p)) => assert_eq!(p, path),
            other => panic!("Expected EmptyFile error, got: {other:?}"),
        }
    }

    #[test]
    fn test_read_directory_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_subtitle_file(dir.path());
        assert!(matches!(result, Err(DualsubError::Read { .. })));
    }
}
