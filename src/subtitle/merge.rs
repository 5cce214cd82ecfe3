use super::{read_subtitle_file, write_subtitle_file, SubtitleItem};
use crate::error::Result;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_FIRST_COLOR: &str = "white";
pub const DEFAULT_SECOND_COLOR: &str = "yellow";

/// One input of a merge: a subtitle file and the color its cues get.
#[derive(Debug, Clone)]
pub struct SubtitleSource {
    pub path: PathBuf,
    pub color: Option<String>,
}

impl SubtitleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

fn colorize(items: Vec<SubtitleItem>, color: &str) -> Vec<SubtitleItem> {
    items
        .into_iter()
        .map(|item| match item {
            SubtitleItem::Cue(cue) => SubtitleItem::Cue(cue.colored(color)),
            header => header,
        })
        .collect()
}

/// Concatenate `first` and `second`, then stable-sort by start time.
///
/// At equal start, headers go before cues, and otherwise items of `first`
/// stay ahead of items of `second`. A header written after a cue would be
/// read back as part of that cue's text.
pub fn merge_items(first: Vec<SubtitleItem>, second: Vec<SubtitleItem>) -> Vec<SubtitleItem> {
    let mut merged = first;
    merged.extend(second);
    merged.sort_by_key(|item| (item.start(), item.as_cue().is_some()));
    merged
}

/// Merge two SRT files into one, each cue colored by its source.
pub fn merge_subtitles(
    first: &SubtitleSource,
    second: &SubtitleSource,
    output: &Path,
) -> Result<usize> {
    let first_items = read_subtitle_file(&first.path)?;
    let second_items = read_subtitle_file(&second.path)?;

    let first_color = first.color.as_deref().unwrap_or(DEFAULT_FIRST_COLOR);
    let second_color = second.color.as_deref().unwrap_or(DEFAULT_SECOND_COLOR);

    let merged = merge_items(
        colorize(first_items, first_color),
        colorize(second_items, second_color),
    );

    write_subtitle_file(output, &merged)?;

    let cue_count = super::cues(&merged).count();
    info!(
        "Merged {} and {} into {} ({} cues)",
        first.path.display(),
        second.path.display(),
        output.display(),
        cue_count
    );
    Ok(cue_count)
}
