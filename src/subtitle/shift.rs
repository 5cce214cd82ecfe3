use super::{read_subtitle_file, write_subtitle_file, SubtitleItem};
use crate::error::{DualsubError, Result};
use std::path::Path;
use tracing::info;

/// Move every cue by `offset_ms`. Results below zero are kept as is.
pub fn shift_items(items: &[SubtitleItem], offset_ms: i64) -> Result<Vec<SubtitleItem>> {
    items
        .iter()
        .map(|item| match item {
            SubtitleItem::Cue(cue) => cue
                .shifted(offset_ms)
                .map(SubtitleItem::Cue)
                .ok_or(DualsubError::OffsetOverflow { offset: offset_ms }),
            header => Ok(header.clone()),
        })
        .collect()
}

/// Shift all cues of `input` by `offset_ms` and write to `output`.
///
/// `output` may be the same path as `input`.
pub fn shift_subtitles(offset_ms: i64, input: &Path, output: &Path) -> Result<usize> {
    if offset_ms == 0 {
        return Err(DualsubError::InvalidOffset);
    }

    let items = read_subtitle_file(input)?;
    let shifted = shift_items(&items, offset_ms)?;
    write_subtitle_file(output, &shifted)?;

    let cue_count = super::cues(&shifted).count();
    info!(
        "Shifted {} cues by {}ms into {}",
        cue_count,
        offset_ms,
        output.display()
    );
    Ok(cue_count)
}
