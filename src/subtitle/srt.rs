// SRT subtitle format
use super::{Cue, SubtitleItem};
use crate::error::{DualsubError, Result};
use regex::Regex;
use std::sync::LazyLock;

static TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(-?)(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})\s*-->\s*(-?)(\d+):(\d{1,2}):(\d{1,2})[,.](\d{1,3})",
    )
    .expect("Invalid timestamp regex")
});

/// Parse SRT text into headers and cues.
///
/// Blocks are separated by blank lines. Content before the first cue is kept
/// as a header; a block after a cue that is not itself a cue belongs to the
/// previous cue's text.
pub fn parse(content: &str) -> Result<Vec<SubtitleItem>> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut items: Vec<SubtitleItem> = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut block_start = 1;

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            if !block.is_empty() {
                push_block(&mut items, &block, block_start)?;
                block.clear();
            }
            continue;
        }
        if block.is_empty() {
            block_start = i + 1;
        }
        block.push(line);
    }

    if !block.is_empty() {
        push_block(&mut items, &block, block_start)?;
    }

    Ok(items)
}

fn push_block(items: &mut Vec<SubtitleItem>, block: &[&str], line_no: usize) -> Result<()> {
    // Index line is optional
    let timing_at = if block[0].trim().parse::<u64>().is_ok() && block.len() > 1 {
        1
    } else {
        0
    };
    let timing_line = block[timing_at].trim();

    if let Some((start, end)) = parse_timing(timing_line) {
        let text = block[timing_at + 1..].join("\n");
        items.push(SubtitleItem::Cue(Cue::new(start, end, text)));
        return Ok(());
    }

    if timing_line.contains("-->") {
        return Err(DualsubError::Parse(format!(
            "bad timing at line {}: {}",
            line_no + timing_at,
            timing_line
        )));
    }

    match items.last_mut() {
        Some(SubtitleItem::Cue(cue)) => {
            cue.text.push_str("\n\n");
            cue.text.push_str(&block.join("\n"));
        }
        _ => items.push(SubtitleItem::Header(block.join("\n"))),
    }
    Ok(())
}

fn parse_timing(line: &str) -> Option<(i64, i64)> {
    let caps = TIMESTAMP_REGEX.captures(line)?;
    let start = timestamp_from_captures(&caps, 1)?;
    let end = timestamp_from_captures(&caps, 6)?;
    Some((start, end))
}

fn timestamp_from_captures(caps: &regex::Captures, first: usize) -> Option<i64> {
    let negative = !caps.get(first)?.as_str().is_empty();
    let hours: i64 = caps.get(first + 1)?.as_str().parse().ok()?;
    let minutes: i64 = caps.get(first + 2)?.as_str().parse().ok()?;
    let seconds: i64 = caps.get(first + 3)?.as_str().parse().ok()?;

    let frac = caps.get(first + 4)?.as_str();
    let scale = match frac.len() {
        1 => 100,
        2 => 10,
        _ => 1,
    };
    let millis: i64 = frac.parse::<i64>().ok()? * scale;

    let total = hours
        .checked_mul(3600)?
        .checked_add(minutes * 60 + seconds)?
        .checked_mul(1000)?
        .checked_add(millis)?;
    Some(if negative { -total } else { total })
}

/// Format milliseconds as `HH:MM:SS,mmm`, with a leading `-` below zero.
pub fn format_timestamp(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let millis = ms % 1000;
    format!("{sign}{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Serialize items to SRT. Cues are numbered from 1 in output order.
pub fn format(items: &[SubtitleItem]) -> String {
    let mut index = 0;
    items
        .iter()
        .map(|item| match item {
            SubtitleItem::Header(text) => format!("{}\n", text),
            SubtitleItem::Cue(cue) => {
                index += 1;
                format!(
                    "{}\n{} --> {}\n{}\n",
                    index,
                    format_timestamp(cue.start),
                    format_timestamp(cue.end),
                    cue.text
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
