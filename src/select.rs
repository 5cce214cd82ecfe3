//! Interactive choice of subtitle tracks.
//!
//! This is the only place the pipeline waits on a human. Each prompt loops
//! until the answer is a valid, not yet chosen, 1-based track number.

use crate::error::{DualsubError, Result};
use crate::mkv::SubtitleTrack;
use console::style;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Input;
use std::io::{BufRead, Write};

pub trait TrackSelector {
    /// Collect up to `count` distinct tracks from `candidates`.
    ///
    /// Returns fewer than `count` only when there are fewer candidates.
    fn select(&mut self, candidates: &[SubtitleTrack], count: usize) -> Result<Vec<SubtitleTrack>>;
}

/// Validate one answer. Returns the 0-based candidate index.
pub fn parse_selection(input: &str, candidate_count: usize, chosen: &[usize]) -> Result<usize> {
    let number: usize = input.trim().parse().map_err(|_| {
        DualsubError::InvalidSelectionInput(format!("'{}' is not a number", input.trim()))
    })?;

    if number == 0 || number > candidate_count {
        return Err(DualsubError::InvalidSelectionInput(format!(
            "enter a number between 1 and {}",
            candidate_count
        )));
    }

    let index = number - 1;
    if chosen.contains(&index) {
        return Err(DualsubError::InvalidSelectionInput(format!(
            "track {} is already selected",
            number
        )));
    }

    Ok(index)
}

/// One display line per candidate, numbered from 1.
pub fn track_lines(candidates: &[SubtitleTrack]) -> Vec<String> {
    candidates
        .iter()
        .enumerate()
        .map(|(i, track)| format!("{:>3}) {}", i + 1, track))
        .collect()
}

/// Prompts on the terminal with dialoguer.
#[derive(Debug, Default)]
pub struct TerminalSelector;

impl TrackSelector for TerminalSelector {
    fn select(&mut self, candidates: &[SubtitleTrack], count: usize) -> Result<Vec<SubtitleTrack>> {
        println!("\n{}", style("Subtitle tracks:").bold());
        for line in track_lines(candidates) {
            println!("  {}", style(line).cyan());
        }

        let theme = ColorfulTheme::default();
        let wanted = count.min(candidates.len());
        let mut chosen: Vec<usize> = Vec::with_capacity(wanted);

        while chosen.len() < wanted {
            let answer: String = Input::with_theme(&theme)
                .with_prompt(format!("Subtitle {} of {}", chosen.len() + 1, wanted))
                .validate_with(|s: &String| -> std::result::Result<(), String> {
                    parse_selection(s, candidates.len(), &chosen)
                        .map(|_| ())
                        .map_err(|e| e.to_string())
                })
                .interact_text()?;

            chosen.push(parse_selection(&answer, candidates.len(), &chosen)?);
        }

        Ok(chosen.into_iter().map(|i| candidates[i].clone()).collect())
    }
}

/// Reads answers line by line, for input that is not a terminal.
pub struct LineSelector<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineSelector<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{}: ", prompt)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(DualsubError::Prompt(
                "input ended before a track was selected".to_string(),
            ));
        }
        Ok(line)
    }
}

impl<R: BufRead, W: Write> TrackSelector for LineSelector<R, W> {
    fn select(&mut self, candidates: &[SubtitleTrack], count: usize) -> Result<Vec<SubtitleTrack>> {
        writeln!(self.writer, "Subtitle tracks:")?;
        for line in track_lines(candidates) {
            writeln!(self.writer, "  {}", line)?;
        }

        let wanted = count.min(candidates.len());
        let mut chosen: Vec<usize> = Vec::with_capacity(wanted);

        while chosen.len() < wanted {
            let prompt = format!("Subtitle {} of {}", chosen.len() + 1, wanted);
            let answer = self.ask(&prompt)?;
            match parse_selection(&answer, candidates.len(), &chosen) {
                Ok(index) => chosen.push(index),
                Err(e) => writeln!(self.writer, "{}", e)?,
            }
        }

        Ok(chosen.into_iter().map(|i| candidates[i].clone()).collect())
    }
}
