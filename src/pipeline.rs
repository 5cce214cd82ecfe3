use crate::config::Config;
use crate::error::{DualsubError, Result};
use crate::mkv::{
    extension_for_codec, match_tracks, output_file_name, SubtitleExtractor, SubtitleTrack,
    TrackInspector,
};
use crate::select::TrackSelector;
use crate::subtitle::{merge_subtitles, SubtitleSource};
use crate::tool::ToolRunner;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Extensions of the Matroska family handled by mkvextract.
pub const CONTAINER_EXTENSIONS: &[&str] = &["mkv", "mka", "mks", "mk3d", "webm"];

/// Tracks per file the batch merges into one output.
pub const MERGE_TRACK_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Inspecting,
    Matching,
    Selecting,
    Extracting,
    Merging,
    Done,
}

/// The last track selection, used to skip the prompt on following files.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    targets: Vec<SubtitleTrack>,
}

impl SelectionState {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[SubtitleTrack] {
        &self.targets
    }

    pub fn replace(&mut self, targets: Vec<SubtitleTrack>) {
        self.targets = targets;
    }
}

/// What happened to one container file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub source: PathBuf,
    pub tracks: Vec<SubtitleTrack>,
    /// Whether the user had to pick tracks for this file.
    pub prompted: bool,
    pub extracted: Vec<PathBuf>,
    pub merged: PathBuf,
    pub cues: usize,
}

#[derive(Debug)]
pub struct BatchResult {
    pub outcomes: Vec<FileOutcome>,
    pub total_time: Duration,
}

impl BatchResult {
    pub fn prompts(&self) -> usize {
        self.outcomes.iter().filter(|o| o.prompted).count()
    }

    pub fn matched(&self) -> usize {
        self.outcomes.len() - self.prompts()
    }
}

fn dir_error(dir: &Path, e: std::io::Error) -> DualsubError {
    match e.kind() {
        ErrorKind::PermissionDenied => DualsubError::PermissionDenied(dir.to_path_buf()),
        ErrorKind::NotFound => DualsubError::DirectoryNotFound(dir.to_path_buf()),
        _ => DualsubError::Io(e),
    }
}

/// Sorted container files directly inside `dir`.
pub fn list_container_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(DualsubError::DirectoryNotFound(dir.to_path_buf()));
    }

    let map_err = |e: std::io::Error| dir_error(dir, e);

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(map_err)? {
        let path = entry.map_err(map_err)?.path();

        if path.is_file() {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if CONTAINER_EXTENSIONS.contains(&ext.to_lowercase().as_str()) {
                    files.push(path);
                }
            }
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// `<dir>/<base>.<lang1><lang2><ext>` for the merged subtitle of `source`.
pub fn merged_output_path(dir: &Path, source: &Path, tracks: &[SubtitleTrack]) -> PathBuf {
    let base = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let languages: String = tracks.iter().map(|t| t.language_or_empty()).collect();
    let ext = tracks
        .first()
        .map(|t| extension_for_codec(&t.codec))
        .unwrap_or(".srt");

    dir.join(format!("{}.{}{}", base, languages, ext))
}

/// Inspect, select and extract tracks of a single file.
pub async fn extract_single(
    runner: &dyn ToolRunner,
    selector: &mut dyn TrackSelector,
    config: &Config,
    file: &Path,
    output_dir: &Path,
    count: usize,
) -> Result<Vec<PathBuf>> {
    let tracks = TrackInspector::new(runner, config.mkvmerge.as_str())
        .list_tracks(file)
        .await?;
    let selected = selector.select(&tracks, count)?;

    SubtitleExtractor::new(runner, config.mkvextract.as_str())
        .extract(file, &selected, output_dir)
        .await
}

/// Extracts and merges two subtitle tracks for every container in a directory.
///
/// Files are handled strictly in order: the tracks picked for one file are
/// looked up again in the next, and the user is only asked when they are not
/// all there. The first error aborts the batch.
pub struct BatchPipeline<'a> {
    runner: &'a dyn ToolRunner,
    selector: &'a mut dyn TrackSelector,
    config: &'a Config,
    state: BatchState,
    progress: ProgressBar,
}

impl<'a> BatchPipeline<'a> {
    pub fn new(
        runner: &'a dyn ToolRunner,
        selector: &'a mut dyn TrackSelector,
        config: &'a Config,
    ) -> Self {
        let progress = if config.show_progress {
            let pb = ProgressBar::new(0);
            if let Ok(bar_style) =
                ProgressStyle::with_template("{bar:30.cyan/blue} {pos}/{len} {msg}")
            {
                pb.set_style(bar_style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        Self {
            runner,
            selector,
            config,
            state: BatchState::Idle,
            progress,
        }
    }

    pub fn state(&self) -> BatchState {
        self.state
    }

    fn enter(&mut self, state: BatchState) {
        debug!("Batch state {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    pub async fn run(&mut self, dir: &Path) -> Result<BatchResult> {
        let start_time = Instant::now();
        let files = list_container_files(dir)?;
        let tracks_dir = dir.join(&self.config.tracks_dir);

        info!("Found {} container file(s) in {}", files.len(), dir.display());

        let progress = self.progress.clone();
        progress.reset();
        progress.set_length(files.len() as u64);

        let mut selection = SelectionState::default();
        let mut outcomes = Vec::with_capacity(files.len());

        for file in &files {
            if let Some(name) = file.file_name() {
                progress.set_message(name.to_string_lossy().into_owned());
            }

            let outcome = match self
                .process_file(file, dir, &tracks_dir, &mut selection, &progress)
                .await
            {
                Ok(outcome) => outcome,
                Err(e) => {
                    progress.finish_and_clear();
                    return Err(e);
                }
            };
            outcomes.push(outcome);

            progress.inc(1);
            self.enter(BatchState::Idle);
        }

        progress.finish_and_clear();
        self.enter(BatchState::Done);

        Ok(BatchResult {
            outcomes,
            total_time: start_time.elapsed(),
        })
    }

    async fn process_file(
        &mut self,
        file: &Path,
        dir: &Path,
        tracks_dir: &Path,
        selection: &mut SelectionState,
        progress: &ProgressBar,
    ) -> Result<FileOutcome> {
        info!("Processing {}", file.display());

        self.enter(BatchState::Inspecting);
        let tracks = TrackInspector::new(self.runner, self.config.mkvmerge.as_str())
            .list_tracks(file)
            .await?;

        let mut resolved = None;
        if !selection.is_empty() {
            self.enter(BatchState::Matching);
            let result = match_tracks(selection.targets(), &tracks);
            if result.all_found {
                info!("Reusing previous track selection");
                selection.replace(result.found.clone());
                resolved = Some(result.found);
            } else {
                debug!(
                    "Only {} of {} previous tracks found, asking again",
                    result.found.len(),
                    selection.targets().len()
                );
            }
        }

        let (targets, prompted) = match resolved {
            Some(found) => (found, false),
            None => {
                self.enter(BatchState::Selecting);
                let selector = &mut *self.selector;
                let chosen = progress.suspend(|| selector.select(&tracks, MERGE_TRACK_COUNT))?;
                selection.replace(chosen.clone());
                (chosen, true)
            }
        };

        if targets.len() < MERGE_TRACK_COUNT {
            return Err(DualsubError::NotEnoughTracks {
                path: file.to_path_buf(),
                found: targets.len(),
                needed: MERGE_TRACK_COUNT,
            });
        }

        self.enter(BatchState::Extracting);
        let extracted = SubtitleExtractor::new(self.runner, self.config.mkvextract.as_str())
            .extract(file, &targets, tracks_dir)
            .await?;

        if extracted.len() < MERGE_TRACK_COUNT {
            let missing = targets
                .iter()
                .map(|t| tracks_dir.join(output_file_name(file, t)))
                .filter(|p| !extracted.contains(p))
                .collect();
            return Err(DualsubError::ExtractionVerification(missing));
        }

        self.enter(BatchState::Merging);
        let merged = merged_output_path(dir, file, &targets);
        let cues = merge_subtitles(
            &SubtitleSource::new(&extracted[0]).with_color(self.config.color1.as_str()),
            &SubtitleSource::new(&extracted[1]).with_color(self.config.color2.as_str()),
            &merged,
        )?;

        Ok(FileOutcome {
            source: file.to_path_buf(),
            tracks: targets,
            prompted,
            extracted,
            merged,
            cues,
        })
    }
}

/// Print a summary of a finished batch.
pub fn print_summary(result: &BatchResult) {
    println!();
    println!("{}", style("═══ Batch Complete ═══").bold());
    println!();
    for outcome in &result.outcomes {
        let marker = if outcome.prompted {
            style("selected").yellow()
        } else {
            style("matched").green()
        };
        println!(
            "  {} {} ({} cues, {})",
            style("✓").green(),
            outcome.merged.display(),
            outcome.cues,
            marker
        );
    }
    println!();
    println!("  Files:      {}", result.outcomes.len());
    println!("  Prompts:    {}", result.prompts());
    println!("  Matched:    {}", result.matched());
    println!("  Total:      {:.2}s", result.total_time.as_secs_f64());
    println!();
}
