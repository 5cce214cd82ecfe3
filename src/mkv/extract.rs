use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{DualsubError, Result};
use crate::tool::ToolRunner;

use super::SubtitleTrack;

/// File extension (with leading dot) for a subtitle codec.
///
/// Substring match on the lowercased codec, first match wins.
pub fn extension_for_codec(codec: &str) -> &'static str {
    let codec_lower = codec.to_lowercase();

    if codec_lower.contains("ass")
        || codec_lower.contains("ssa")
        || codec_lower.contains("substation")
    {
        ".ass"
    } else if codec_lower.contains("pgs") || codec_lower.contains("hdmv") {
        ".sup"
    } else if codec_lower.contains("vobsub") || codec_lower.contains("dvd") {
        ".sub"
    } else {
        ".srt"
    }
}

/// `<base>.<language><ext>` for an extracted track.
///
/// Two tracks sharing a language map to the same name; callers that
/// extract such a pair get one file.
pub fn output_file_name(source: &Path, track: &SubtitleTrack) -> String {
    let base = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        "{}.{}{}",
        base,
        track.language_or_empty(),
        extension_for_codec(&track.codec)
    )
}

/// Pulls subtitle tracks out of a container with `mkvextract`.
pub struct SubtitleExtractor<'a> {
    runner: &'a dyn ToolRunner,
    tool: String,
}

impl<'a> SubtitleExtractor<'a> {
    pub fn new(runner: &'a dyn ToolRunner, tool: impl Into<String>) -> Self {
        Self {
            runner,
            tool: tool.into(),
        }
    }

    /// Extract `tracks` from `file` into `output_dir`.
    ///
    /// Returns the paths that exist after extraction, in track order. Missing
    /// outputs are logged and skipped; only a run that produced nothing fails.
    pub async fn extract(
        &self,
        file: &Path,
        tracks: &[SubtitleTrack],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>> {
        if tracks.is_empty() {
            return Err(DualsubError::NoTracks);
        }

        if !file.exists() {
            return Err(DualsubError::FileNotFound(file.to_path_buf()));
        }

        std::fs::create_dir_all(output_dir)?;

        let expected: Vec<PathBuf> = tracks
            .iter()
            .map(|t| output_dir.join(output_file_name(file, t)))
            .collect();

        let mut args = vec![OsString::from("tracks"), file.as_os_str().to_os_string()];
        for (track, path) in tracks.iter().zip(&expected) {
            let mut track_arg = OsString::from(format!("{}:", track.id));
            track_arg.push(path.as_os_str());
            args.push(track_arg);
        }

        info!(
            "Extracting {} track(s) from {}",
            tracks.len(),
            file.display()
        );

        self.runner.run(&self.tool, &args).await?.check(&self.tool)?;

        let (present, missing): (Vec<PathBuf>, Vec<PathBuf>) =
            expected.into_iter().partition(|p| p.exists());

        for path in &missing {
            warn!("Expected extracted file is missing: {}", path.display());
        }

        if present.is_empty() {
            return Err(DualsubError::ExtractionVerification(missing));
        }

        Ok(present)
    }
}
