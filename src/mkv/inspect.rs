use std::ffi::OsString;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{DualsubError, Result};
use crate::tool::ToolRunner;

use super::{SubtitleTrack, SUBTITLES};

#[derive(Debug, Deserialize)]
struct IdentifyDocument {
    tracks: Vec<IdentifyTrack>,
}

#[derive(Debug, Deserialize)]
struct IdentifyTrack {
    id: u64,
    #[serde(rename = "type")]
    track_type: String,
    codec: String,
    #[serde(default)]
    properties: Option<IdentifyProperties>,
}

#[derive(Debug, Default, Deserialize)]
struct IdentifyProperties {
    language: Option<String>,
    track_name: Option<String>,
    default_track: Option<bool>,
    forced_track: Option<bool>,
}

/// Parse `mkvmerge -J` output into the subtitle tracks it lists.
///
/// Non-subtitle tracks are dropped. Missing default/forced flags read as `false`.
pub fn parse_identify_json(tool: &str, json: &str) -> Result<Vec<SubtitleTrack>> {
    let document: IdentifyDocument =
        serde_json::from_str(json).map_err(|e| DualsubError::MalformedOutput {
            tool: tool.to_string(),
            reason: e.to_string(),
        })?;

    let tracks = document
        .tracks
        .into_iter()
        .filter(|t| t.track_type == SUBTITLES)
        .map(|t| {
            let props = t.properties.unwrap_or_default();
            SubtitleTrack {
                id: t.id,
                track_type: t.track_type,
                codec: t.codec,
                language: props.language,
                track_name: props.track_name,
                is_default: props.default_track.unwrap_or(false),
                is_forced: props.forced_track.unwrap_or(false),
            }
        })
        .collect();

    Ok(tracks)
}

/// Lists subtitle tracks of container files through the demuxer.
pub struct TrackInspector<'a> {
    runner: &'a dyn ToolRunner,
    tool: String,
}

impl<'a> TrackInspector<'a> {
    pub fn new(runner: &'a dyn ToolRunner, tool: impl Into<String>) -> Self {
        Self {
            runner,
            tool: tool.into(),
        }
    }

    pub async fn list_tracks(&self, file: &Path) -> Result<Vec<SubtitleTrack>> {
        if !file.exists() {
            return Err(DualsubError::FileNotFound(file.to_path_buf()));
        }

        debug!("Identifying tracks in {}", file.display());

        let args = [OsString::from("-J"), file.as_os_str().to_os_string()];
        let output = self.runner.run(&self.tool, &args).await?.check(&self.tool)?;

        let tracks = parse_identify_json(&self.tool, &output.stdout)?;
        info!(
            "Found {} subtitle track(s) in {}",
            tracks.len(),
            file.display()
        );
        Ok(tracks)
    }
}
