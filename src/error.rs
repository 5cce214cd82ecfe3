use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DualsubError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Subtitle file is empty: {}", .0.display())]
    EmptyFile(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No tracks given for extraction")]
    NoTracks,

    #[error("{} has {found} subtitle track(s), {needed} needed", .path.display())]
    NotEnoughTracks {
        path: PathBuf,
        found: usize,
        needed: usize,
    },

    #[error("Malformed output from {tool}: {reason}")]
    MalformedOutput { tool: String, reason: String },

    #[error("{tool} failed (exit code {}): {}", code_label(.code), .stderr.trim())]
    ExternalTool {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("None of the expected subtitle files were extracted: {}", join_paths(.0))]
    ExtractionVerification(Vec<PathBuf>),

    #[error("Shift offset must be non-zero")]
    InvalidOffset,

    #[error("Shifting by {offset}ms moves a cue out of the timestamp range")]
    OffsetOverflow { offset: i64 },

    #[error("Invalid selection: {0}")]
    InvalidSelectionInput(String),

    #[error("Invalid SRT content: {0}")]
    Parse(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<dialoguer::Error> for DualsubError {
    fn from(err: dialoguer::Error) -> Self {
        DualsubError::Prompt(err.to_string())
    }
}

fn code_label(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, DualsubError>;
