use super::SubtitleTrack;

/// Outcome of looking up previously chosen tracks in a new file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Matches in the order of the targets, not the candidates.
    pub found: Vec<SubtitleTrack>,
    pub all_found: bool,
}

/// Find, for each target, the first equivalent candidate track.
pub fn match_tracks(targets: &[SubtitleTrack], candidates: &[SubtitleTrack]) -> MatchResult {
    let found: Vec<SubtitleTrack> = targets
        .iter()
        .filter_map(|target| candidates.iter().find(|c| target.is_equivalent(c)))
        .cloned()
        .collect();

    MatchResult {
        all_found: found.len() == targets.len(),
        found,
    }
}
