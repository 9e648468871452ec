// Error taxonomy for remote calls, user input and workflow runs.

use std::fmt;
use thiserror::Error;

/// Failure of a single operation against the remote service or of a piece
/// of user input.
#[derive(Debug, Error)]
pub enum PlaylistError {
    /// Network failure, unexpected HTTP status or undecodable response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service does not know the referenced playlist or video.
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed user selection or title.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl PlaylistError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<reqwest::Error> for PlaylistError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Transport(format!("could not decode response: {err}"));
        }
        Self::Transport(err.to_string())
    }
}

/// The step of a workflow that was running when it aborted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Validate,
    FetchContents { playlist_id: String },
    CreatePlaylist { title: String },
    AppendVideo { playlist_id: String, video_id: String },
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validate => write!(f, "validating input"),
            Self::FetchContents { playlist_id } => {
                write!(f, "fetching videos of playlist {playlist_id}")
            }
            Self::CreatePlaylist { title } => write!(f, "creating playlist \"{title}\""),
            Self::AppendVideo {
                playlist_id,
                video_id,
            } => write!(f, "adding video {video_id} to playlist {playlist_id}"),
        }
    }
}

/// A workflow aborted part way. Side effects already applied on the remote
/// service are recorded so they can be reported; nothing is rolled back.
#[derive(Debug, Error)]
#[error("{step} failed: {source}")]
pub struct WorkflowError {
    pub step: Step,
    #[source]
    pub source: PlaylistError,
    /// Ids of playlists created before the failure.
    pub created: Vec<String>,
    /// Videos successfully appended before the failure, across all targets.
    pub appended: usize,
}

impl WorkflowError {
    pub fn new(step: Step, source: PlaylistError) -> Self {
        Self {
            step,
            source,
            created: Vec::new(),
            appended: 0,
        }
    }

    /// True when the remote account was changed before the failure.
    pub fn left_partial_state(&self) -> bool {
        !self.created.is_empty() || self.appended > 0
    }
}
