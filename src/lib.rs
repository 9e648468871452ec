// Library root
// -----------
// This crate exposes the playlist tooling as a library. The binary
// (`main.rs`) wires an authenticated API client into the interactive menu.
//
// Module responsibilities:
// - `api`: the `PlaylistApi` seam and its blocking HTTP implementation
//   against the YouTube Data API (wire records live here too).
// - `error`: the error taxonomy shared by every layer below the UI.
// - `models`: typed playlist and video records the rest of the crate uses.
// - `paginate`: cursor-driven iterator over paged listing calls.
// - `playlists`: catalog, contents and writer operations built on the API.
// - `group`: stable grouping of videos by uploader.
// - `workflow`: the merge and split-by-uploader workflows.
// - `selection`: parsing and validation of what the user typed.
// - `ui`: terminal menu and prompts, delegating work to `workflow`.
//
// Everything below `ui` is testable without a terminal or a network by
// implementing `PlaylistApi` in memory.
pub mod api;
pub mod error;
pub mod group;
pub mod models;
pub mod paginate;
pub mod playlists;
pub mod selection;
pub mod ui;
pub mod workflow;

pub use api::{ApiClient, PlaylistApi};
pub use error::{PlaylistError, WorkflowError};
pub use models::{Playlist, VideoEntry};
