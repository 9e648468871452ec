// Typed records handed around by the core. They are produced by the API
// layer right after each remote call and never mutated afterwards.

/// Uploader name used for items whose owner the service does not report
/// (deleted or private videos).
pub const UNKNOWN_UPLOADER: &str = "Unknown uploader";

/// A playlist owned by the authenticated account, as seen when the catalog
/// was fetched. `video_count` is the service's hint and may be stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub video_count: u64,
}

/// One entry of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    pub video_id: String,
    pub uploader_name: String,
}

impl VideoEntry {
    pub fn new(video_id: impl Into<String>, uploader_name: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            uploader_name: uploader_name.into(),
        }
    }
}
