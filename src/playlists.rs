// Catalog, contents and writer operations on top of `PlaylistApi`.

use log::debug;

use crate::api::PlaylistApi;
use crate::error::PlaylistError;
use crate::models::{Playlist, VideoEntry};
use crate::paginate::paginate;

/// All playlists owned by the authenticated account, in the order the
/// service returns them.
pub fn list_owned_playlists<A>(api: &A) -> Result<Vec<Playlist>, PlaylistError>
where
    A: PlaylistApi + ?Sized,
{
    let mut pages = paginate(|cursor| api.playlists_page(cursor));
    let playlists: Vec<Playlist> = pages.by_ref().collect::<Result<_, _>>()?;
    debug!(
        "catalog holds {} playlists ({} pages)",
        playlists.len(),
        pages.pages_fetched()
    );
    Ok(playlists)
}

/// Every entry of `playlist_id`, duplicates included.
pub fn list_videos<A>(api: &A, playlist_id: &str) -> Result<Vec<VideoEntry>, PlaylistError>
where
    A: PlaylistApi + ?Sized,
{
    let mut pages = paginate(|cursor| api.playlist_items_page(playlist_id, cursor));
    let videos: Vec<VideoEntry> = pages.by_ref().collect::<Result<_, _>>()?;
    debug!(
        "playlist {playlist_id} holds {} videos ({} pages)",
        videos.len(),
        pages.pages_fetched()
    );
    Ok(videos)
}

/// Create a new private playlist. Titles are not unique: every call creates
/// a new playlist.
pub fn create_playlist<A>(api: &A, title: &str, description: &str) -> Result<String, PlaylistError>
where
    A: PlaylistApi + ?Sized,
{
    api.insert_playlist(title, description)
}

/// Append one video to the end of a playlist. Appending the same video twice
/// adds it twice.
pub fn append_video<A>(api: &A, playlist_id: &str, video_id: &str) -> Result<(), PlaylistError>
where
    A: PlaylistApi + ?Sized,
{
    api.insert_playlist_item(playlist_id, video_id)
}
