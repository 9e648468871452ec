// The two bulk workflows: merging playlists and splitting one by uploader.
//
// Both run every remote call in sequence and stop at the first failure.
// Nothing already written is undone; the returned `WorkflowError` lists
// what was created so it can be reported.

use log::debug;
use std::fmt;

use crate::api::PlaylistApi;
use crate::error::{PlaylistError, Step, WorkflowError};
use crate::group::group_by_uploader;
use crate::playlists::{append_video, create_playlist, list_videos};

pub const MERGED_DESCRIPTION: &str = "Merged playlist";

/// Outcome of a completed merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    pub playlist_id: String,
    pub title: String,
    pub sources: usize,
    pub videos_added: usize,
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully merged playlists into {} (ID: {})",
            self.title, self.playlist_id
        )
    }
}

/// One playlist created by a split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub uploader: String,
    pub playlist_id: String,
    pub title: String,
    pub videos_added: usize,
}

impl fmt::Display for CreatedPlaylist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Created playlist for {} with {} videos.",
            self.uploader, self.videos_added
        )
    }
}

/// Outcome of a completed split, one entry per uploader.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitReport {
    pub created: Vec<CreatedPlaylist>,
}

impl fmt::Display for SplitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.created.is_empty() {
            return write!(f, "The playlist is empty, nothing was created.");
        }
        for (i, playlist) in self.created.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{playlist}")?;
        }
        Ok(())
    }
}

pub fn uploader_playlist_title(uploader: &str) -> String {
    format!("{uploader}'s Playlist")
}

pub fn uploader_playlist_description(uploader: &str) -> String {
    format!("Videos from {uploader}")
}

// Tracks side effects of a run so a failure can report them.
#[derive(Default)]
struct Progress {
    created: Vec<String>,
    appended: usize,
}

impl Progress {
    fn fail(self, step: Step, source: PlaylistError) -> WorkflowError {
        WorkflowError {
            step,
            source,
            created: self.created,
            appended: self.appended,
        }
    }

    fn create<A: PlaylistApi + ?Sized>(
        &mut self,
        api: &A,
        title: &str,
        description: &str,
    ) -> Result<String, (Step, PlaylistError)> {
        let id = create_playlist(api, title, description).map_err(|e| {
            (
                Step::CreatePlaylist {
                    title: title.to_string(),
                },
                e,
            )
        })?;
        debug!("created playlist \"{title}\" ({id})");
        self.created.push(id.clone());
        Ok(id)
    }

    fn append<A: PlaylistApi + ?Sized>(
        &mut self,
        api: &A,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), (Step, PlaylistError)> {
        append_video(api, playlist_id, video_id).map_err(|e| {
            (
                Step::AppendVideo {
                    playlist_id: playlist_id.to_string(),
                    video_id: video_id.to_string(),
                },
                e,
            )
        })?;
        self.appended += 1;
        Ok(())
    }
}

fn fetch_step(playlist_id: &str) -> impl FnOnce(PlaylistError) -> (Step, PlaylistError) + '_ {
    move |e| {
        (
            Step::FetchContents {
                playlist_id: playlist_id.to_string(),
            },
            e,
        )
    }
}

/// Create a playlist titled `title` and copy every video of `sources` into
/// it, source by source in the given order.
pub fn merge_playlists<A>(
    api: &A,
    sources: &[String],
    title: &str,
) -> Result<MergeReport, WorkflowError>
where
    A: PlaylistApi + ?Sized,
{
    if sources.is_empty() {
        return Err(WorkflowError::new(
            Step::Validate,
            PlaylistError::Validation("no source playlists selected".into()),
        ));
    }
    let title = title.trim();
    if title.is_empty() {
        return Err(WorkflowError::new(
            Step::Validate,
            PlaylistError::Validation("playlist title must not be empty".into()),
        ));
    }

    let mut progress = Progress::default();
    match run_merge(api, sources, title, &mut progress) {
        Ok(playlist_id) => Ok(MergeReport {
            playlist_id,
            title: title.to_string(),
            sources: sources.len(),
            videos_added: progress.appended,
        }),
        Err((step, source)) => Err(progress.fail(step, source)),
    }
}

fn run_merge<A: PlaylistApi + ?Sized>(
    api: &A,
    sources: &[String],
    title: &str,
    progress: &mut Progress,
) -> Result<String, (Step, PlaylistError)> {
    let destination = progress.create(api, title, MERGED_DESCRIPTION)?;

    for source in sources {
        let videos = list_videos(api, source).map_err(fetch_step(source))?;
        debug!("copying {} videos from {source}", videos.len());
        for video in &videos {
            progress.append(api, &destination, &video.video_id)?;
        }
    }

    Ok(destination)
}

/// Create one playlist per uploader found in `source` and fill each with
/// that uploader's videos.
pub fn split_by_uploader<A>(api: &A, source: &str) -> Result<SplitReport, WorkflowError>
where
    A: PlaylistApi + ?Sized,
{
    let mut progress = Progress::default();
    let mut report = SplitReport::default();
    match run_split(api, source, &mut progress, &mut report) {
        Ok(()) => Ok(report),
        Err((step, e)) => Err(progress.fail(step, e)),
    }
}

fn run_split<A: PlaylistApi + ?Sized>(
    api: &A,
    source: &str,
    progress: &mut Progress,
    report: &mut SplitReport,
) -> Result<(), (Step, PlaylistError)> {
    let videos = list_videos(api, source).map_err(fetch_step(source))?;
    let buckets = group_by_uploader(videos);
    debug!("{source} has videos from {} uploaders", buckets.len());

    for bucket in buckets {
        let title = uploader_playlist_title(&bucket.uploader);
        let playlist_id = progress.create(
            api,
            &title,
            &uploader_playlist_description(&bucket.uploader),
        )?;
        for video_id in &bucket.video_ids {
            progress.append(api, &playlist_id, video_id)?;
        }
        report.created.push(CreatedPlaylist {
            uploader: bucket.uploader,
            playlist_id,
            title,
            videos_added: bucket.video_ids.len(),
        });
    }

    Ok(())
}
