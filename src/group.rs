// Grouping of playlist entries by uploader.

use std::collections::HashMap;

use crate::models::VideoEntry;

/// Videos of a single uploader, in playlist order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderBucket {
    pub uploader: String,
    pub video_ids: Vec<String>,
}

/// Partition `entries` by exact uploader name in a single pass.
///
/// Buckets come out in order of each uploader's first appearance and keep
/// the relative order of their videos.
pub fn group_by_uploader<I>(entries: I) -> Vec<UploaderBucket>
where
    I: IntoIterator<Item = VideoEntry>,
{
    let mut buckets: Vec<UploaderBucket> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let slot = match index.get(&entry.uploader_name) {
            Some(&slot) => slot,
            None => {
                index.insert(entry.uploader_name.clone(), buckets.len());
                buckets.push(UploaderBucket {
                    uploader: entry.uploader_name,
                    video_ids: Vec::new(),
                });
                buckets.len() - 1
            }
        };
        buckets[slot].video_ids.push(entry.video_id);
    }

    buckets
}
