// API client module: a small blocking HTTP client for the YouTube Data API
// and the `PlaylistApi` trait the rest of the crate talks to. Wire records
// are private to this module; every response is normalized into the typed
// records from `models` before it leaves.

use anyhow::Context;
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::PlaylistError;
use crate::models::{Playlist, VideoEntry, UNKNOWN_UPLOADER};
use crate::paginate::Page;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Largest page the service will return for the listing endpoints.
pub const MAX_PAGE_SIZE: u32 = 50;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Remote calls the playlist operations are built from. Listing calls return
/// a single page; walking the pages is left to `paginate`.
pub trait PlaylistApi {
    /// One page of the playlists owned by the authenticated account.
    fn playlists_page(&self, cursor: Option<&str>) -> Result<Page<Playlist>, PlaylistError>;

    /// One page of the entries of `playlist_id`.
    fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<VideoEntry>, PlaylistError>;

    /// Create a private playlist and return its id.
    fn insert_playlist(&self, title: &str, description: &str) -> Result<String, PlaylistError>;

    /// Append `video_id` to the end of `playlist_id`.
    fn insert_playlist_item(&self, playlist_id: &str, video_id: &str)
        -> Result<(), PlaylistError>;
}

/// Blocking client holding a reqwest client, the API base URL and the OAuth2
/// access token used for every call.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

// Wire shapes of the endpoints we call. Only the fields we read are listed.

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct ListResponse<T> {
    #[serde(default)]
    items: Vec<T>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlaylistResource {
    id: String,
    snippet: PlaylistSnippet,
    #[serde(default)]
    content_details: Option<PlaylistContentDetails>,
}

#[derive(Serialize, Deserialize, Debug)]
struct PlaylistSnippet {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    #[serde(default)]
    item_count: u64,
}

#[derive(Deserialize, Debug)]
struct PlaylistItemResource {
    snippet: PlaylistItemSnippet,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    resource_id: ResourceId,
    #[serde(default)]
    video_owner_channel_title: Option<String>,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    #[serde(default = "video_kind")]
    kind: String,
    video_id: String,
}

fn video_kind() -> String {
    "youtube#video".to_string()
}

/// Body of `playlists.insert`.
#[derive(Serialize, Debug)]
struct NewPlaylist {
    snippet: PlaylistSnippet,
    status: PlaylistStatus,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PlaylistStatus {
    privacy_status: &'static str,
}

/// Body of `playlistItems.insert`.
#[derive(Serialize, Debug)]
struct NewPlaylistItem {
    snippet: NewPlaylistItemSnippet,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct NewPlaylistItemSnippet {
    playlist_id: String,
    resource_id: ResourceId,
}

#[derive(Deserialize, Debug)]
struct Created {
    id: String,
}

impl From<PlaylistResource> for Playlist {
    fn from(raw: PlaylistResource) -> Self {
        Playlist {
            id: raw.id,
            title: raw.snippet.title,
            video_count: raw.content_details.map(|d| d.item_count).unwrap_or(0),
        }
    }
}

impl From<PlaylistItemResource> for VideoEntry {
    fn from(raw: PlaylistItemResource) -> Self {
        VideoEntry {
            video_id: raw.snippet.resource_id.video_id,
            uploader_name: raw
                .snippet
                .video_owner_channel_title
                .unwrap_or_else(|| UNKNOWN_UPLOADER.to_string()),
        }
    }
}

impl<R> ListResponse<R> {
    fn into_page<T: From<R>>(self) -> Page<T> {
        Page::new(
            self.items.into_iter().map(T::from).collect(),
            self.next_page_token,
        )
    }
}

/// Map a non-success status to the error taxonomy. 404 means the referenced
/// playlist or video does not exist (any more).
fn status_error(status: StatusCode, what: &str, body: &str) -> PlaylistError {
    if status == StatusCode::NOT_FOUND {
        PlaylistError::NotFound(format!("{what}: {body}"))
    } else {
        PlaylistError::Transport(format!("{what} failed: {status} - {body}"))
    }
}

/// Trimmed access token, or `None` when the input is blank.
pub fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim();
    (!token.is_empty()).then(|| token.to_string())
}

impl ApiClient {
    /// Create an ApiClient configured from `YOUTUBE_API_BASE_URL` (falling
    /// back to the public endpoint) and, when present, `YOUTUBE_ACCESS_TOKEN`.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url =
            std::env::var("YOUTUBE_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let token = std::env::var("YOUTUBE_ACCESS_TOKEN").ok();
        Self::new(base_url, token)
    }

    pub fn new(base_url: impl Into<String>, token: Option<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.as_deref().and_then(parse_token),
        })
    }

    /// Store the access token for subsequent calls. A blank token is
    /// rejected and `false` returned.
    pub fn set_token(&mut self, token: &str) -> bool {
        match parse_token(token) {
            Some(token) => {
                self.token = Some(token);
                true
            }
            None => false,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    fn authorized(&self, req: RequestBuilder) -> Result<RequestBuilder, PlaylistError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| PlaylistError::Transport("no access token configured".into()))?;
        Ok(req.bearer_auth(token))
    }

    /// Send and turn a non-success status into an error carrying the
    /// response body.
    fn send(&self, req: RequestBuilder, what: &str) -> Result<Response, PlaylistError> {
        let res = req.send()?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().unwrap_or_default();
        Err(status_error(status, what, &body))
    }

    fn list_request(
        &self,
        resource: &str,
        query: &[(&str, &str)],
        cursor: Option<&str>,
    ) -> Result<RequestBuilder, PlaylistError> {
        let page_size = MAX_PAGE_SIZE.to_string();
        let mut req = self
            .client
            .get(self.url(resource))
            .query(query)
            .query(&[("maxResults", page_size.as_str())]);
        if let Some(token) = cursor {
            req = req.query(&[("pageToken", token)]);
        }
        self.authorized(req)
    }

    fn playlists_request(&self, cursor: Option<&str>) -> Result<RequestBuilder, PlaylistError> {
        self.list_request(
            "playlists",
            &[("part", "snippet,contentDetails"), ("mine", "true")],
            cursor,
        )
    }

    fn playlist_items_request(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<RequestBuilder, PlaylistError> {
        self.list_request(
            "playlistItems",
            &[("part", "snippet"), ("playlistId", playlist_id)],
            cursor,
        )
    }

    fn insert_playlist_request(
        &self,
        title: &str,
        description: &str,
    ) -> Result<RequestBuilder, PlaylistError> {
        let body = NewPlaylist {
            snippet: PlaylistSnippet {
                title: title.to_string(),
                description: Some(description.to_string()),
            },
            status: PlaylistStatus {
                privacy_status: "private",
            },
        };
        let req = self
            .client
            .post(self.url("playlists"))
            .query(&[("part", "snippet,status")])
            .json(&body);
        self.authorized(req)
    }

    fn insert_playlist_item_request(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<RequestBuilder, PlaylistError> {
        let body = NewPlaylistItem {
            snippet: NewPlaylistItemSnippet {
                playlist_id: playlist_id.to_string(),
                resource_id: ResourceId {
                    kind: video_kind(),
                    video_id: video_id.to_string(),
                },
            },
        };
        let req = self
            .client
            .post(self.url("playlistItems"))
            .query(&[("part", "snippet")])
            .json(&body);
        self.authorized(req)
    }
}

impl PlaylistApi for ApiClient {
    fn playlists_page(&self, cursor: Option<&str>) -> Result<Page<Playlist>, PlaylistError> {
        let req = self.playlists_request(cursor)?;
        debug!("GET playlists cursor={cursor:?}");
        let res: ListResponse<PlaylistResource> = self.send(req, "listing playlists")?.json()?;
        Ok(res.into_page())
    }

    fn playlist_items_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<VideoEntry>, PlaylistError> {
        let req = self.playlist_items_request(playlist_id, cursor)?;
        debug!("GET playlistItems playlist={playlist_id} cursor={cursor:?}");
        let res: ListResponse<PlaylistItemResource> = self
            .send(req, &format!("playlist {playlist_id}"))?
            .json()?;
        Ok(res.into_page())
    }

    fn insert_playlist(&self, title: &str, description: &str) -> Result<String, PlaylistError> {
        let req = self.insert_playlist_request(title, description)?;
        debug!("POST playlists title={title:?}");
        let created: Created = self.send(req, "creating playlist")?.json()?;
        Ok(created.id)
    }

    fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<(), PlaylistError> {
        let req = self.insert_playlist_item_request(playlist_id, video_id)?;
        debug!("POST playlistItems playlist={playlist_id} video={video_id}");
        self.send(req, &format!("video {video_id}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn playlists_response_is_normalized() {
        let raw = json!({
            "kind": "youtube#playlistListResponse",
            "nextPageToken": "CDIQAA",
            "items": [
                {
                    "id": "PL1",
                    "snippet": { "title": "Road trip", "description": "" },
                    "contentDetails": { "itemCount": 12 }
                },
                {
                    "id": "PL2",
                    "snippet": { "title": "Talks" }
                }
            ]
        });
        let res: ListResponse<PlaylistResource> = serde_json::from_value(raw).unwrap();
        let page: Page<Playlist> = res.into_page();
        assert_eq!(page.next_cursor.as_deref(), Some("CDIQAA"));
        assert_eq!(
            page.items,
            vec![
                Playlist {
                    id: "PL1".into(),
                    title: "Road trip".into(),
                    video_count: 12
                },
                Playlist {
                    id: "PL2".into(),
                    title: "Talks".into(),
                    video_count: 0
                },
            ]
        );
    }

    #[test]
    fn last_page_has_no_cursor() {
        let res: ListResponse<PlaylistResource> =
            serde_json::from_value(json!({ "items": [] })).unwrap();
        let page: Page<Playlist> = res.into_page();
        assert!(page.items.is_empty());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn items_without_owner_fall_back_to_unknown_uploader() {
        let raw = json!({
            "items": [
                {
                    "snippet": {
                        "resourceId": { "kind": "youtube#video", "videoId": "abc" },
                        "videoOwnerChannelTitle": "Alice"
                    }
                },
                {
                    "snippet": {
                        "title": "Deleted video",
                        "resourceId": { "kind": "youtube#video", "videoId": "gone" }
                    }
                }
            ]
        });
        let res: ListResponse<PlaylistItemResource> = serde_json::from_value(raw).unwrap();
        let page: Page<VideoEntry> = res.into_page();
        assert_eq!(
            page.items,
            vec![
                VideoEntry::new("abc", "Alice"),
                VideoEntry::new("gone", UNKNOWN_UPLOADER),
            ]
        );
    }

    #[test]
    fn new_playlist_body_is_private() {
        let body = NewPlaylist {
            snippet: PlaylistSnippet {
                title: "Mix".into(),
                description: Some("Merged playlist".into()),
            },
            status: PlaylistStatus {
                privacy_status: "private",
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "snippet": { "title": "Mix", "description": "Merged playlist" },
                "status": { "privacyStatus": "private" }
            })
        );
    }

    #[test]
    fn new_item_body_references_video() {
        let body = NewPlaylistItem {
            snippet: NewPlaylistItemSnippet {
                playlist_id: "PLdest".into(),
                resource_id: ResourceId {
                    kind: video_kind(),
                    video_id: "v1".into(),
                },
            },
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "snippet": {
                    "playlistId": "PLdest",
                    "resourceId": { "kind": "youtube#video", "videoId": "v1" }
                }
            })
        );
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = status_error(StatusCode::NOT_FOUND, "playlist PLx", "playlistNotFound");
        assert!(err.is_not_found());

        let err = status_error(StatusCode::FORBIDDEN, "creating playlist", "quotaExceeded");
        assert!(matches!(err, PlaylistError::Transport(_)));
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let api = ApiClient::new("http://localhost:9000/", None).unwrap();
        assert_eq!(api.url("playlists"), "http://localhost:9000/playlists");
        assert!(!api.has_token());
    }

    #[test]
    fn calls_without_token_fail_before_sending() {
        let api = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let err = api.playlists_page(None).unwrap_err();
        assert!(matches!(err, PlaylistError::Transport(ref m) if m.contains("access token")));
    }

    fn client() -> ApiClient {
        ApiClient::new("https://api.test/youtube/v3", Some("tok-123".into())).unwrap()
    }

    fn query_of(req: &reqwest::blocking::Request) -> Vec<(String, String)> {
        req.url().query_pairs().into_owned().collect()
    }

    fn pair(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    fn body_json(req: &reqwest::blocking::Request) -> serde_json::Value {
        let bytes = req.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn first_playlists_page_request() {
        let req = client().playlists_request(None).unwrap().build().unwrap();
        assert_eq!(*req.method(), reqwest::Method::GET);
        assert_eq!(req.url().path(), "/youtube/v3/playlists");
        assert_eq!(
            query_of(&req),
            vec![
                pair("part", "snippet,contentDetails"),
                pair("mine", "true"),
                pair("maxResults", "50"),
            ]
        );
        assert_eq!(
            req.headers()[reqwest::header::AUTHORIZATION],
            "Bearer tok-123"
        );
    }

    #[test]
    fn later_playlists_page_carries_token() {
        let req = client()
            .playlists_request(Some("CDIQAA"))
            .unwrap()
            .build()
            .unwrap();
        let query = query_of(&req);
        assert!(query.contains(&pair("pageToken", "CDIQAA")));
        assert!(query.contains(&pair("mine", "true")));
    }

    #[test]
    fn playlist_items_request_targets_playlist() {
        let api = client();

        let first = api
            .playlist_items_request("PL1", None)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(*first.method(), reqwest::Method::GET);
        assert_eq!(first.url().path(), "/youtube/v3/playlistItems");
        assert_eq!(
            query_of(&first),
            vec![
                pair("part", "snippet"),
                pair("playlistId", "PL1"),
                pair("maxResults", "50"),
            ]
        );

        let next = api
            .playlist_items_request("PL1", Some("EAAa"))
            .unwrap()
            .build()
            .unwrap();
        assert!(query_of(&next).contains(&pair("pageToken", "EAAa")));
        assert_eq!(next.headers()[reqwest::header::AUTHORIZATION], "Bearer tok-123");
    }

    #[test]
    fn insert_playlist_request_posts_private_playlist() {
        let req = client()
            .insert_playlist_request("Mix", "Merged playlist")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(*req.method(), reqwest::Method::POST);
        assert_eq!(req.url().path(), "/youtube/v3/playlists");
        assert_eq!(query_of(&req), vec![pair("part", "snippet,status")]);
        assert_eq!(req.headers()[reqwest::header::AUTHORIZATION], "Bearer tok-123");
        assert_eq!(body_json(&req)["status"]["privacyStatus"], "private");
    }

    #[test]
    fn insert_item_request_posts_video_reference() {
        let req = client()
            .insert_playlist_item_request("PLdest", "v1")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(*req.method(), reqwest::Method::POST);
        assert_eq!(req.url().path(), "/youtube/v3/playlistItems");
        assert_eq!(query_of(&req), vec![pair("part", "snippet")]);
        assert_eq!(req.headers()[reqwest::header::AUTHORIZATION], "Bearer tok-123");
        assert_eq!(body_json(&req)["snippet"]["resourceId"]["videoId"], "v1");
    }

    #[test]
    fn blank_tokens_are_rejected() {
        assert_eq!(parse_token("  ya29.abc \n"), Some("ya29.abc".to_string()));
        assert_eq!(parse_token(" \t "), None);

        let mut api = ApiClient::new("http://localhost:9000", Some("   ".into())).unwrap();
        assert!(!api.has_token());
        assert!(!api.set_token("   "));
        assert!(!api.has_token());
        assert!(api.set_token("tok"));
        assert!(api.has_token());
    }
}
