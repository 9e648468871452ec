// Selection helpers: how the catalog is shown to the user and how their
// answers are turned into playlist ids. Kept free of terminal I/O so the
// parsing rules can be tested directly.

use crate::error::PlaylistError;
use crate::models::Playlist;

/// One line per playlist, numbered from 1.
pub fn catalog_lines(playlists: &[Playlist]) -> Vec<String> {
    playlists
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{}. {} ({} videos)", i + 1, p.title, p.video_count))
        .collect()
}

/// Parse a comma separated list of 1-based catalog numbers into playlist
/// ids, keeping the order the user typed them in.
pub fn parse_selection(input: &str, playlists: &[Playlist]) -> Result<Vec<String>, PlaylistError> {
    if input.trim().is_empty() {
        return Err(PlaylistError::Validation(
            "enter at least one playlist number".into(),
        ));
    }

    input
        .split(',')
        .map(|raw| {
            let raw = raw.trim();
            let number: usize = raw
                .parse()
                .map_err(|_| PlaylistError::Validation(format!("\"{raw}\" is not a number")))?;
            number
                .checked_sub(1)
                .and_then(|i| playlists.get(i))
                .map(|p| p.id.clone())
                .ok_or_else(|| {
                    PlaylistError::Validation(format!(
                        "{number} is out of range (1-{})",
                        playlists.len()
                    ))
                })
        })
        .collect()
}

/// Trimmed playlist title, rejecting blank input.
pub fn validate_title(input: &str) -> Result<String, PlaylistError> {
    let title = input.trim();
    if title.is_empty() {
        return Err(PlaylistError::Validation(
            "playlist title must not be empty".into(),
        ));
    }
    Ok(title.to_string())
}
