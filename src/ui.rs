// UI layer: an interactive menu built on `dialoguer`. Each action fetches
// the current catalog, asks the user what to work on and hands the answer
// to the workflows. Failures are printed and the menu is shown again.

use crate::api::{ApiClient, PlaylistApi};
use crate::error::WorkflowError;
use crate::models::Playlist;
use crate::playlists::list_owned_playlists;
use crate::selection::{catalog_lines, parse_selection, validate_title};
use crate::workflow::{merge_playlists, split_by_uploader};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, Password, Select};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Main interactive menu. Asks for an access token when the client has
/// none, then runs a select loop until the user chooses "Exit".
pub fn main_menu(mut api: ApiClient) -> Result<()> {
    if !api.has_token() {
        println!("YOUTUBE_ACCESS_TOKEN is not set.");
    }
    while !api.has_token() {
        let token: String = Password::new()
            .with_prompt("OAuth access token (youtube scope)")
            .interact()?;
        if !api.set_token(&token) {
            println!("{}", "The access token must not be blank.".red());
        }
    }

    loop {
        let items = vec![
            "Merge selected playlists",
            "Create playlists by creator",
            "Exit",
        ];
        let selection = Select::new()
            .with_prompt("Select an action")
            .items(&items)
            .default(0)
            .interact()?;
        match selection {
            0 => handle_merge(&api)?,
            1 => handle_split(&api)?,
            _ => break,
        }
    }
    Ok(())
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

/// Fetch the catalog behind a spinner. Returns `None` (after telling the
/// user why) when there is nothing to choose from.
fn fetch_catalog<A: PlaylistApi>(api: &A) -> Result<Option<Vec<Playlist>>> {
    let spinner = spinner("Fetching playlists...")?;
    let result = list_owned_playlists(api);
    spinner.finish_and_clear();

    match result {
        Ok(playlists) if playlists.is_empty() => {
            println!("No playlists found on this account.");
            Ok(None)
        }
        Ok(playlists) => Ok(Some(playlists)),
        Err(e) => {
            println!("{}", format!("Fetching playlists failed: {e}").red());
            Ok(None)
        }
    }
}

/// Merge flow: choose sources in order, name the destination, copy.
fn handle_merge<A: PlaylistApi>(api: &A) -> Result<()> {
    let Some(playlists) = fetch_catalog(api)? else {
        return Ok(());
    };

    println!("Available Playlists:");
    for line in catalog_lines(&playlists) {
        println!("{line}");
    }

    let answer: String = Input::new()
        .with_prompt("Enter the numbers of the playlists you want to merge, separated by commas")
        .interact_text()?;
    let sources = match parse_selection(&answer, &playlists) {
        Ok(sources) => sources,
        Err(e) => {
            println!("{}", e.to_string().red());
            return Ok(());
        }
    };

    let title: String = Input::new()
        .with_prompt("Enter the title for the new merged playlist")
        .interact_text()?;
    let title = match validate_title(&title) {
        Ok(title) => title,
        Err(e) => {
            println!("{}", e.to_string().red());
            return Ok(());
        }
    };

    let spinner = spinner("Merging playlists...")?;
    let outcome = merge_playlists(api, &sources, &title);
    spinner.finish_and_clear();

    match outcome {
        Ok(report) => {
            println!("{}", report.to_string().green());
            println!(
                "{} videos copied from {} playlists.",
                report.videos_added, report.sources
            );
        }
        Err(e) => print_workflow_error("Merge", &e),
    }
    Ok(())
}

/// Split flow: choose one playlist, create one playlist per uploader.
fn handle_split<A: PlaylistApi>(api: &A) -> Result<()> {
    let Some(playlists) = fetch_catalog(api)? else {
        return Ok(());
    };

    let lines = catalog_lines(&playlists);
    let index = Select::new()
        .with_prompt("Select the playlist to split by creator")
        .items(&lines)
        .default(0)
        .interact()?;
    let source = &playlists[index];

    let spinner = spinner(&format!("Splitting \"{}\" by creator...", source.title))?;
    let outcome = split_by_uploader(api, &source.id);
    spinner.finish_and_clear();

    match outcome {
        Ok(report) => {
            println!("{}", report.to_string().green());
            for created in &report.created {
                println!("  {} ({})", created.title, created.playlist_id);
            }
        }
        Err(e) => print_workflow_error("Split", &e),
    }
    Ok(())
}

fn print_workflow_error(action: &str, err: &WorkflowError) {
    if err.source.is_validation() {
        println!("{}", format!("{action} not started: {}", err.source).red());
        return;
    }
    println!("{}", format!("{action} aborted: {err}").red());
    if err.source.is_not_found() {
        println!("The playlist or video may have been deleted or made private.");
    }
    if err.left_partial_state() {
        println!(
            "{}",
            format!(
                "Nothing was rolled back: {} playlist(s) were created ({}) and {} video(s) added.",
                err.created.len(),
                err.created.join(", "),
                err.appended
            )
            .yellow()
        );
    }
}
