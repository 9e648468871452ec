// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, create an API client and hand it to
//   the UI loop.
// - Returns `anyhow::Result` so setup failures end the program with a message.

use playlist_tool::{api::ApiClient, ui::main_menu};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Base URL from `YOUTUBE_API_BASE_URL`, token from `YOUTUBE_ACCESS_TOKEN`.
    // See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    // Blocks until the user picks "Exit".
    main_menu(api)?;
    Ok(())
}
