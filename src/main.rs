mod config;
mod eink;
mod logo;
mod publish;
mod render;

use anyhow::Result;
use log::{error, info};
use mlb_api::Standings;
use mlb_api::client::MlbApi;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config::Config::from_env();
    info!(
        "generating schedule card for {} (team {}), next {} days",
        cfg.team_name, cfg.team_id, cfg.days_ahead
    );

    let api = MlbApi::new();

    // Each fetch degrades to empty/sentinel data; the card is always produced.
    let games = match api
        .fetch_upcoming_games(cfg.team_id, cfg.days_ahead, cfg.display_tz)
        .await
    {
        Ok(games) => games,
        Err(err) => {
            error!("schedule fetch failed: {err}");
            Vec::new()
        }
    };
    if games.is_empty() {
        info!("no upcoming games found");
    }
    for game in &games {
        info!(
            "- {} on {} (TV: {})",
            game.opponent_display(),
            game.game_time,
            game.broadcasts.join("/")
        );
    }

    let standings = match api.fetch_standings(cfg.team_id).await {
        Ok(standings) => standings,
        Err(err) => {
            error!("standings fetch failed: {err}");
            Standings::default()
        }
    };
    info!(
        "standings: {} | {} | {}",
        standings.record, standings.rank, standings.games_back
    );

    let http = reqwest::Client::new();
    let logo = logo::fetch_logo(&http, &cfg.logo_url, cfg.logo_size).await;
    if logo.is_none() {
        info!("proceeding without a logo");
    }

    // From here on failures are fatal: without a rendered card there is
    // nothing useful left to do.
    let fonts = render::Fonts::load(&cfg)?;
    let card = render::render_schedule_card(&cfg, &games, &standings, logo.as_ref(), &fonts);
    eink::save_monochrome_png(&card, Path::new(&cfg.image_path))?;
    info!("saved {}", cfg.image_path);

    // Publishing is best-effort; the local image stays on disk either way.
    if let Err(err) = publish::write_redirect_descriptor(&cfg) {
        error!("redirect descriptor failed: {err:#}");
    }
    if let Err(err) = publish::upload_image(&http, &cfg).await {
        error!("github upload failed: {err:#}");
    }

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("trmnl-mlb {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "trmnl-mlb - MLB e-ink schedule card generator

Usage:
  trmnl-mlb
  trmnl-mlb --help
  trmnl-mlb --version

Environment:
  TRMNL_TEAM_ID              MLB team id (default 138, St. Louis Cardinals)
  TRMNL_TEAM_NAME            Display name for logging
  TRMNL_DAYS_AHEAD           Days of schedule to fetch (default 4)
  TRMNL_TIMEZONE             Display timezone (default America/Chicago)
  TRMNL_LOGO_URL             Team logo URL
  TRMNL_IMAGE_PATH           Output image path, also the repo path
  TRMNL_REDIRECT_PATH        Redirect descriptor path
  TRMNL_REFRESH_RATE         Descriptor refresh_rate seconds (default 21600)
  TRMNL_FONT_REGULAR         Font override, tried before well-known paths
  TRMNL_FONT_BOLD            Bold font override
  TRMNL_BRANCH               Publish branch (default main)
  GITHUB_REPOSITORY_OWNER    Repo owner; placeholder disables the upload
  GITHUB_REPOSITORY          owner/name; placeholder disables the upload
  GITHUB_TOKEN               Token for the contents API upload"
}
