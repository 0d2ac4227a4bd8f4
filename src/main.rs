mod assets;
mod bracket;
mod service;
mod settings;

use crate::assets::{BracketAssets, LogoDir};
use crate::bracket::BracketError;
use crate::settings::Settings;
use anyhow::Context;
use chrono::{Local, NaiveDate};
use log::{LevelFilter, error, info};
use nhl_api::Season;
use nhl_api::client::NhlApi;
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq, Eq)]
enum CliAction {
    Bracket(Season),
    Help,
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let season = match parse_cli_args(&args, Local::now().date_naive()) {
        Ok(CliAction::Bracket(season)) => season,
        Ok(CliAction::Help) => {
            println!("{}", usage_text());
            return Ok(());
        }
        Ok(CliAction::Version) => {
            println!("puckbot {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(message) => {
            eprintln!("{message}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    better_panic::install();

    let settings = Settings::load();
    init_logging(&settings);

    run(&settings, season).await
}

fn parse_cli_args(args: &[String], today: NaiveDate) -> Result<CliAction, String> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        [] | ["bracket"] => Ok(CliAction::Bracket(Season::for_date(today))),
        ["bracket", season] => Season::parse(season)
            .map(CliAction::Bracket)
            .ok_or_else(|| format!("Invalid season: {season} (expected e.g. 20222023)")),
        ["-h" | "--help"] => Ok(CliAction::Help),
        ["-V" | "--version"] => Ok(CliAction::Version),
        [arg, ..] => Err(format!("Unknown argument: {arg}")),
    }
}

fn usage_text() -> &'static str {
    "puckbot - NHL playoff bracket renderer

Usage:
  puckbot [bracket [SEASON]]
  puckbot --help
  puckbot --version

SEASON is the 8-digit form, e.g. 20222023. Defaults to the current season.

Environment:
  PUCKBOT_STATIC_DIR     Template, font and NHL_logos/ directory (default static)
  PUCKBOT_OUTPUT_DIR     Where the rendered PNG is written (default .)
  PUCKBOT_ENVIRONMENT    Set to local to also print the resolved bracket
  PUCKBOT_LOG            Log level when RUST_LOG is unset (default info)
  PUCKBOT_API_URL        NHL stats API base URL
  PUCKBOT_PLAYOFFS_JSON  Path to local playoffs JSON snapshot"
}

fn init_logging(settings: &Settings) {
    let level = settings.log_level.unwrap_or(LevelFilter::Info);
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(settings: &Settings, season: Season) -> anyhow::Result<()> {
    let api = NhlApi::with_base_url(&settings.api_url);
    let teams = api.fetch_teams().await.context("loading team directory")?;
    let playoffs = api
        .fetch_playoffs(&season, &teams)
        .await
        .with_context(|| format!("loading playoffs for season {season}"))?;

    let assets = BracketAssets::load(&settings.template_path(), &settings.font_path())?;
    let logos = LogoDir::new(settings.logo_dir());

    let season_id = season.to_string();
    let raw_series = playoffs.into_series();
    let rendered = match service::bracket_image(&season_id, &raw_series, &assets, &logos) {
        Ok(rendered) => rendered,
        Err(e) if e.is_unavailable() => {
            println!("Bracket not available for season {season_id}");
            return Ok(());
        }
        Err(e @ BracketError::AssetMissing { .. }) => {
            error!("{e}");
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if settings.is_local() {
        print!("{}", service::describe(&rendered.bracket));
    }

    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("creating {}", settings.output_dir.display()))?;
    let path = settings.output_dir.join(&rendered.image.file_name);
    std::fs::write(&path, &rendered.image.png)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {} ({} bytes)", path.display(), rendered.image.png.len());
    println!("{}", path.display());
    Ok(())
}
