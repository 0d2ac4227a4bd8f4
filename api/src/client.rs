use crate::statsapi::{PlayoffsResponse, TeamsResponse, WireMatchupTeam, WireSeries};
use crate::{PlayoffRound, Playoffs, RawSeries, Season, SeriesTeam, Team, TeamDirectory};
use log::{debug, info};
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const NHL_STATSAPI: &str = "https://statsapi.web.nhl.com/api/v1";

/// Env var naming a local playoffs JSON snapshot used instead of the network.
pub const PLAYOFFS_SNAPSHOT_ENV: &str = "PUCKBOT_PLAYOFFS_JSON";

/// NHL stats API client.
#[derive(Debug, Clone)]
pub struct NhlApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NhlApi {
    fn default() -> Self {
        Self::with_base_url(NHL_STATSAPI)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NhlApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("puckbot/0.1 (playoff bracket renderer)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Active franchises keyed by full name.
    pub async fn fetch_teams(&self) -> ApiResult<TeamDirectory> {
        let url = format!("{}/teams", self.base_url);
        let raw: TeamsResponse = self.get(&url).await?;
        let directory = map_teams(raw);
        debug!("loaded {} teams into directory", directory.len());
        Ok(directory)
    }

    /// Fetch the playoff tree for a season, resolving team names to short
    /// codes through `directory`.
    ///
    /// When `PUCKBOT_PLAYOFFS_JSON` is set, the payload is read from that
    /// file instead of the network.
    pub async fn fetch_playoffs(
        &self,
        season: &Season,
        directory: &TeamDirectory,
    ) -> ApiResult<Playoffs> {
        if let Ok(path) = std::env::var(PLAYOFFS_SNAPSHOT_ENV)
            && !path.trim().is_empty()
        {
            debug!("loading playoffs snapshot from {path}");
            return load_playoffs_snapshot(&path, season, directory);
        }

        let url = format!(
            "{}/tournaments/playoffs?expand=round.series,schedule.seriesSummary&season={season}",
            self.base_url
        );
        let raw: PlayoffsResponse = self.get(&url).await?;
        Ok(map_playoffs(raw, season, directory))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: stats API wire types → clean domain types
// ---------------------------------------------------------------------------

fn load_playoffs_snapshot(
    path: &str,
    season: &Season,
    directory: &TeamDirectory,
) -> ApiResult<Playoffs> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ApiError::NotFound(format!("could not read {path}: {e}")))?;
    let raw: PlayoffsResponse = serde_json::from_str(&content)
        .map_err(|e| ApiError::Other(format!("invalid playoffs json at {path}: {e}")))?;
    Ok(map_playoffs(raw, season, directory))
}

fn map_teams(raw: TeamsResponse) -> TeamDirectory {
    TeamDirectory::new(
        raw.teams
            .into_iter()
            .filter(|t| t.active && t.first_year_of_play.is_some())
            .filter_map(|t| {
                let short_name = t.abbreviation?;
                Some(Team { id: t.id, name: t.name, short_name })
            }),
    )
}

fn map_playoffs(raw: PlayoffsResponse, season: &Season, directory: &TeamDirectory) -> Playoffs {
    let season_id = raw.season.unwrap_or_else(|| season.to_string());
    let rounds = raw.rounds.unwrap_or_default();
    if rounds.is_empty() {
        info!("No playoffs available for season {season_id}");
    }

    Playoffs {
        season: season_id,
        rounds: rounds
            .into_iter()
            .map(|r| PlayoffRound {
                number: r.number,
                series: r.series.iter().map(|s| map_series(s, directory)).collect(),
            })
            .collect(),
    }
}

fn map_series(s: &WireSeries, directory: &TeamDirectory) -> RawSeries {
    let status = s
        .current_game
        .as_ref()
        .and_then(|g| g.series_summary.as_ref())
        .and_then(|summary| summary.series_status_short.clone())
        .unwrap_or_default();

    RawSeries {
        series_code: s.series_code.clone().unwrap_or_default(),
        round: s.round.number,
        teams: s
            .matchup_teams
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| map_matchup_team(t, directory))
            .collect(),
        status,
    }
}

fn map_matchup_team(t: &WireMatchupTeam, directory: &TeamDirectory) -> SeriesTeam {
    SeriesTeam {
        name: t.team.name.clone(),
        code: directory.short_code(&t.team.name).map(str::to_owned),
        is_top_seed: t.seed.as_ref().and_then(|s| s.is_top),
        wins: t.series_record.as_ref().and_then(|r| r.wins),
    }
}
