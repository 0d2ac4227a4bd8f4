/// NHL stats API raw wire types: serde shapes for deserializing responses.
/// These map to our clean domain types in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Teams  (/teams)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<WireTeam>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireTeam {
    pub id: u32,
    pub name: String,
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// Missing on franchises that never played (placeholders, relocations).
    pub first_year_of_play: Option<String>,
}

// ---------------------------------------------------------------------------
// Playoffs  (/tournaments/playoffs?expand=round.series,schedule.seriesSummary)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PlayoffsResponse {
    pub season: Option<String>,
    /// Absent before the playoffs are seeded.
    pub rounds: Option<Vec<WireRound>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireRound {
    pub number: i32,
    #[serde(default)]
    pub series: Vec<WireSeries>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireSeries {
    pub series_code: Option<String>,
    pub round: WireRoundRef,
    /// Missing until both participants are known.
    pub matchup_teams: Option<Vec<WireMatchupTeam>>,
    pub current_game: Option<WireCurrentGame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireRoundRef {
    pub number: i32,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireMatchupTeam {
    pub team: WireTeamRef,
    pub seed: Option<WireSeed>,
    pub series_record: Option<WireSeriesRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireTeamRef {
    pub id: Option<u32>,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireSeed {
    #[serde(rename = "type")]
    pub seed_type: Option<String>,
    pub rank: Option<u32>,
    pub is_top: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WireSeriesRecord {
    pub wins: Option<u8>,
    pub losses: Option<u8>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireCurrentGame {
    pub series_summary: Option<WireSeriesSummary>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WireSeriesSummary {
    pub series_status: Option<String>,
    pub series_status_short: Option<String>,
}
