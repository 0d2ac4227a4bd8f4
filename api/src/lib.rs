pub mod client;
pub mod statsapi;

use chrono::{Datelike, NaiveDate};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Domain types: clean model, independent of the stats API wire format
// ---------------------------------------------------------------------------

/// An NHL season identifier such as `20222023`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Season {
    start_year: i32,
}

impl Season {
    pub fn new(start_year: i32) -> Self {
        Self { start_year }
    }

    /// The season a calendar date falls into. Playoffs run until June, so
    /// January to August belong to the season that began the previous autumn.
    pub fn for_date(date: NaiveDate) -> Self {
        if date.month() < 9 {
            Self::new(date.year() - 1)
        } else {
            Self::new(date.year())
        }
    }

    /// Parse the 8-digit form, e.g. `"20222023"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != 8 || !s.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let first: i32 = s[..4].parse().ok()?;
        let second: i32 = s[4..].parse().ok()?;
        (second == first + 1).then(|| Self::new(first))
    }

    pub fn start_year(&self) -> i32 {
        self.start_year
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.start_year, self.start_year + 1)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Playoffs {
    pub season: String,
    pub rounds: Vec<PlayoffRound>,
}

impl Playoffs {
    /// All series across every round, in provider order.
    pub fn series(&self) -> impl Iterator<Item = &RawSeries> {
        self.rounds.iter().flat_map(|r| r.series.iter())
    }

    pub fn into_series(self) -> Vec<RawSeries> {
        self.rounds.into_iter().flat_map(|r| r.series).collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlayoffRound {
    pub number: i32,
    pub series: Vec<RawSeries>,
}

/// One series record as the provider reports it. Nothing here is trusted
/// until the bracket assembler has validated it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSeries {
    /// Bracket letter, `"A"`..`"O"`.
    pub series_code: String,
    /// Round number; 0 or below marks placeholder / play-in entries.
    pub round: i32,
    /// Empty until the matchup is known.
    pub teams: Vec<SeriesTeam>,
    /// Short status text, e.g. "TOR leads 3-1".
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesTeam {
    pub name: String,
    pub code: Option<String>, // None = not in the team directory
    pub is_top_seed: Option<bool>,
    pub wins: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Team {
    pub id: u32,
    pub name: String,       // "Toronto Maple Leafs"
    pub short_name: String, // "TOR"
}

/// Full team name → team lookup.
#[derive(Debug, Clone, Default)]
pub struct TeamDirectory {
    teams: HashMap<String, Team>,
}

impl TeamDirectory {
    pub fn new(teams: impl IntoIterator<Item = Team>) -> Self {
        Self {
            teams: teams.into_iter().map(|t| (t.name.clone(), t)).collect(),
        }
    }

    pub fn short_code(&self, name: &str) -> Option<&str> {
        self.teams.get(name).map(|t| t.short_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}
