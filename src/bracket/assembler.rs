use crate::bracket::{Bracket, Slot, SlotCode};
use log::{debug, warn};
use nhl_api::{RawSeries, SeriesTeam};
use std::fmt;

/// Wins needed to take a best-of-seven series.
pub const SERIES_WINS: u8 = 4;

/// Why a raw record could not become a slot. Only ever logged.
#[derive(Debug, PartialEq, Eq)]
enum SeriesDefect {
    UnknownCode(String),
    RoundMismatch { code: SlotCode, round: i32 },
    TeamCount(usize),
    UnresolvedTeam(String),
    SeedFlags,
    MissingRecord(String),
}

impl fmt::Display for SeriesDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesDefect::UnknownCode(code) => write!(f, "unknown series code {code:?}"),
            SeriesDefect::RoundMismatch { code, round } => {
                write!(f, "slot {code} belongs to round {}, record says {round}", code.round())
            }
            SeriesDefect::TeamCount(n) => write!(f, "expected 2 matchup teams, got {n}"),
            SeriesDefect::UnresolvedTeam(name) => write!(f, "no short code for team {name:?}"),
            SeriesDefect::SeedFlags => write!(f, "seed flags do not name exactly one top team"),
            SeriesDefect::MissingRecord(name) => write!(f, "no series record for {name:?}"),
        }
    }
}

/// Build the canonical bracket from the provider's series records.
///
/// Records without participants or with `round <= 0` are ignored. Malformed
/// round-1 records are dropped with a warning. A later-round record only has
/// to carry a valid code and round: its participants always come from the
/// winners of its feeder slots, never from the record itself. An empty map
/// means no bracket is available.
pub fn assemble(raw_series: &[RawSeries]) -> Bracket {
    let mut bracket = Bracket::new();

    for raw in raw_series {
        if raw.teams.is_empty() || raw.round <= 0 {
            continue;
        }
        match parse_series(raw) {
            Ok(slot) => {
                if bracket.contains_key(&slot.code) {
                    warn!("duplicate series {}; keeping the first record", slot.code);
                    continue;
                }
                bracket.insert(slot.code, slot);
            }
            Err(defect) => {
                warn!("dropping series {:?}: {defect}", raw.series_code);
            }
        }
    }

    if !bracket.values().any(|s| s.round == 1) {
        debug!("no round-1 series assembled; bracket unavailable");
        return Bracket::new();
    }

    // Depth-major order guarantees feeders are resolved before their parent.
    for code in SlotCode::ALL {
        let Some((top_feeder, bottom_feeder)) = code.feeders() else {
            continue;
        };
        if !bracket.contains_key(&code) {
            continue;
        }
        let top = winner_of(&bracket, top_feeder);
        let bottom = winner_of(&bracket, bottom_feeder);
        if let Some(slot) = bracket.get_mut(&code) {
            propagate(slot, top, bottom);
        }
    }

    bracket
}

fn winner_of(bracket: &Bracket, code: SlotCode) -> Option<String> {
    bracket.get(&code).and_then(|s| s.winner.clone())
}

/// Overwrite a later-round slot's participants with its feeders' winners.
fn propagate(slot: &mut Slot, top: Option<String>, bottom: Option<String>) {
    match (top, bottom) {
        (Some(top), Some(bottom)) => {
            // The record's own winner only stands if it is one of the
            // propagated participants.
            if let Some(winner) = slot.winner.take() {
                if winner == top || winner == bottom {
                    slot.winner = Some(winner);
                } else {
                    warn!("slot {}: winner {winner} is not a participant ({top} vs {bottom})", slot.code);
                }
            }
            slot.top_team = Some(top);
            slot.bottom_team = Some(bottom);
        }
        _ => {
            slot.top_team = None;
            slot.bottom_team = None;
            slot.winner = None;
        }
    }
}

fn parse_series(raw: &RawSeries) -> Result<Slot, SeriesDefect> {
    let code = SlotCode::from_letter(&raw.series_code)
        .ok_or_else(|| SeriesDefect::UnknownCode(raw.series_code.clone()))?;
    if i32::from(code.round()) != raw.round {
        return Err(SeriesDefect::RoundMismatch { code, round: raw.round });
    }
    if code.round() > 1 {
        return Ok(later_round_slot(code, raw));
    }

    let [first, second] = raw.teams.as_slice() else {
        return Err(SeriesDefect::TeamCount(raw.teams.len()));
    };

    let (top, bottom) = match (first.is_top_seed, second.is_top_seed) {
        (Some(true), Some(false)) => (first, second),
        (Some(false), Some(true)) => (second, first),
        _ => return Err(SeriesDefect::SeedFlags),
    };

    let top_code = short_code(top)?;
    let bottom_code = short_code(bottom)?;
    let top_wins = top.wins.ok_or_else(|| SeriesDefect::MissingRecord(top.name.clone()))?;
    let bottom_wins = bottom
        .wins
        .ok_or_else(|| SeriesDefect::MissingRecord(bottom.name.clone()))?;

    let winner = series_winner(top_wins, bottom_wins).map(|top_won| {
        if top_won { top_code.clone() } else { bottom_code.clone() }
    });

    Ok(Slot {
        code,
        round: code.round(),
        top_team: Some(top_code),
        bottom_team: Some(bottom_code),
        status: raw.status.clone(),
        winner,
    })
}

/// Participants are left for `propagate` to fill in. The record contributes
/// its status and, when exactly one resolvable team has four wins, a claimed
/// winner that `propagate` checks against the real participants.
fn later_round_slot(code: SlotCode, raw: &RawSeries) -> Slot {
    let mut decided = raw.teams.iter().filter(|t| t.wins == Some(SERIES_WINS));
    let winner = match (decided.next(), decided.next()) {
        (Some(team), None) => short_code(team).ok(),
        _ => None,
    };
    Slot {
        code,
        round: code.round(),
        top_team: None,
        bottom_team: None,
        status: raw.status.clone(),
        winner,
    }
}

fn short_code(team: &SeriesTeam) -> Result<String, SeriesDefect> {
    team.code
        .clone()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| SeriesDefect::UnresolvedTeam(team.name.clone()))
}

/// `Some(true)` when the top team has taken the series, `Some(false)` for the
/// bottom team. Anything but exactly one side at four wins is undecided.
pub fn series_winner(top_wins: u8, bottom_wins: u8) -> Option<bool> {
    match (top_wins == SERIES_WINS, bottom_wins == SERIES_WINS) {
        (true, false) => Some(true),
        (false, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn team(code: &str, top: bool, wins: u8) -> SeriesTeam {
        SeriesTeam {
            name: format!("{code} Full Name"),
            code: Some(code.into()),
            is_top_seed: Some(top),
            wins: Some(wins),
        }
    }

    pub(crate) fn series(code: &str, round: i32, top: (&str, u8), bottom: (&str, u8)) -> RawSeries {
        RawSeries {
            series_code: code.into(),
            round,
            teams: vec![team(top.0, true, top.1), team(bottom.0, false, bottom.1)],
            status: format!("{}-{}", top.1.max(bottom.1), top.1.min(bottom.1)),
        }
    }

    /// Eight decided first-round series; the top team wins A, C, E, G.
    pub(crate) fn first_round() -> Vec<RawSeries> {
        vec![
            series("A", 1, ("BOS", 4), ("FLA", 3)),
            series("B", 1, ("TOR", 2), ("TBL", 4)),
            series("C", 1, ("CAR", 4), ("NYI", 2)),
            series("D", 1, ("NJD", 1), ("NYR", 4)),
            series("E", 1, ("VGK", 4), ("WPG", 1)),
            series("F", 1, ("EDM", 2), ("LAK", 4)),
            series("G", 1, ("COL", 4), ("SEA", 3)),
            series("H", 1, ("DAL", 3), ("MIN", 4)),
        ]
    }

    /// A full season where every series is decided and the bottom team
    /// takes the final 4-1.
    pub(crate) fn full_season() -> Vec<RawSeries> {
        let mut all = first_round();
        all.extend([
            // Raw seed orientation deliberately disagrees with the template.
            series("I", 2, ("BOS", 1), ("TBL", 4)),
            series("J", 2, ("CAR", 4), ("NYR", 2)),
            series("K", 2, ("VGK", 2), ("LAK", 4)),
            series("L", 2, ("COL", 4), ("MIN", 3)),
            series("M", 3, ("CAR", 4), ("TBL", 1)),
            series("N", 3, ("COL", 2), ("LAK", 4)),
            series("O", 4, ("CAR", 1), ("LAK", 4)),
        ]);
        all
    }

    #[test]
    fn test_round_one_slots_follow_seed_flags() {
        let mut raw = first_round();
        // Bottom seed listed first.
        raw[0].teams.reverse();
        let bracket = assemble(&raw);
        let a = &bracket[&SlotCode::A];
        assert_eq!(a.top_team.as_deref(), Some("BOS"));
        assert_eq!(a.bottom_team.as_deref(), Some("FLA"));
        assert_eq!(a.winner.as_deref(), Some("BOS"));
        assert_eq!(a.status, "4-3");
        assert_eq!(bracket.len(), 8);
    }

    #[test]
    fn test_winner_requires_exactly_one_side_at_four() {
        assert_eq!(series_winner(4, 2), Some(true));
        assert_eq!(series_winner(1, 4), Some(false));
        assert_eq!(series_winner(3, 3), None);
        assert_eq!(series_winner(0, 0), None);
        assert_eq!(series_winner(4, 4), None);
        assert_eq!(series_winner(5, 1), None);
    }

    #[test]
    fn test_undecided_series_has_no_winner() {
        let raw = vec![series("A", 1, ("BOS", 3), ("FLA", 3))];
        let bracket = assemble(&raw);
        assert_eq!(bracket[&SlotCode::A].winner, None);
    }

    #[test]
    fn test_later_rounds_ignore_stale_raw_participants() {
        let bracket = assemble(&full_season());
        assert_eq!(bracket.len(), 15);
        for code in SlotCode::ALL {
            let Some((top, bottom)) = code.feeders() else { continue };
            let slot = &bracket[&code];
            assert_eq!(slot.top_team, bracket[&top].winner, "{code} top");
            assert_eq!(slot.bottom_team, bracket[&bottom].winner, "{code} bottom");
        }
        let i = &bracket[&SlotCode::I];
        assert_eq!(i.top_team.as_deref(), Some("TBL"));
        assert_eq!(i.bottom_team.as_deref(), Some("BOS"));
    }

    #[test]
    fn test_foreign_raw_participants_are_replaced() {
        let mut raw = first_round();
        raw.push(series("I", 2, ("XXX", 4), ("YYY", 1)));
        let bracket = assemble(&raw);
        let i = &bracket[&SlotCode::I];
        assert_eq!(i.top_team.as_deref(), Some("TBL"));
        assert_eq!(i.bottom_team.as_deref(), Some("BOS"));
        assert_eq!(i.winner, None);
    }

    #[test]
    fn test_later_round_records_need_no_seed_flags_or_codes() {
        let mut raw = first_round();
        let mut i = series("I", 2, ("TBL", 4), ("BOS", 2));
        for team in &mut i.teams {
            team.is_top_seed = None;
        }
        let mut j = series("J", 2, ("NYR", 1), ("CAR", 4));
        j.teams[0].code = None;
        raw.extend([i, j]);

        let bracket = assemble(&raw);
        assert!(bracket.contains_key(&SlotCode::I) && bracket.contains_key(&SlotCode::J));
        let i = &bracket[&SlotCode::I];
        assert_eq!(i.top_team.as_deref(), Some("TBL"));
        assert_eq!(i.bottom_team.as_deref(), Some("BOS"));
        assert_eq!(i.winner.as_deref(), Some("TBL"));
        assert_eq!(i.status, "4-2");
        let j = &bracket[&SlotCode::J];
        assert_eq!(j.top_team.as_deref(), Some("NYR"));
        assert_eq!(j.bottom_team.as_deref(), Some("CAR"));
        assert_eq!(j.winner.as_deref(), Some("CAR"));
    }

    #[test]
    fn test_later_round_winner_needs_a_resolvable_code() {
        let mut raw = first_round();
        let mut i = series("I", 2, ("TBL", 4), ("BOS", 2));
        i.teams[0].code = None;
        let mut k = series("K", 2, ("LAK", 3), ("VGK", 1));
        k.teams.truncate(1);
        raw.extend([i, k]);

        let bracket = assemble(&raw);
        let i = &bracket[&SlotCode::I];
        assert!(i.is_drawable());
        assert_eq!(i.winner, None);
        let k = &bracket[&SlotCode::K];
        assert_eq!(k.top_team.as_deref(), Some("LAK"));
        assert_eq!(k.bottom_team.as_deref(), Some("VGK"));
        assert_eq!(k.winner, None);
    }

    #[test]
    fn test_later_round_winner_maps_to_propagated_team() {
        let bracket = assemble(&full_season());
        // I: top (TBL, from B) won 4-1.
        assert_eq!(bracket[&SlotCode::I].winner.as_deref(), Some("TBL"));
        // J: bottom (CAR, from C) won.
        assert_eq!(bracket[&SlotCode::J].winner.as_deref(), Some("CAR"));
        // O: bottom (N's winner) took the final.
        let o = &bracket[&SlotCode::O];
        assert_eq!(o.winner.as_deref(), Some("LAK"));
        assert_eq!(o.winner, o.bottom_team);
        assert_eq!(o.bottom_team, bracket[&SlotCode::N].winner);
    }

    #[test]
    fn test_undecided_feeders_leave_parent_empty() {
        let mut raw = first_round();
        // Neither I nor J decided; M present in the data anyway.
        raw.push(series("I", 2, ("TBL", 2), ("BOS", 2)));
        raw.push(series("J", 2, ("NYR", 3), ("CAR", 1)));
        raw.push(series("M", 3, ("TBL", 0), ("NYR", 0)));
        let bracket = assemble(&raw);
        let m = &bracket[&SlotCode::M];
        assert!(m.top_team.is_none());
        assert!(m.bottom_team.is_none());
        assert!(m.winner.is_none());
        assert!(!m.is_drawable());
    }

    #[test]
    fn test_later_rounds_absent_from_data_stay_absent() {
        let bracket = assemble(&first_round());
        assert!(SlotCode::ALL.iter().filter(|c| c.round() > 1).all(|c| !bracket.contains_key(c)));
    }

    #[test]
    fn test_placeholder_and_unmatched_records_are_ignored() {
        let mut raw = first_round();
        let mut play_in = series("A", 0, ("ZZZ", 4), ("QQQ", 0));
        play_in.series_code = "P".into();
        raw.insert(0, play_in);
        raw.push(RawSeries {
            series_code: "I".into(),
            round: 2,
            teams: vec![],
            status: String::new(),
        });
        let bracket = assemble(&raw);
        assert_eq!(bracket.len(), 8);
        assert_eq!(bracket[&SlotCode::A].top_team.as_deref(), Some("BOS"));
    }

    #[test]
    fn test_round_zero_excluded_even_when_valid() {
        let raw = vec![series("A", 0, ("BOS", 4), ("FLA", 0))];
        assert!(assemble(&raw).is_empty());
    }

    #[test]
    fn test_malformed_records_are_dropped_not_fatal() {
        let mut raw = first_round();
        raw[1].teams[0].is_top_seed = Some(false); // both bottom
        raw[2].teams[1].wins = None;
        raw[3].teams[0].code = None;
        raw[4].teams.pop();
        raw[5].series_code = "Z".into();
        raw[6].round = 2;
        let bracket = assemble(&raw);
        let codes: Vec<SlotCode> = bracket.keys().copied().collect();
        assert_eq!(codes, vec![SlotCode::A, SlotCode::H]);
    }

    #[test]
    fn test_defect_messages() {
        let mut raw = series("B", 1, ("TOR", 0), ("TBL", 0));
        raw.teams[1].is_top_seed = None;
        assert_eq!(parse_series(&raw), Err(SeriesDefect::SeedFlags));
        raw.round = 3;
        assert_eq!(
            parse_series(&raw).unwrap_err().to_string(),
            "slot B belongs to round 1, record says 3"
        );
    }

    #[test]
    fn test_no_round_one_means_no_bracket() {
        let raw = vec![series("I", 2, ("TBL", 4), ("BOS", 1))];
        assert!(assemble(&raw).is_empty());
        assert!(assemble(&[]).is_empty());
    }

    #[test]
    fn test_assemble_is_idempotent() {
        let raw = full_season();
        assert_eq!(assemble(&raw), assemble(&raw));
    }

    #[test]
    fn test_growing_input_only_adds_resolution() {
        let mut raw = first_round();
        // A and B undecided at first.
        raw[0] = series("A", 1, ("BOS", 3), ("FLA", 3));
        raw[1] = series("B", 1, ("TOR", 2), ("TBL", 3));
        raw.push(series("I", 2, ("TBL", 0), ("BOS", 0)));
        let before = assemble(&raw);
        assert!(!before[&SlotCode::I].is_drawable());

        raw[0] = series("A", 1, ("BOS", 4), ("FLA", 3));
        raw[1] = series("B", 1, ("TOR", 2), ("TBL", 4));
        let after = assemble(&raw);
        let i = &after[&SlotCode::I];
        assert_eq!(i.top_team.as_deref(), Some("TBL"));
        assert_eq!(i.bottom_team.as_deref(), Some("BOS"));
        for (code, slot) in &before {
            if slot.winner.is_some() {
                assert_eq!(slot.winner, after[code].winner, "{code}");
            }
        }
    }
}
