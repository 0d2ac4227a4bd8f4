use crate::assets::{BracketAssets, TeamAssets};
use crate::bracket::assembler::assemble;
use crate::bracket::layout::positions_for;
use crate::bracket::render::{BracketImage, render};
use crate::bracket::{Bracket, BracketError};
use log::{error, info};
use nhl_api::RawSeries;
use std::fmt::Write;

/// Output of one bracket request.
#[derive(Debug)]
pub struct RenderedBracket {
    pub bracket: Bracket,
    pub image: BracketImage,
}

/// Assemble, lay out and render one season's bracket.
///
/// Nothing is shared between calls except the read-only `assets`.
pub fn bracket_image(
    season: &str,
    raw_series: &[RawSeries],
    assets: &BracketAssets,
    logos: &dyn TeamAssets,
) -> Result<RenderedBracket, BracketError> {
    let bracket = assemble(raw_series);
    if bracket.is_empty() {
        info!("No bracket available for season {season}");
        return Err(BracketError::Unavailable { season: season.to_owned() });
    }

    let layout = positions_for(bracket.len());
    info!(
        "rendering {} of {} slots for season {season}",
        layout.keys().filter(|code| bracket.contains_key(code)).count(),
        bracket.len()
    );

    let image = render(season, &bracket, &layout, assets, logos).inspect_err(|e| {
        error!("Error getting playoff bracket for season {season}: {e}");
    })?;
    Ok(RenderedBracket { bracket, image })
}

/// One line per slot, for diagnostics.
pub fn describe(bracket: &Bracket) -> String {
    let mut out = String::new();
    for (code, slot) in bracket {
        let top = slot.top_team.as_deref().unwrap_or("TBD");
        let bottom = slot.bottom_team.as_deref().unwrap_or("TBD");
        let _ = write!(out, "{code} (R{}) {top:>3} vs {bottom:<3}", slot.round);
        if !slot.status.is_empty() {
            let _ = write!(out, "  {}", slot.status);
        }
        if let Some(winner) = &slot.winner {
            let _ = write!(out, "  -> {winner}");
        }
        out.push('\n');
    }
    out
}
