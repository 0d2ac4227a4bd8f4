pub mod assembler;
pub mod layout;
pub mod render;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// SlotCode: one series position in the 16-team bracket
// ---------------------------------------------------------------------------

/// Series letter. A to H are round 1, I to L round 2, M and N round 3, O the final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotCode {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
}

impl SlotCode {
    /// All slots in depth-major order: round 1 (8) + round 2 (4) + round 3 (2) + final (1).
    pub const ALL: [SlotCode; 15] = [
        SlotCode::A,
        SlotCode::B,
        SlotCode::C,
        SlotCode::D,
        SlotCode::E,
        SlotCode::F,
        SlotCode::G,
        SlotCode::H,
        SlotCode::I,
        SlotCode::J,
        SlotCode::K,
        SlotCode::L,
        SlotCode::M,
        SlotCode::N,
        SlotCode::O,
    ];

    pub fn from_letter(s: &str) -> Option<Self> {
        let mut chars = s.trim().chars();
        let c = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        Self::ALL.iter().copied().find(|code| code.letter() == c)
    }

    pub fn letter(self) -> char {
        (b'A' + self as u8) as char
    }

    pub fn round(self) -> u8 {
        match self {
            SlotCode::A
            | SlotCode::B
            | SlotCode::C
            | SlotCode::D
            | SlotCode::E
            | SlotCode::F
            | SlotCode::G
            | SlotCode::H => 1,
            SlotCode::I | SlotCode::J | SlotCode::K | SlotCode::L => 2,
            SlotCode::M | SlotCode::N => 3,
            SlotCode::O => 4,
        }
    }

    /// The two earlier-round slots whose winners meet here, as `(top, bottom)`.
    ///
    /// Orientation matches the template: the feeder drawn on the top logo
    /// position of this slot comes first.
    pub fn feeders(self) -> Option<(SlotCode, SlotCode)> {
        match self {
            SlotCode::I => Some((SlotCode::B, SlotCode::A)),
            SlotCode::J => Some((SlotCode::D, SlotCode::C)),
            SlotCode::K => Some((SlotCode::F, SlotCode::E)),
            SlotCode::L => Some((SlotCode::H, SlotCode::G)),
            SlotCode::M => Some((SlotCode::I, SlotCode::J)),
            SlotCode::N => Some((SlotCode::L, SlotCode::K)),
            SlotCode::O => Some((SlotCode::M, SlotCode::N)),
            _ => None,
        }
    }

    pub fn is_final(self) -> bool {
        self == SlotCode::O
    }
}

impl fmt::Display for SlotCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ---------------------------------------------------------------------------
// Slot / Bracket
// ---------------------------------------------------------------------------

/// Resolved state of one series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub code: SlotCode,
    pub round: u8,
    pub top_team: Option<String>, // short code; None = not yet known
    pub bottom_team: Option<String>,
    pub status: String,
    pub winner: Option<String>,
}

impl Slot {
    /// Both participants are known, so both logos can be drawn.
    pub fn is_drawable(&self) -> bool {
        self.top_team.is_some() && self.bottom_team.is_some()
    }
}

/// Full `{slot → Slot}` state for one season. Built fresh per request.
pub type Bracket = BTreeMap<SlotCode, Slot>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum BracketError {
    /// No round-1 series could be assembled (playoffs not started / no data).
    Unavailable { season: String },
    /// A team logo or the template image could not be loaded.
    AssetMissing { asset: String, path: PathBuf, reason: String },
    /// Anything else that went wrong while compositing.
    Render { season: String, slot: Option<SlotCode>, reason: String },
}

impl BracketError {
    pub fn asset_missing(asset: impl Into<String>, path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        BracketError::AssetMissing {
            asset: asset.into(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// True for the failures callers should report as "bracket not available".
    pub fn is_unavailable(&self) -> bool {
        matches!(self, BracketError::Unavailable { .. } | BracketError::Render { .. })
    }
}

impl fmt::Display for BracketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketError::Unavailable { season } => {
                write!(f, "Bracket not available for season {season}")
            }
            BracketError::AssetMissing { asset, path, reason } => {
                write!(f, "Missing asset {asset} at {}: {reason}", path.display())
            }
            BracketError::Render { season, slot: Some(slot), reason } => {
                write!(f, "Render failed for season {season} at slot {slot}: {reason}")
            }
            BracketError::Render { season, slot: None, reason } => {
                write!(f, "Render failed for season {season}: {reason}")
            }
        }
    }
}

impl std::error::Error for BracketError {}
