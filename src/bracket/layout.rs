use crate::bracket::SlotCode;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Layout constants: pixel positions on static/playoffs_template.png
// ---------------------------------------------------------------------------

/// Horizontal offset from a logo's left edge to the centre of its caption.
const CAPTION_DX: i64 = 70;

/// Vertical offset applied to the midpoint between the two logos.
const CAPTION_DY: i64 = 45;

/// Right edge of the final's caption.
const FINAL_CAPTION: (i64, i64) = (720, 560);

/// Top-left corner of the enlarged champion logo.
pub const CHAMPION_POSITION: (i64, i64) = (520, 765);

/// Logo corners as `(top, bottom)` per slot.
///
/// Round 1 sits in two vertical stacks: A to D on the right edge, E to H on the
/// left. Later rounds step inwards towards the final in the middle.
fn logo_positions(code: SlotCode) -> ((i64, i64), (i64, i64)) {
    match code {
        SlotCode::A => ((1175, 50), (1175, 185)),
        SlotCode::B => ((1175, 280), (1175, 405)),
        SlotCode::C => ((1175, 505), (1175, 625)),
        SlotCode::D => ((1175, 730), (1175, 865)),
        SlotCode::E => ((15, 505), (15, 625)),
        SlotCode::F => ((15, 730), (15, 865)),
        SlotCode::G => ((15, 50), (15, 185)),
        SlotCode::H => ((15, 280), (15, 405)),
        SlotCode::I => ((1000, 350), (1000, 120)),
        SlotCode::J => ((1000, 800), (1000, 570)),
        SlotCode::K => ((185, 800), (185, 570)),
        SlotCode::L => ((185, 350), (185, 120)),
        SlotCode::M => ((835, 235), (835, 675)),
        SlotCode::N => ((355, 235), (355, 675)),
        SlotCode::O => ((665, 450), (530, 450)),
    }
}

// ---------------------------------------------------------------------------
// LayoutEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionAlign {
    /// Text centred horizontally and vertically on the anchor.
    Center,
    /// Text ends at the anchor, vertically centred.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub top: (i64, i64),
    pub bottom: (i64, i64),
    pub caption: (i64, i64),
    pub align: CaptionAlign,
}

impl LayoutEntry {
    pub fn for_slot(code: SlotCode) -> Self {
        let (top, bottom) = logo_positions(code);
        if code.is_final() {
            return Self { top, bottom, caption: FINAL_CAPTION, align: CaptionAlign::Right };
        }
        let caption = (top.0 + CAPTION_DX, (top.1 + bottom.1) / 2 + CAPTION_DY);
        Self { top, bottom, caption, align: CaptionAlign::Center }
    }
}

/// Positions for every slot that can appear in a bracket of `bracket_size`
/// populated slots. Earlier rounds never move when later rounds appear.
pub fn positions_for(bracket_size: usize) -> BTreeMap<SlotCode, LayoutEntry> {
    SlotCode::ALL
        .into_iter()
        .filter(|code| match code.round() {
            1 => true,
            2 => bracket_size > 8,
            3 => bracket_size > 12,
            _ => bracket_size > 14,
        })
        .map(|code| (code, LayoutEntry::for_slot(code)))
        .collect()
}
