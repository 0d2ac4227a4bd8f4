use crate::assets::{BracketAssets, TeamAssets};
use crate::bracket::layout::{CHAMPION_POSITION, CaptionAlign, LayoutEntry};
use crate::bracket::{Bracket, BracketError, SlotCode};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Pixel, Rgba, RgbaImage};
use log::{debug, error};
use resvg::{tiny_skia, usvg};
use std::collections::BTreeMap;
use std::io::Cursor;

/// Scale applied to every per-slot logo.
pub const LOGO_SCALE: (f32, f32) = (0.9, 0.9);

/// Scale applied to the champion's logo.
pub const CHAMPION_SCALE: (f32, f32) = (2.0, 1.8);

const CAPTION_FONT_SIZE: u32 = 22;

/// A rendered bracket, ready to be sent.
#[derive(Debug, Clone)]
pub struct BracketImage {
    pub file_name: String,
    pub png: Vec<u8>,
}

pub fn file_name(season: &str) -> String {
    format!("NHL{season}.png")
}

/// Height of the strip each caption is rasterized into, centred on its anchor.
const CAPTION_BAND: u32 = 64;

#[derive(Debug, Clone, PartialEq)]
struct Caption {
    slot: SlotCode,
    text: String,
    anchor: (i64, i64),
    align: CaptionAlign,
}

/// Composite logos and captions onto a fresh copy of the template.
///
/// Slots must appear in both `bracket` and `layout` to be drawn. Slots with
/// unknown participants still get their caption. A missing logo aborts the
/// whole render; there is no partial output.
pub fn render(
    season: &str,
    bracket: &Bracket,
    layout: &BTreeMap<SlotCode, LayoutEntry>,
    assets: &BracketAssets,
    logos: &dyn TeamAssets,
) -> Result<BracketImage, BracketError> {
    let mut canvas = assets.canvas();

    for (code, slot) in bracket {
        let Some(entry) = layout.get(code) else {
            continue;
        };
        if !slot.is_drawable() {
            debug!("slot {code}: participants undecided, caption only");
            continue;
        }
        debug!("drawing slot {code}");
        for (team, at) in [(&slot.top_team, entry.top), (&slot.bottom_team, entry.bottom)] {
            if let Some(team) = team {
                let logo = logos.logo(team).inspect_err(|e| {
                    error!("render failed for season {season} at slot {code}: {e}");
                })?;
                paste_logo(&mut canvas, &logo, at, LOGO_SCALE);
            }
        }
    }

    let options = usvg::Options {
        font_family: assets.font_family().to_owned(),
        fontdb: assets.fonts(),
        ..usvg::Options::default()
    };
    for caption in collect_captions(bracket, layout) {
        draw_caption(&mut canvas, &caption, &options)
            .map_err(|reason| render_error(season, Some(caption.slot), reason))?;
    }

    if let Some(champion) = bracket.get(&SlotCode::O).and_then(|o| o.winner.as_ref()) {
        debug!("drawing champion {champion}");
        let logo = logos.logo(champion).inspect_err(|e| {
            error!("render failed for season {season} at champion overlay: {e}");
        })?;
        paste_logo(&mut canvas, &logo, CHAMPION_POSITION, CHAMPION_SCALE);
    }

    let png = encode_png(canvas).map_err(|reason| render_error(season, None, reason))?;

    Ok(BracketImage { file_name: file_name(season), png })
}

fn render_error(season: &str, slot: Option<SlotCode>, reason: String) -> BracketError {
    let err = BracketError::Render { season: season.to_owned(), slot, reason };
    error!("{err}");
    err
}

fn paste_logo(canvas: &mut RgbaImage, logo: &RgbaImage, at: (i64, i64), scale: (f32, f32)) {
    let width = ((logo.width() as f32 * scale.0) as u32).max(1);
    let height = ((logo.height() as f32 * scale.1) as u32).max(1);
    let scaled = imageops::resize(logo, width, height, FilterType::Nearest);
    imageops::overlay(canvas, &scaled, at.0, at.1);
}

// ---------------------------------------------------------------------------
// Captions: one SVG text strip per slot, rasterized with resvg
// ---------------------------------------------------------------------------

/// Status captions for every laid-out slot with a non-empty status, in slot
/// order. Undecided slots keep their caption.
fn collect_captions(bracket: &Bracket, layout: &BTreeMap<SlotCode, LayoutEntry>) -> Vec<Caption> {
    bracket
        .iter()
        .filter(|(_, slot)| !slot.status.is_empty())
        .filter_map(|(code, slot)| {
            let entry = layout.get(code)?;
            Some(Caption {
                slot: *code,
                text: slot.status.clone(),
                anchor: entry.caption,
                align: entry.align,
            })
        })
        .collect()
}

fn draw_caption(
    canvas: &mut RgbaImage,
    caption: &Caption,
    options: &usvg::Options,
) -> Result<(), String> {
    let width = canvas.width();
    let svg = caption_svg(width, CAPTION_BAND, caption);
    let tree = usvg::Tree::from_str(&svg, options).map_err(|e| format!("caption svg: {e}"))?;

    let mut pixmap = tiny_skia::Pixmap::new(width, CAPTION_BAND)
        .ok_or_else(|| format!("failed to allocate {width}x{CAPTION_BAND} caption strip"))?;
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pixmap.as_mut());

    let top = caption.anchor.1 - i64::from(CAPTION_BAND / 2);
    let height = i64::from(canvas.height());
    for (i, src) in pixmap.pixels().iter().enumerate() {
        if src.alpha() == 0 {
            continue;
        }
        let (x, y) = (i as u32 % width, top + (i as u32 / width) as i64);
        if !(0..height).contains(&y) {
            continue;
        }
        let c = src.demultiply();
        canvas
            .get_pixel_mut(x, y as u32)
            .blend(&Rgba([c.red(), c.green(), c.blue(), c.alpha()]));
    }
    Ok(())
}

/// A `width` x `height` document with the caption centred vertically; the
/// anchor's x is kept as is.
fn caption_svg(width: u32, height: u32, caption: &Caption) -> String {
    let anchor = match caption.align {
        CaptionAlign::Center => "middle",
        CaptionAlign::Right => "end",
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{}" y="{}" font-size="{CAPTION_FONT_SIZE}" fill="black" text-anchor="{anchor}" dominant-baseline="central">{}</text></svg>"#,
        caption.anchor.0,
        height / 2,
        escape_xml(&caption.text)
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn encode_png(canvas: RgbaImage) -> Result<Vec<u8>, String> {
    let mut png = Vec::new();
    image::DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(png)
}
