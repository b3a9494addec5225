//! Text watermark rendering.
//!
//! Lays out a single line of text with kerning, anchors its ink bounding box
//! 50px in from the image's bottom-left corner, and rasterizes a 1px black
//! outline (four diagonal offset copies) beneath the fill color so the text
//! stays legible against varying backgrounds.

use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, ScaleFont};
use image::{Rgba, RgbaImage};

/// Font size, in pixels, for a 700px-wide image; scales with image width.
pub const BASE_FONT_SIZE: f32 = 20.0;

/// Reference image width against which the font size is scaled.
pub const REFERENCE_WIDTH: f32 = 700.0;

/// Inset of the text bounding box from the left and bottom edges, in pixels.
pub const TEXT_INSET: f32 = 50.0;

const OUTLINE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const OUTLINE_OFFSETS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

/// Pixel bounding box of a line's rendered ink, relative to the layout origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InkBounds {
    /// Leftmost inked x coordinate.
    pub min_x: f32,
    /// Topmost inked y coordinate.
    pub min_y: f32,
    /// Rightmost inked x coordinate.
    pub max_x: f32,
    /// Bottommost inked y coordinate.
    pub max_y: f32,
}

/// Lay out one line of glyphs with kerning, baseline at y = 0.
fn layout_line(font: &FontVec, text: &str, px_size: f32) -> Vec<Glyph> {
    let scaled = font.as_scaled(px_size);
    let mut glyphs = Vec::with_capacity(text.len());
    let mut cursor = 0.0_f32;
    let mut last: Option<GlyphId> = None;

    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = font.glyph_id(ch);
        if let Some(prev) = last {
            cursor += scaled.kern(prev, id);
        }
        glyphs.push(id.with_scale_and_position(px_size, point(cursor, 0.0)));
        cursor += scaled.h_advance(id);
        last = Some(id);
    }

    glyphs
}

fn bounds_of(font: &FontVec, glyphs: &[Glyph]) -> Option<InkBounds> {
    let mut bounds: Option<InkBounds> = None;
    for glyph in glyphs {
        let Some(outlined) = font.outline_glyph(glyph.clone()) else {
            continue;
        };
        let rect = outlined.px_bounds();
        let b = bounds.get_or_insert(InkBounds {
            min_x: rect.min.x,
            min_y: rect.min.y,
            max_x: rect.max.x,
            max_y: rect.max.y,
        });
        b.min_x = b.min_x.min(rect.min.x);
        b.min_y = b.min_y.min(rect.min.y);
        b.max_x = b.max_x.max(rect.max.x);
        b.max_y = b.max_y.max(rect.max.y);
    }
    bounds
}

/// Ink bounding box of `text` at `px_size`, relative to the layout origin.
///
/// Returns `None` when nothing would be inked (empty or whitespace-only text).
#[must_use]
pub fn line_ink_bounds(font: &FontVec, text: &str, px_size: f32) -> Option<InkBounds> {
    bounds_of(font, &layout_line(font, text, px_size))
}

/// Source-over blend of `color` weighted by glyph coverage onto one pixel.
fn blend_pixel(dst: &mut Rgba<u8>, color: Rgba<u8>, coverage: f32) {
    let alpha = coverage.clamp(0.0, 1.0) * (f32::from(color[3]) / 255.0);
    if alpha <= 0.0 {
        return;
    }
    let inv = 1.0 - alpha;
    for ch in 0..3 {
        let blended = alpha * f32::from(color[ch]) + inv * f32::from(dst[ch]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            dst[ch] = blended.clamp(0.0, 255.0) as u8;
        }
    }
    let out_a = alpha * 255.0 + inv * f32::from(dst[3]);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    {
        dst[3] = out_a.clamp(0.0, 255.0) as u8;
    }
}

/// Rasterize laid-out glyphs at an offset from the layout origin.
fn draw_line(
    img: &mut RgbaImage,
    font: &FontVec,
    glyphs: &[Glyph],
    offset: (f32, f32),
    color: Rgba<u8>,
) {
    let (img_w, img_h) = img.dimensions();
    for glyph in glyphs {
        let mut positioned = glyph.clone();
        positioned.position = point(glyph.position.x + offset.0, glyph.position.y + offset.1);
        let Some(outlined) = font.outline_glyph(positioned) else {
            continue;
        };
        let rect = outlined.px_bounds();
        outlined.draw(|x, y, coverage| {
            #[allow(clippy::cast_possible_truncation)]
            let px = rect.min.x as i64 + i64::from(x);
            #[allow(clippy::cast_possible_truncation)]
            let py = rect.min.y as i64 + i64::from(y);
            if px < 0 || py < 0 || px >= i64::from(img_w) || py >= i64::from(img_h) {
                return;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            blend_pixel(img.get_pixel_mut(px as u32, py as u32), color, coverage);
        });
    }
}

/// Render a text watermark onto `img`, in-place.
///
/// The font size is `20 * width / 700` (truncated, minimum 1px). The text's
/// ink bounding box is anchored with its left edge 50px from the image's left
/// edge and its bottom edge 50px above the image's bottom edge. A black
/// outline is drawn first as four diagonally offset copies, then the fill.
///
/// Whitespace-only text inks nothing and leaves the image untouched.
pub fn draw_text_watermark(img: &mut RgbaImage, font: &FontVec, text: &str, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    #[allow(clippy::cast_precision_loss)]
    let px_size = (BASE_FONT_SIZE * w as f32 / REFERENCE_WIDTH).floor().max(1.0);

    let glyphs = layout_line(font, text, px_size);
    let Some(bounds) = bounds_of(font, &glyphs) else {
        return;
    };

    let dx = TEXT_INSET - bounds.min_x;
    #[allow(clippy::cast_precision_loss)]
    let dy = (h as f32 - TEXT_INSET) - bounds.max_y;

    for (ox, oy) in OUTLINE_OFFSETS {
        draw_line(img, font, &glyphs, (dx + ox, dy + oy), OUTLINE_COLOR);
    }
    draw_line(img, font, &glyphs, (dx, dy), color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_pixel_full_coverage_replaces_color() {
        let mut dst = Rgba([10, 20, 30, 255]);
        blend_pixel(&mut dst, Rgba([200, 100, 50, 255]), 1.0);
        assert_eq!(dst, Rgba([200, 100, 50, 255]));
    }

    #[test]
    fn blend_pixel_zero_coverage_is_noop() {
        let mut dst = Rgba([10, 20, 30, 255]);
        blend_pixel(&mut dst, Rgba([200, 100, 50, 255]), 0.0);
        assert_eq!(dst, Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn blend_pixel_half_coverage_mixes() {
        let mut dst = Rgba([0, 0, 0, 255]);
        blend_pixel(&mut dst, Rgba([255, 255, 255, 255]), 0.5);
        for ch in 0..3 {
            assert!(dst[ch] > 120 && dst[ch] < 135, "channel {ch} = {}", dst[ch]);
        }
    }
}
