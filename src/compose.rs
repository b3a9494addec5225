//! Pure compositing primitives: display fitting and logo overlay.
//!
//! Watermarks are applied by forward compositing onto a full-resolution
//! base image, which is then fitted to the display bound:
//! `working = fit_within(watermark(original), max_w, max_h)`
//!
//! Every function here is pure over its inputs; session state lives in
//! [`crate::ImageSession`].

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Default display bound width, in pixels.
pub const DISPLAY_MAX_W: u32 = 700;

/// Default display bound height, in pixels.
pub const DISPLAY_MAX_H: u32 = 500;

/// A composited logo is scaled to `1 / LOGO_FRACTION` of the base width.
pub const LOGO_FRACTION: u32 = 5;

/// Inset of the logo from the bottom-left corner, in pixels.
pub const LOGO_INSET: i64 = 4;

/// Scale an image down to fit within `max_w` x `max_h`, preserving aspect ratio.
///
/// Never scales up: an image that already fits is returned unchanged.
/// Downscaling uses Lanczos3 resampling. Zero bounds are clamped to 1px.
#[must_use]
pub fn fit_within(img: &RgbaImage, max_w: u32, max_h: u32) -> RgbaImage {
    let (w, h) = img.dimensions();
    let max_w = max_w.max(1);
    let max_h = max_h.max(1);

    if w <= max_w && h <= max_h {
        return img.clone();
    }

    #[allow(clippy::cast_precision_loss)]
    let scale = (max_w as f32 / w as f32).min(max_h as f32 / h as f32);
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_w = ((w as f32 * scale).round() as u32).clamp(1, max_w);
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_h = ((h as f32 * scale).round() as u32).clamp(1, max_h);

    imageops::resize(img, new_w, new_h, FilterType::Lanczos3)
}

/// Alpha-composite a logo onto the bottom-left corner of `base`, in-place.
///
/// The logo is first scaled (aspect-preserving, Lanczos3) so its width is
/// exactly `base_width / 5`, then pasted at a 4px inset from the bottom-left
/// corner. Logos taller than the base are clipped by the overlay.
pub fn overlay_logo(base: &mut RgbaImage, logo: &RgbaImage) {
    let target_w = (base.width() / LOGO_FRACTION).max(1);
    #[allow(clippy::cast_precision_loss)]
    let scale = target_w as f32 / logo.width() as f32;
    // Truncating cast matches the logo's aspect within one pixel.
    #[allow(clippy::cast_precision_loss)]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let target_h = ((logo.height() as f32 * scale) as u32).max(1);

    let scaled = imageops::resize(logo, target_w, target_h, FilterType::Lanczos3);

    let y = i64::from(base.height()) - i64::from(target_h) - LOGO_INSET;
    imageops::overlay(base, &scaled, LOGO_INSET, y);
}

/// Parse a `#RRGGBB` hex color string into an opaque [`Rgba`] value.
///
/// The leading `#` is optional and hex digits are case-insensitive, matching
/// what OS color choosers hand back. Returns `None` for anything else.
#[must_use]
pub fn parse_hex_color(s: &str) -> Option<Rgba<u8>> {
    let hex = s.trim().strip_prefix('#').unwrap_or_else(|| s.trim());
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgba([r, g, b, 255]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(w, h, px)
    }

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    #[test]
    fn fit_within_never_upscales() {
        let img = solid(100, 50, RED);
        let fitted = fit_within(&img, DISPLAY_MAX_W, DISPLAY_MAX_H);
        assert_eq!(fitted.dimensions(), (100, 50));
    }

    #[test]
    fn fit_within_downscales_to_bound() {
        let img = solid(1400, 1000, RED);
        let fitted = fit_within(&img, 700, 500);
        assert_eq!(fitted.dimensions(), (700, 500));

        let wide = solid(2000, 500, RED);
        let fitted = fit_within(&wide, 700, 500);
        assert_eq!(fitted.dimensions(), (700, 175));
    }

    #[test]
    fn fit_within_preserves_aspect_ratio() {
        for (w, h) in [
            (1u32, 1u32),
            (699, 499),
            (701, 501),
            (3000, 2000),
            (10, 5000),
            (5000, 10),
            (1234, 567),
        ] {
            let img = solid(w, h, BLUE);
            let fitted = fit_within(&img, 700, 500);
            let (fw, fh) = fitted.dimensions();

            assert!(fw <= 700 && fh <= 500, "{w}x{h} -> {fw}x{fh} exceeds bound");
            assert!(fw <= w && fh <= h, "{w}x{h} -> {fw}x{fh} upscaled");

            #[allow(clippy::cast_precision_loss)]
            let (orig_ratio, new_ratio) = (w as f32 / h as f32, fw as f32 / fh as f32);
            let rel = (orig_ratio - new_ratio).abs() / orig_ratio;
            // One pixel of rounding slack on the short edge.
            #[allow(clippy::cast_precision_loss)]
            let tolerance = 1.0 / fw.min(fh) as f32;
            assert!(
                rel <= tolerance,
                "{w}x{h} -> {fw}x{fh}: ratio {orig_ratio} vs {new_ratio}"
            );
        }
    }

    #[test]
    fn fit_within_clamps_zero_bounds() {
        let img = solid(100, 100, RED);
        let fitted = fit_within(&img, 0, 0);
        assert_eq!(fitted.dimensions(), (1, 1));
    }

    #[test]
    fn overlay_logo_scales_to_fifth_of_base_width() {
        let mut base = solid(1000, 800, BLUE);
        let logo = solid(500, 500, RED);
        overlay_logo(&mut base, &logo);

        // Scaled logo is 200x200 with its top-left at (4, 596).
        assert_eq!(*base.get_pixel(4, 596), RED);
        assert_eq!(*base.get_pixel(203, 795), RED);
        assert_eq!(*base.get_pixel(3, 596), BLUE);
        assert_eq!(*base.get_pixel(4, 595), BLUE);
        assert_eq!(*base.get_pixel(204, 596), BLUE);
        assert_eq!(*base.get_pixel(500, 100), BLUE);
    }

    #[test]
    fn overlay_logo_respects_logo_aspect_ratio() {
        let mut base = solid(1000, 1000, BLUE);
        let logo = solid(400, 100, RED);
        overlay_logo(&mut base, &logo);

        // 400x100 -> 200x50, bottom-left inset 4px.
        assert_eq!(*base.get_pixel(4, 946), RED);
        assert_eq!(*base.get_pixel(203, 995), RED);
        assert_eq!(*base.get_pixel(4, 945), BLUE);
    }

    #[test]
    fn overlay_logo_blends_transparency() {
        let mut base = solid(1000, 800, Rgba([255, 255, 255, 255]));
        let logo = solid(500, 500, Rgba([0, 0, 0, 128]));
        overlay_logo(&mut base, &logo);

        let px = base.get_pixel(100, 700);
        // Half-transparent black over white lands mid-gray.
        assert!(px[0] > 80 && px[0] < 180, "blended value {}", px[0]);
    }

    #[test]
    fn overlay_logo_clips_oversized_logo() {
        let mut base = solid(10, 4, BLUE);
        let logo = solid(8, 64, RED);
        // Scaled logo is taller than the base; must not panic.
        overlay_logo(&mut base, &logo);
    }

    #[test]
    fn parse_hex_color_accepts_picker_output() {
        assert_eq!(parse_hex_color("#FFFFFF"), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_hex_color("#00ff7f"), Some(Rgba([0, 255, 127, 255])));
        assert_eq!(parse_hex_color("ff0000"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_hex_color("  #102030 "), Some(Rgba([16, 32, 48, 255])));
    }

    #[test]
    fn parse_hex_color_rejects_malformed_input() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
        assert_eq!(parse_hex_color("#FFFFFFFF"), None);
        assert_eq!(parse_hex_color("white"), None);
    }
}
