//! The image session: original image, active watermark, and display frame.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use log::debug;

use crate::compose;
use crate::error::{Error, Result};
use crate::font;
use crate::surface::{PresentationSurface, SessionEvent};
use crate::text;

/// Default font color for text watermarks (opaque white).
pub const DEFAULT_FONT_COLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The single active watermark overlay.
///
/// At most one watermark is active at a time; applying a new one replaces
/// the previous one. Watermarks never stack.
#[derive(Debug, Clone)]
pub enum WatermarkSpec {
    /// A line of text rendered near the bottom-left corner.
    Text {
        /// The watermark text.
        text: String,
        /// Fill color; the 1px outline is always black.
        color: Rgba<u8>,
    },
    /// A logo bitmap composited at the bottom-left corner.
    Logo {
        /// The logo at its native resolution.
        image: RgbaImage,
    },
}

/// Logical session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No image loaded.
    Empty,
    /// An image is loaded, no watermark applied.
    Loaded,
    /// An image is loaded with an active watermark.
    Watermarked,
}

/// Outcome of a watermark application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The watermark was composited and the display frame refreshed.
    Applied,
    /// Nothing to do: no image loaded, or blank watermark text.
    Skipped,
}

/// Outcome of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The image was written to disk.
    Saved,
    /// Nothing to save: no image loaded. No file is written.
    NothingToSave,
}

/// Resolution at which [`ImageSession::export`] writes the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportResolution {
    /// Re-composite the watermark against the full-resolution original.
    Full,
    /// Write the display-fitted working image as-is. This caps the output at
    /// the last-displayed resolution, matching the legacy behavior.
    Display,
}

/// An editing session over one image.
///
/// Owns the unmodified original, the active [`WatermarkSpec`], and a
/// display-fitted working copy. Every watermark operation recomposites from
/// the original, so edits never accumulate resampling or overlay artifacts.
/// A failed operation leaves all session state untouched.
pub struct ImageSession {
    original: Option<RgbaImage>,
    working: Option<RgbaImage>,
    spec: Option<WatermarkSpec>,
    font_color: Rgba<u8>,
    font_path: Option<PathBuf>,
    font: Option<FontVec>,
    viewport: (u32, u32),
}

impl Default for ImageSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSession {
    /// Create an empty session with the default 700x500 display bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            original: None,
            working: None,
            spec: None,
            font_color: DEFAULT_FONT_COLOR,
            font_path: None,
            font: None,
            viewport: (compose::DISPLAY_MAX_W, compose::DISPLAY_MAX_H),
        }
    }

    /// Use a specific font file for text watermarks instead of probing the
    /// system font directories.
    pub fn set_font_path(&mut self, path: &Path) {
        self.font_path = Some(path.to_path_buf());
        self.font = None;
    }

    /// Current logical state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        if self.original.is_none() {
            SessionState::Empty
        } else if self.spec.is_some() {
            SessionState::Watermarked
        } else {
            SessionState::Loaded
        }
    }

    /// The display-fitted working image, if an image is loaded.
    #[must_use]
    pub fn working_image(&self) -> Option<&RgbaImage> {
        self.working.as_ref()
    }

    /// Pixel dimensions of the loaded original.
    #[must_use]
    pub fn original_size(&self) -> Option<(u32, u32)> {
        self.original.as_ref().map(RgbaImage::dimensions)
    }

    /// Current text fill color.
    #[must_use]
    pub fn font_color(&self) -> Rgba<u8> {
        self.font_color
    }

    /// Set the text fill color for subsequent text watermarks.
    pub fn set_font_color(&mut self, color: Rgba<u8>) {
        self.font_color = color;
    }

    /// Open an image file as the new original.
    ///
    /// Decodes the file, converts it to RGBA, and derives a display-fitted
    /// working copy. Any active watermark is discarded. On failure the
    /// previous original, watermark, and working image are all unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`] for undecodable files and [`Error::Io`] for
    /// unreadable paths.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let original = image::open(path)?.to_rgba8();
        debug!(
            "loaded {}x{} from {}",
            original.width(),
            original.height(),
            path.display()
        );

        self.working = Some(compose::fit_within(&original, self.viewport.0, self.viewport.1));
        self.original = Some(original);
        self.spec = None;
        Ok(())
    }

    /// Apply a text watermark using the current font color.
    ///
    /// Composites onto a fresh copy of the original (replacing any previous
    /// watermark) and re-fits the result to the display bound. Returns
    /// [`ApplyOutcome::Skipped`] when no image is loaded or the text is
    /// blank.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FontLoad`] or [`Error::NoFont`] when the font asset
    /// cannot be resolved; session state is unchanged.
    pub fn apply_text_watermark(&mut self, watermark_text: &str) -> Result<ApplyOutcome> {
        if watermark_text.trim().is_empty() || self.original.is_none() {
            return Ok(ApplyOutcome::Skipped);
        }
        self.ensure_font()?;

        self.install_spec(WatermarkSpec::Text {
            text: watermark_text.to_string(),
            color: self.font_color,
        });
        debug!("text watermark applied: {watermark_text:?}");
        Ok(ApplyOutcome::Applied)
    }

    /// Apply a logo watermark loaded from `logo_path`.
    ///
    /// The logo is scaled to one fifth of the original's width and alpha
    /// composited at the bottom-left corner of a fresh copy of the original.
    /// Returns [`ApplyOutcome::Skipped`] when no image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Image`]/[`Error::Io`] when the logo cannot be read
    /// or decoded; session state is unchanged.
    pub fn apply_logo_watermark(&mut self, logo_path: &Path) -> Result<ApplyOutcome> {
        if self.original.is_none() {
            return Ok(ApplyOutcome::Skipped);
        }
        let logo = image::open(logo_path)?.to_rgba8();

        self.install_spec(WatermarkSpec::Logo { image: logo });
        debug!("logo watermark applied from {}", logo_path.display());
        Ok(ApplyOutcome::Applied)
    }

    /// Write the current image to `path`.
    ///
    /// The output format is inferred from the extension; a path without one
    /// is written as PNG. [`ExportResolution::Full`] recomposites the active
    /// watermark against the full-resolution original;
    /// [`ExportResolution::Display`] writes the working image as-is.
    ///
    /// Returns [`ExportOutcome::NothingToSave`] (writing no file) when no
    /// image is loaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for extensions the encoder does
    /// not handle and [`Error::Io`]/[`Error::Image`] for write failures.
    pub fn export(&self, path: &Path, resolution: ExportResolution) -> Result<ExportOutcome> {
        let frame = match resolution {
            ExportResolution::Display => match &self.working {
                Some(working) => working.clone(),
                None => return Ok(ExportOutcome::NothingToSave),
            },
            ExportResolution::Full => match self.composite_full() {
                Some(full) => full,
                None => return Ok(ExportOutcome::NothingToSave),
            },
        };

        save_image(&frame, path)?;
        debug!(
            "exported {}x{} to {}",
            frame.width(),
            frame.height(),
            path.display()
        );
        Ok(ExportOutcome::Saved)
    }

    /// React to a viewport size change.
    ///
    /// Re-derives the display frame from the original plus the active
    /// watermark, fitted to the new viewport. Deriving from the original
    /// rather than the previous frame keeps repeated resizes from
    /// compounding resampling loss. Returns the new frame, or `None` when no
    /// image is loaded.
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) -> Option<&RgbaImage> {
        self.viewport = (width.max(1), height.max(1));
        let full = self.composite_full()?;
        self.working = Some(compose::fit_within(&full, self.viewport.0, self.viewport.1));
        self.working.as_ref()
    }

    /// React to a color selection.
    ///
    /// Stores the color and, when a text watermark is active, re-applies it
    /// from the original with the new color. The previous watermark is fully
    /// replaced, never tinted in place.
    ///
    /// # Errors
    ///
    /// Propagates font resolution errors from the re-application.
    pub fn on_color_chosen(&mut self, color: Rgba<u8>) -> Result<ApplyOutcome> {
        self.font_color = color;
        let active_text = match &self.spec {
            Some(WatermarkSpec::Text { text, .. }) => Some(text.clone()),
            _ => None,
        };
        match active_text {
            Some(text_content) => self.apply_text_watermark(&text_content),
            None => Ok(ApplyOutcome::Skipped),
        }
    }

    /// Dispatch a [`SessionEvent`] and push the refreshed frame to `surface`.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying operation; the surface is not
    /// rendered to when the operation fails.
    pub fn handle_event(
        &mut self,
        event: SessionEvent,
        surface: &mut dyn PresentationSurface,
    ) -> Result<()> {
        match event {
            SessionEvent::ColorChosen(color) => {
                self.on_color_chosen(color)?;
            }
            SessionEvent::ViewportResized(width, height) => {
                self.on_viewport_resize(width, height);
            }
        }
        if let Some(frame) = &self.working {
            surface.render(frame);
        }
        Ok(())
    }

    /// Composite the active watermark onto a full-resolution copy of the
    /// original. `None` when no image is loaded.
    fn composite_full(&self) -> Option<RgbaImage> {
        let original = self.original.as_ref()?;
        let mut full = original.clone();
        if let Some(spec) = &self.spec {
            apply_spec(&mut full, spec, self.font.as_ref());
        }
        Some(full)
    }

    /// Make `spec` the active watermark and refresh the working image.
    fn install_spec(&mut self, spec: WatermarkSpec) {
        self.spec = Some(spec);
        if let Some(full) = self.composite_full() {
            self.working = Some(compose::fit_within(&full, self.viewport.0, self.viewport.1));
        }
    }

    /// Resolve and cache the font asset.
    fn ensure_font(&mut self) -> Result<()> {
        if self.font.is_some() {
            return Ok(());
        }
        let path = match &self.font_path {
            Some(configured) => configured.clone(),
            None => font::find_system_font().ok_or(Error::NoFont)?,
        };
        self.font = Some(font::load_font(&path)?);
        debug!("font loaded from {}", path.display());
        Ok(())
    }
}

/// Composite one watermark onto a full-resolution base.
fn apply_spec(base: &mut RgbaImage, spec: &WatermarkSpec, loaded_font: Option<&FontVec>) {
    match spec {
        WatermarkSpec::Text { text: content, color } => {
            // A text spec is only installed after the font resolved.
            if let Some(face) = loaded_font {
                text::draw_text_watermark(base, face, content, *color);
            }
        }
        WatermarkSpec::Logo { image: logo } => compose::overlay_logo(base, logo),
    }
}

/// Save an RGBA image, inferring the format from the path extension.
///
/// A path without an extension is written as PNG. JPEG output is flattened
/// to RGB before encoding at maximum quality.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unrecognized or unsupported
/// extensions, and I/O or encode errors from the underlying writer.
pub fn save_image(img: &RgbaImage, path: &Path) -> Result<()> {
    let format = match path.extension() {
        None => ImageFormat::Png,
        Some(_) => {
            ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?
        }
    };

    match format {
        ImageFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(&DynamicImage::ImageRgb8(rgb))?;
        }
        ImageFormat::Png | ImageFormat::WebP | ImageFormat::Bmp | ImageFormat::Tiff => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.jpg"`. Inputs without
/// an extension get `.png`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let ext = input
        .extension()
        .map_or_else(|| "png".to_string(), |e| e.to_string_lossy().into_owned());
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.{ext}"))
}
