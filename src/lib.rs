//! Overlay text or logo watermarks on images, non-destructively.
//!
//! An [`ImageSession`] owns an unmodified original image plus at most one
//! active watermark, and derives a display-fitted working copy from them.
//! Watermarks are always composited against the full-resolution original and
//! then scaled for display, so re-applying with different settings never
//! stacks or ghosts.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use watermark_studio::{ExportResolution, ImageSession};
//!
//! let mut session = ImageSession::new();
//! session.load(Path::new("photo.jpg")).expect("failed to load image");
//! session.apply_text_watermark("© example").expect("failed to watermark");
//! session
//!     .export(Path::new("photo_watermarked.png"), ExportResolution::Full)
//!     .expect("failed to export");
//! ```
//!
//! # Display fitting
//!
//! The working image is fitted to a viewport bound (700x500 by default) with
//! aspect-preserving Lanczos downscaling; it is never scaled up. Viewport
//! resizes re-derive the frame from the original plus the active watermark,
//! so repeated resizing does not accumulate resampling loss.

#![deny(missing_docs)]

pub mod compose;
pub mod error;
mod font;
mod session;
mod surface;
pub mod text;

pub use error::{Error, Result};
pub use font::{find_system_font, load_font};
pub use session::{
    default_output_path, save_image, ApplyOutcome, ExportOutcome, ExportResolution, ImageSession,
    SessionState, WatermarkSpec, DEFAULT_FONT_COLOR,
};
pub use surface::{PresentationSurface, SessionEvent};
