//! Presentation surface seam.
//!
//! The session never talks to a concrete GUI. It pushes frames through
//! [`PresentationSurface`] and reacts to [`SessionEvent`]s emitted by the
//! surrounding application, keeping the compositing core free of any
//! toolkit dependency.

use image::{Rgba, RgbaImage};

/// A viewport that can display one bitmap at a time.
///
/// Implementations are expected to clear prior content and center the frame
/// within the current viewport bounds.
pub trait PresentationSurface {
    /// Display `frame`, replacing whatever was shown before.
    fn render(&mut self, frame: &RgbaImage);
}

/// Events the surrounding application feeds into the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// The user picked a new font color.
    ColorChosen(Rgba<u8>),
    /// The viewport was resized to the given pixel dimensions.
    ViewportResized(u32, u32),
}
