//! Error types for the watermark-studio crate.

use std::path::PathBuf;

/// Errors that can occur while loading, compositing, or exporting images.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error occurred during image processing (decode, encode, save).
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// The font asset could not be read or parsed.
    #[error("failed to load font {}: {reason}", .path.display())]
    FontLoad {
        /// Path of the font file that failed to load.
        path: PathBuf,
        /// Why the font could not be used.
        reason: String,
    },

    /// No font asset was configured and no system font could be located.
    #[error("no font asset available for text watermarking")]
    NoFont,

    /// The export path has an extension the encoder cannot handle.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let unsupported = Error::UnsupportedFormat("xyz".to_string());
        assert!(unsupported.to_string().contains("xyz"));

        let font = Error::FontLoad {
            path: PathBuf::from("/tmp/missing.ttf"),
            reason: "not found".to_string(),
        };
        let msg = font.to_string();
        assert!(msg.contains("missing.ttf"));
        assert!(msg.contains("not found"));

        assert!(Error::NoFont.to_string().contains("font"));
    }
}
