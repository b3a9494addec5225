//! Font asset resolution for text watermarks.
//!
//! The session renders text with a single fixed font face: an explicitly
//! configured file when one is given, otherwise the first usable face found
//! in the conventional system font directories.

use std::path::{Path, PathBuf};

use ab_glyph::FontVec;

use crate::error::{Error, Result};

/// Read and parse a TTF/OTF font file.
///
/// # Errors
///
/// Returns [`Error::FontLoad`] when the file is missing, unreadable, or not
/// a parsable font.
pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = std::fs::read(path).map_err(|e| Error::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    FontVec::try_from_vec(data).map_err(|e| Error::FontLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Locate a usable system font face, if any.
///
/// Walks the conventional font directories and returns the first `.ttf` or
/// `.otf` file that actually parses. Directory entries are visited in name
/// order so repeated calls resolve the same face.
#[must_use]
pub fn find_system_font() -> Option<PathBuf> {
    let mut stack: Vec<PathBuf> = Vec::new();
    for root in font_roots() {
        if root.is_dir() {
            stack.push(root);
        }
    }

    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        let mut paths: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
        paths.sort();

        for path in paths {
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            let parses = match path.extension().and_then(|e| e.to_str()) {
                Some(ext) if ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf") => {
                    load_font(&path).is_ok()
                }
                _ => false,
            };
            if parses {
                return Some(path);
            }
        }
    }

    None
}

fn font_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/System/Library/Fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("C:\\Windows\\Fonts"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        roots.push(home.join(".fonts"));
        roots.push(home.join(".local/share/fonts"));
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_font_missing_file_is_font_load_error() {
        let err = load_font(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(matches!(err, Error::FontLoad { .. }));
        assert!(err.to_string().contains("here.ttf"));
    }

    #[test]
    fn load_font_rejects_non_font_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.ttf");
        std::fs::write(&path, b"this is not a font").unwrap();

        let err = load_font(&path).unwrap_err();
        assert!(matches!(err, Error::FontLoad { .. }));
    }
}
