//! Run configuration.
//!
//! Everything the pipeline needs to know (document path, image directory,
//! extension allow-list, backup policy) is validated once at startup and
//! carried in an immutable [`RunConfig`]. Components take the config by
//! reference; none of them reads ambient state.
//!
//! ## Lesson Name
//!
//! The lesson name is the document's base filename with the extension
//! stripped. If the stem ends in a decimal digit, a `-` separator is
//! appended so the numeric suffix added during renaming stays unambiguous:
//! `lesson1.md` derives `lesson1-`, producing `lesson1-01.png` rather than
//! a `lesson101.png` that reads like lesson 10, image 1.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("input file ({0}) must have \".md\" extension")]
    NotMarkdown(PathBuf),
    #[error("input file not found: {0}")]
    DocumentNotFound(PathBuf),
    #[error("image directory not found: {0}")]
    ImageDirNotFound(PathBuf),
}

/// Image file extensions the tool recognizes, matched case-sensitively
/// against the substring after the last dot.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "avif"];

/// Validated, immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// The Markdown lesson document.
    pub document: PathBuf,
    /// Directory expected to hold exactly the images the document references.
    pub image_dir: PathBuf,
    /// Derived lesson name, digit-suffix separator already applied.
    pub lesson_name: String,
    /// Whether to write `.bak` copies before mutating anything.
    pub backup: bool,
}

impl RunConfig {
    /// Validate CLI inputs and build the config.
    ///
    /// The document must exist and carry a `.md` extension (case-insensitive,
    /// so legacy `.MD` lessons still work); the image directory must exist.
    pub fn new(document: PathBuf, image_dir: PathBuf, backup: bool) -> Result<Self, ConfigError> {
        let is_md = document
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false);
        if !is_md {
            return Err(ConfigError::NotMarkdown(document));
        }
        if !document.is_file() {
            return Err(ConfigError::DocumentNotFound(document));
        }
        if !image_dir.is_dir() {
            return Err(ConfigError::ImageDirNotFound(image_dir));
        }
        let lesson_name = lesson_name_from(&document);
        Ok(Self {
            document,
            image_dir,
            lesson_name,
            backup,
        })
    }
}

/// Derive the lesson name from the document path.
///
/// - `demo-lesson.md` → `demo-lesson`
/// - `lesson1.md` → `lesson1-` (trailing digit gets a separator)
pub fn lesson_name_from(document: &Path) -> String {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    if stem.ends_with(|c: char| c.is_ascii_digit()) {
        format!("{stem}-")
    } else {
        stem
    }
}
