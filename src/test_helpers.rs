//! Shared test utilities for the lesson-images test suite.
//!
//! Builds throwaway lessons (a Markdown document plus an `img/` directory)
//! inside a `TempDir`, with a ready-made [`RunConfig`] pointing at them.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::lesson;
//!
//! let f = lesson(
//!     "demo.md",
//!     "{% include figure.html filename=\"a.png\" %}\n",
//!     &["a.png"],
//! );
//! // f.config.document and f.config.image_dir live inside f.tmp
//! ```

use crate::config::RunConfig;
use std::fs;
use tempfile::TempDir;

/// A temporary lesson: document, image directory, and config.
///
/// Dropping the fixture removes everything.
pub struct LessonFixture {
    pub tmp: TempDir,
    pub config: RunConfig,
}

/// Create a lesson with the given document body and image files.
///
/// Image files get placeholder content; nothing in this crate reads image
/// bytes. Backups are enabled; flip `config.backup` off per test as needed.
pub fn lesson(doc_name: &str, body: &str, files: &[&str]) -> LessonFixture {
    let tmp = TempDir::new().unwrap();
    let doc = tmp.path().join(doc_name);
    fs::write(&doc, body).unwrap();

    let img_dir = tmp.path().join("img");
    fs::create_dir(&img_dir).unwrap();
    for name in files {
        fs::write(img_dir.join(name), "fake image").unwrap();
    }

    let config = RunConfig::new(doc, img_dir, true).unwrap();
    LessonFixture { tmp, config }
}

/// All image-directory entry names, sorted.
pub fn img_names(fixture: &LessonFixture) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(&fixture.config.image_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
