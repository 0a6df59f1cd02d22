//! Image directory enumeration.
//!
//! Lists the image directory and keeps the entries whose extension is in the
//! accepted set. Extension matching is case-sensitive on purpose: the
//! editorial pipeline stores lowercase extensions, and a `.PNG` slipping in
//! should surface as a discrepancy during reconciliation, not be silently
//! accepted here.

use crate::config::IMAGE_EXTENSIONS;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("empty images dir {0}. Aborting.")]
    EmptyDirectory(PathBuf),
}

/// List the image files in `dir`, sorted by name.
///
/// A directory with no entries at all is fatal: it almost always means a
/// misconfigured path rather than a genuinely imageless lesson. Entries with
/// an unaccepted extension are merely ignored.
pub fn list_images(dir: &Path) -> Result<BTreeSet<String>, ListingError> {
    let mut names = BTreeSet::new();
    let mut any_entries = false;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        any_entries = true;
        let name = entry.file_name().to_string_lossy().to_string();
        if has_image_extension(&name) {
            names.insert(name);
        }
    }

    if !any_entries {
        return Err(ListingError::EmptyDirectory(dir.to_path_buf()));
    }
    Ok(names)
}

/// True when the substring after the last dot is an accepted image
/// extension (case-sensitive).
pub fn has_image_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}
