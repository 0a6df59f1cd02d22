//! Renaming images and rewriting their references.
//!
//! The renamer runs as a two-phase commit:
//!
//! 1. **Plan**: compute the target name for every reference (`lesson-name`
//!    + two-digit document-order index + original extension) and validate
//!    the whole set: every source file must exist, and no target may be
//!    occupied by a file that isn't scheduled to move away. Planning touches
//!    nothing.
//! 2. **Apply**: back up the document and each affected image, stage every
//!    file rename through a temporary name, commit the renames, then write
//!    the rewritten document once.
//!
//! Staging through temporary names makes order irrelevant: a lesson whose
//! images are listed in swapped order (`lesson02.png` referenced first)
//! renames cleanly instead of one rename clobbering the other's source.
//!
//! Document lines are spliced at the byte span captured during extraction,
//! so only the filename inside the matched tag changes; the rest of the
//! line, and every other line, stays byte-identical.

use crate::config::RunConfig;
use crate::extract::Reference;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not rename {filename}: no such file in the image directory")]
    SourceNotFound { filename: String },
    #[error("target name {target} is already taken by an unreferenced file")]
    TargetOccupied { target: String },
    #[error("{count} references exceed the 999-image naming convention")]
    TooManyReferences { count: usize },
    #[error("reference to {filename} points at line {line}, but the document is shorter")]
    LineOutOfRange { filename: String, line: usize },
    #[error("line {line} no longer contains {filename} where expected; re-run the check")]
    SpanMismatch { filename: String, line: usize },
    #[error("could not back up {path}")]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One reference's rename: old name, target name, and where to rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameStep {
    pub old_name: String,
    pub new_name: String,
    /// 1-indexed line in the document.
    pub line: usize,
    /// Byte range of `old_name` within that line.
    pub span: std::ops::Range<usize>,
}

impl RenameStep {
    /// A step whose file is already correctly named.
    pub fn is_noop(&self) -> bool {
        self.old_name == self.new_name
    }
}

/// Validated set of rename steps, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub steps: Vec<RenameStep>,
}

impl RenamePlan {
    /// Steps that actually change a name.
    pub fn changes(&self) -> impl Iterator<Item = &RenameStep> {
        self.steps.iter().filter(|s| !s.is_noop())
    }

    /// True when every file is already correctly named.
    pub fn is_noop(&self) -> bool {
        self.changes().next().is_none()
    }
}

/// Compute and validate the rename plan. Touches neither the document nor
/// the filesystem.
pub fn plan(config: &RunConfig, references: &[Reference]) -> Result<RenamePlan, RenameError> {
    if references.len() > 999 {
        return Err(RenameError::TooManyReferences {
            count: references.len(),
        });
    }

    let mut steps = Vec::with_capacity(references.len());
    for (i, reference) in references.iter().enumerate() {
        let new_name = target_name(&config.lesson_name, i, &reference.filename);
        steps.push(RenameStep {
            old_name: reference.filename.clone(),
            new_name,
            line: reference.line,
            span: reference.span.clone(),
        });
    }

    // Sources that will vacate their current name during apply
    let vacating: BTreeSet<&str> = steps
        .iter()
        .filter(|s| !s.is_noop())
        .map(|s| s.old_name.as_str())
        .collect();

    for step in steps.iter().filter(|s| !s.is_noop()) {
        if !config.image_dir.join(&step.old_name).is_file() {
            return Err(RenameError::SourceNotFound {
                filename: step.old_name.clone(),
            });
        }
        let target = config.image_dir.join(&step.new_name);
        if target.exists() && !vacating.contains(step.new_name.as_str()) {
            return Err(RenameError::TargetOccupied {
                target: step.new_name.clone(),
            });
        }
    }

    Ok(RenamePlan { steps })
}

/// Target name for the reference at 0-based position `i`: lesson name plus
/// 1-based index, zero-padded to two digits, keeping the old extension.
fn target_name(lesson_name: &str, i: usize, old_name: &str) -> String {
    match old_name.rsplit_once('.') {
        Some((_, ext)) => format!("{lesson_name}{:02}.{ext}", i + 1),
        None => format!("{lesson_name}{:02}", i + 1),
    }
}

/// Execute a validated plan: rewrite the document and rename the files.
///
/// All document edits are computed and validated in memory before the first
/// side effect, so a stale plan (document changed since extraction) aborts
/// without mutating anything. A failed backup also aborts: the run never
/// proceeds past a failed side effect.
///
/// An all-no-op plan returns immediately: no backups, no writes.
pub fn apply(config: &RunConfig, plan: &RenamePlan) -> Result<(), RenameError> {
    if plan.is_noop() {
        return Ok(());
    }

    let text = fs::read_to_string(&config.document)?;
    let mut lines: Vec<String> = text.split_inclusive('\n').map(str::to_string).collect();

    // Validate every splice before touching anything
    for step in plan.changes() {
        let line = lines
            .get(step.line - 1)
            .ok_or_else(|| RenameError::LineOutOfRange {
                filename: step.old_name.clone(),
                line: step.line,
            })?;
        if line.get(step.span.clone()) != Some(step.old_name.as_str()) {
            return Err(RenameError::SpanMismatch {
                filename: step.old_name.clone(),
                line: step.line,
            });
        }
    }

    for step in plan.changes() {
        lines[step.line - 1].replace_range(step.span.clone(), &step.new_name);
    }

    if config.backup {
        backup(&config.document)?;
        for step in plan.changes() {
            backup(&config.image_dir.join(&step.old_name))?;
        }
    }

    // Stage through temporary names, then commit. Two passes so that a
    // target occupied by a later step's source is never clobbered.
    for step in plan.changes() {
        fs::rename(
            config.image_dir.join(&step.old_name),
            config.image_dir.join(staging_name(&step.new_name)),
        )?;
    }
    for step in plan.changes() {
        fs::rename(
            config.image_dir.join(staging_name(&step.new_name)),
            config.image_dir.join(&step.new_name),
        )?;
    }

    fs::write(&config.document, lines.concat())?;
    Ok(())
}

fn staging_name(new_name: &str) -> String {
    format!("{new_name}.renaming")
}

/// Copy `path` to a `.bak` sibling. Failure aborts the run.
fn backup(path: &Path) -> Result<(), RenameError> {
    let mut bak = path.as_os_str().to_owned();
    bak.push(".bak");
    fs::copy(path, PathBuf::from(bak)).map_err(|source| RenameError::Backup {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_references;
    use crate::test_helpers::{img_names, lesson};
    use std::fs;

    fn figure_line(name: &str) -> String {
        format!("{{% include figure.html filename=\"{name}\" caption=\"x\" %}}")
    }

    fn plan_for(fixture: &crate::test_helpers::LessonFixture) -> RenamePlan {
        let text = fs::read_to_string(&fixture.config.document).unwrap();
        let refs = extract_references(&text, "doc").unwrap();
        plan(&fixture.config, &refs).unwrap()
    }

    #[test]
    fn plan_assigns_positional_names() {
        let body = format!(
            "# Demo\n\n{}\n\nprose\n\n{}\n",
            figure_line("a.png"),
            figure_line("b.jpg")
        );
        let f = lesson("demo-lesson.md", &body, &["a.png", "b.jpg"]);
        let p = plan_for(&f);

        assert_eq!(p.steps[0].new_name, "demo-lesson01.png");
        assert_eq!(p.steps[1].new_name, "demo-lesson02.jpg");
    }

    #[test]
    fn plan_is_noop_for_compliant_lesson() {
        let body = format!(
            "{}\n{}\n",
            figure_line("demo01.png"),
            figure_line("demo02.jpg")
        );
        let f = lesson("demo.md", &body, &["demo01.png", "demo02.jpg"]);
        let p = plan_for(&f);
        assert!(p.is_noop());
    }

    #[test]
    fn plan_missing_source_is_error() {
        let body = format!("{}\n", figure_line("a.png"));
        let f = lesson("demo.md", &body, &["other.png"]);
        let text = fs::read_to_string(&f.config.document).unwrap();
        let refs = extract_references(&text, "doc").unwrap();
        let result = plan(&f.config, &refs);
        assert!(matches!(result, Err(RenameError::SourceNotFound { .. })));
    }

    #[test]
    fn plan_occupied_target_is_error() {
        // demo01.png exists on disk but is not referenced, so it never
        // vacates; a.png would land on top of it
        let body = format!("{}\n", figure_line("a.png"));
        let f = lesson("demo.md", &body, &["a.png", "demo01.png"]);
        let text = fs::read_to_string(&f.config.document).unwrap();
        let refs = extract_references(&text, "doc").unwrap();
        let result = plan(&f.config, &refs);
        assert!(
            matches!(result, Err(RenameError::TargetOccupied { target }) if target == "demo01.png")
        );
    }

    #[test]
    fn apply_renames_files_and_rewrites_document() {
        let body = format!(
            "# Demo\n\n{}\n\nprose stays put\n\n{}\n",
            figure_line("a.png"),
            figure_line("b.jpg")
        );
        let f = lesson("demo-lesson.md", &body, &["a.png", "b.jpg"]);
        let p = plan_for(&f);
        apply(&f.config, &p).unwrap();

        assert!(f.config.image_dir.join("demo-lesson01.png").is_file());
        assert!(f.config.image_dir.join("demo-lesson02.jpg").is_file());
        assert!(!f.config.image_dir.join("a.png").exists());
        assert!(!f.config.image_dir.join("b.jpg").exists());

        let text = fs::read_to_string(&f.config.document).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Demo");
        assert_eq!(lines[2], figure_line("demo-lesson01.png"));
        assert_eq!(lines[4], "prose stays put");
        assert_eq!(lines[6], figure_line("demo-lesson02.jpg"));
    }

    #[test]
    fn apply_only_touches_the_matched_span() {
        // The caption mentions the old filename; only the attribute changes
        let body = "{% include figure.html filename=\"a.png\" caption=\"see a.png\" %}\n";
        let f = lesson("demo.md", body, &["a.png"]);
        let p = plan_for(&f);
        apply(&f.config, &p).unwrap();

        let text = fs::read_to_string(&f.config.document).unwrap();
        assert_eq!(
            text,
            "{% include figure.html filename=\"demo01.png\" caption=\"see a.png\" %}\n"
        );
    }

    #[test]
    fn apply_handles_swapped_names() {
        // demo02.png is referenced first: naive sequential renaming would
        // clobber demo01.png before it moves
        let body = format!(
            "{}\n{}\n",
            figure_line("demo02.png"),
            figure_line("demo01.png")
        );
        let f = lesson("demo.md", &body, &["demo01.png", "demo02.png"]);
        let p = plan_for(&f);
        apply(&f.config, &p).unwrap();

        let text = fs::read_to_string(&f.config.document).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], figure_line("demo01.png"));
        assert_eq!(lines[1], figure_line("demo02.png"));
        assert!(f.config.image_dir.join("demo01.png").is_file());
        assert!(f.config.image_dir.join("demo02.png").is_file());
    }

    #[test]
    fn apply_is_idempotent() {
        let body = format!("{}\n", figure_line("a.png"));
        let f = lesson("demo.md", &body, &["a.png"]);
        apply(&f.config, &plan_for(&f)).unwrap();

        let text_after_first = fs::read_to_string(&f.config.document).unwrap();
        let second = plan_for(&f);
        assert!(second.is_noop());
        apply(&f.config, &second).unwrap();

        assert_eq!(
            fs::read_to_string(&f.config.document).unwrap(),
            text_after_first
        );
        // The early return means no second round of .bak files
        assert!(!f.config.image_dir.join("demo01.png.bak").exists());
    }

    #[test]
    fn apply_writes_backups_by_default() {
        let body = format!("{}\n", figure_line("a.png"));
        let f = lesson("demo.md", &body, &["a.png"]);
        apply(&f.config, &plan_for(&f)).unwrap();

        assert!(f.tmp.path().join("demo.md.bak").is_file());
        assert_eq!(img_names(&f), vec!["a.png.bak", "demo01.png"]);
        assert_eq!(
            fs::read_to_string(f.tmp.path().join("demo.md.bak")).unwrap(),
            body
        );
    }

    #[test]
    fn apply_skips_backups_when_disabled() {
        let body = format!("{}\n", figure_line("a.png"));
        let mut f = lesson("demo.md", &body, &["a.png"]);
        f.config.backup = false;
        apply(&f.config, &plan_for(&f)).unwrap();

        assert!(!f.tmp.path().join("demo.md.bak").exists());
        assert!(!f.config.image_dir.join("a.png.bak").exists());
    }

    #[test]
    fn stale_plan_aborts_before_any_mutation() {
        let body = format!("{}\n", figure_line("a.png"));
        let f = lesson("demo.md", &body, &["a.png"]);
        let p = plan_for(&f);

        // Document edited between plan and apply
        let edited = format!("new first line\n{}\n", figure_line("a.png"));
        fs::write(&f.config.document, &edited).unwrap();

        let result = apply(&f.config, &p);
        assert!(matches!(result, Err(RenameError::SpanMismatch { .. })));
        assert_eq!(fs::read_to_string(&f.config.document).unwrap(), edited);
        assert!(f.config.image_dir.join("a.png").is_file());
        assert!(!f.tmp.path().join("demo.md.bak").exists());
    }

    #[test]
    fn truncated_document_aborts_with_line_error() {
        let body = format!("line one\n{}\n", figure_line("a.png"));
        let f = lesson("demo.md", &body, &["a.png"]);
        let p = plan_for(&f);

        fs::write(&f.config.document, "only one line\n").unwrap();
        let result = apply(&f.config, &p);
        assert!(matches!(result, Err(RenameError::LineOutOfRange { .. })));
    }

    #[test]
    fn extension_is_preserved_verbatim() {
        let body = format!("{}\n", figure_line("photo.jpeg"));
        let f = lesson("demo.md", &body, &["photo.jpeg"]);
        let p = plan_for(&f);
        assert_eq!(p.steps[0].new_name, "demo01.jpeg");
    }

    #[test]
    fn hundredth_image_gets_three_digits() {
        assert_eq!(target_name("demo", 99, "x.png"), "demo100.png");
        assert_eq!(target_name("demo", 8, "x.png"), "demo09.png");
    }
}
