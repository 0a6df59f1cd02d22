//! # Lesson Images
//!
//! Keeps the image files of a lesson in sync with the image references in
//! its Markdown document, and renames both to the
//! `<lesson-name><NN>.<ext>` convention, numbered in document order.
//!
//! # Architecture: Reconcile, Then Rename
//!
//! Every run recomputes everything from the current document and image
//! directory; there is no state between runs beyond the files themselves:
//!
//! ```text
//! 1. List      img/        →  on-disk name set
//! 2. Extract   lesson.md   →  ordered references (filename, line, span)
//! 3. Reconcile sets        →  missing (fatal) / unused (advisory)
//! 4. Plan      references  →  validated rename steps
//! 5. Apply     plan        →  renamed files + rewritten document
//! ```
//!
//! Steps 1–4 are pure with respect to the lesson: they read but never write.
//! All mutation is concentrated in step 5, which validates the complete plan
//! before its first side effect, so a bad input aborts with nothing changed.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Immutable run configuration; lesson-name derivation |
//! | [`listing`] | Image directory enumeration with the extension allow-list |
//! | [`extract`] | Inclusion-pattern detection and ordered reference extraction |
//! | [`reconcile`] | Reference set vs. disk set, full discrepancy report |
//! | [`naming`] | `<lesson-name><NN>.<ext>` convention checking |
//! | [`rename`] | Two-phase rename: plan (validate) then apply (mutate) |
//! | [`output`] | Pure `format_*` report builders + severity-coded printing |
//!
//! # Design Decisions
//!
//! ## Structured Outcomes, Prompts at the Edge
//!
//! The reconciler returns data (a missing list and an unused list) and
//! never talks to the operator. The CLI decides whether an advisory becomes
//! an interactive `Continue? [Y/n]` prompt (`rename`), a plain warning
//! (`check`), or is waved through (`--yes`). This keeps every component
//! usable from tests and scripts.
//!
//! ## Span-Exact Substitution
//!
//! Renaming rewrites the document by splicing the byte range the pattern
//! originally captured, never by searching the line for the old name. A
//! filename that also appears in a caption on the same line stays untouched.
//!
//! ## Staged Renames
//!
//! File renames go through temporary names and commit in a second pass.
//! A lesson whose images are referenced in swapped order would otherwise
//! have its first rename overwrite the second one's source.

pub mod config;
pub mod extract;
pub mod listing;
pub mod naming;
pub mod output;
pub mod reconcile;
pub mod rename;

#[cfg(test)]
pub(crate) mod test_helpers;
