//! Reconciliation between document references and on-disk files.
//!
//! Computes the symmetric difference between the two name sets and reports
//! both directions at once, so the operator gets the complete discrepancy
//! list in a single run instead of fixing mismatches one at a time.
//!
//! This module only produces data. Whether an advisory blocks the run
//! (interactive prompt, `--yes`, check mode) is the CLI layer's call.

use crate::extract::Reference;
use std::collections::BTreeSet;

/// Result of comparing the reference set against the disk set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Referenced in the document, absent from the image directory. Fatal.
    pub missing: Vec<String>,
    /// Present in the image directory, referenced nowhere. Advisory.
    pub unused: Vec<String>,
}

/// What the caller should do about a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both sets match exactly.
    Clean,
    /// Unused files on disk; proceed only with operator confirmation.
    NeedsConfirmation,
    /// Missing files; the run must abort.
    Fatal,
}

impl Reconciliation {
    pub fn outcome(&self) -> Outcome {
        if !self.missing.is_empty() {
            Outcome::Fatal
        } else if !self.unused.is_empty() {
            Outcome::NeedsConfirmation
        } else {
            Outcome::Clean
        }
    }

    pub fn is_clean(&self) -> bool {
        self.outcome() == Outcome::Clean
    }
}

/// Compare references against the disk listing.
///
/// Both directions are fully evaluated, with no short-circuit on the first
/// mismatch, and both lists come out sorted for deterministic output.
pub fn reconcile(references: &[Reference], disk: &BTreeSet<String>) -> Reconciliation {
    let referenced: BTreeSet<&str> = references.iter().map(|r| r.filename.as_str()).collect();

    let missing = referenced
        .iter()
        .filter(|name| !disk.contains(**name))
        .map(|name| name.to_string())
        .collect();

    let unused = disk
        .iter()
        .filter(|name| !referenced.contains(name.as_str()))
        .cloned()
        .collect();

    Reconciliation { missing, unused }
}
