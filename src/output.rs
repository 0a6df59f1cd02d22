//! CLI output formatting.
//!
//! Each report has a `format_*` function that returns plain lines, plus the
//! CLI prints them through severity-coded wrappers. Format functions are
//! pure (no I/O, no color) so tests can assert on exact wording.
//!
//! Severity palette (one color per taxonomy level):
//!
//! ```text
//! error    red      fatal, the run aborts
//! warning  yellow   advisory, the operator decides
//! info     blue     progress and plan output
//! ```

use crate::naming::NamingReport;
use crate::reconcile::Reconciliation;
use crate::rename::RenamePlan;
use colored::Colorize;
use std::collections::BTreeSet;

// ============================================================================
// Severity-coded printing
// ============================================================================

pub fn print_error(message: &str) {
    eprintln!("{}", message.red());
}

pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

pub fn print_info(message: &str) {
    println!("{}", message.blue());
}

// ============================================================================
// Reconciliation reports
// ============================================================================

/// One line per referenced-but-missing file. Fatal.
pub fn format_missing(reconciliation: &Reconciliation, document: &str) -> Vec<String> {
    reconciliation
        .missing
        .iter()
        .map(|name| {
            format!(
                "Error: Reference in {document} for {name} has no corresponding file \
                 in images directory."
            )
        })
        .collect()
}

/// One line per on-disk-but-unreferenced file. Advisory.
pub fn format_unused(
    reconciliation: &Reconciliation,
    document: &str,
    image_dir: &str,
) -> Vec<String> {
    reconciliation
        .unused
        .iter()
        .map(|name| {
            format!(
                "Warning: File {name} in {image_dir} is not referenced in {document}. \
                 It will be ignored but you should delete it if not needed."
            )
        })
        .collect()
}

// ============================================================================
// Naming-convention report
// ============================================================================

/// Per-file violations plus a singular/plural-aware count line.
///
/// ```text
/// Error: shot.png does not comply with pattern required (e.g. intro03.png)
/// 1 error found in file naming pattern.
/// ```
pub fn format_naming_report(report: &NamingReport, lesson_name: &str) -> Vec<String> {
    let example = NamingReport::example(lesson_name);
    let mut lines: Vec<String> = report
        .violations
        .iter()
        .map(|name| format!("Error: {name} does not comply with pattern required (e.g. {example})"))
        .collect();

    if !report.is_compliant() {
        let count = report.violations.len();
        let noun = if count > 1 { "errors" } else { "error" };
        lines.push(format!("{count} {noun} found in file naming pattern."));
    }
    lines
}

// ============================================================================
// Rename plan and listing
// ============================================================================

/// One `old => new` line per actual change; no-op steps are omitted.
pub fn format_plan(plan: &RenamePlan) -> Vec<String> {
    plan.changes()
        .map(|step| format!("{} => {}", step.old_name, step.new_name))
        .collect()
}

/// The `list` subcommand output: both name sets, sorted.
pub fn format_listing(referenced: &BTreeSet<String>, on_disk: &BTreeSet<String>) -> Vec<String> {
    let mut lines = vec![format!("Referenced in document ({}):", referenced.len())];
    lines.extend(referenced.iter().map(|name| format!("  {name}")));
    lines.push(format!("In image directory ({}):", on_disk.len()));
    lines.extend(on_disk.iter().map(|name| format!("  {name}")));
    lines
}
