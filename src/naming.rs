//! Naming-convention checking for lesson image filenames.
//!
//! The required shape is `<lesson-name><NN>.<ext>`: the lesson name, a 1–3
//! digit index assigned in document order, and a 3–4 character alphanumeric
//! extension token. Examples for lesson `mapping-gis`:
//!
//! ```text
//! mapping-gis01.png
//! mapping-gis02.jpeg
//! mapping-gis117.webp
//! ```
//!
//! Checking never aborts the run by itself. It reports violations and lets
//! the caller decide whether renaming is called for.

use regex::Regex;

/// Result of checking a set of filenames against the convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingReport {
    /// Filenames that do not match, in input order.
    pub violations: Vec<String>,
    /// How many names were checked.
    pub checked: usize,
}

impl NamingReport {
    pub fn is_compliant(&self) -> bool {
        self.violations.is_empty()
    }

    /// An example of a compliant name, for error messages.
    pub fn example(lesson_name: &str) -> String {
        format!("{lesson_name}03.png")
    }
}

/// Check each filename against `^<lesson-name>\d{1,3}\.<3-4 alnum>$`.
pub fn check_names<'a>(
    lesson_name: &str,
    names: impl IntoIterator<Item = &'a str>,
) -> NamingReport {
    let pattern = format!(r"^{}\d{{1,3}}\.[A-Za-z0-9]{{3,4}}$", regex::escape(lesson_name));
    let re = Regex::new(&pattern).unwrap();

    let mut violations = Vec::new();
    let mut checked = 0;
    for name in names {
        checked += 1;
        if !re.is_match(name) {
            violations.push(name.to_string());
        }
    }
    NamingReport { violations, checked }
}
