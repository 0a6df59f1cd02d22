//! Image reference extraction from the lesson document.
//!
//! Scans document lines for an image-inclusion pattern and produces the
//! ordered list of [`Reference`]s that drives reconciliation and renaming.
//!
//! ## Inclusion Patterns
//!
//! Two syntaxes are recognized:
//!
//! ```text
//! {% include figure.html filename="intro01.png" caption="..." %}
//! <img src="intro01.png" alt="...">
//! ```
//!
//! A document must use exactly one syntax throughout. A pattern is "in use"
//! when it matches at least one line; zero patterns in use means no image
//! references, and two means mixed syntax. Both are fatal, since the rename
//! step rewrites matched lines and cannot guess which matches are real.
//!
//! ## Spans
//!
//! Each reference records the byte range of the filename within its line, as
//! captured by the pattern. The renamer splices exactly that range, so a
//! filename that happens to be a substring of another token on the same line
//! is never mis-substituted.

use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;
use thiserror::Error;

static FIGURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"figure\.html +filename=['"](.+?)['"]"#).unwrap());
static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<img [^>]*?src=['"]([^'"]+)['"]"#).unwrap());
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?:").unwrap());

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no image references found in {document}")]
    NoReferences { document: String },
    #[error(
        "mixed image syntaxes in {document}: {}. Use only the {preferred} syntax",
        .found.join(" and ")
    )]
    MixedSyntax {
        document: String,
        found: Vec<String>,
        preferred: String,
    },
    #[error(
        "{filename} is referenced more than once in {document}\n\
         If the image needs to appear more than once, rename each new\n\
         occurrence both in the document and in the image directory."
    )]
    DuplicateReference { filename: String, document: String },
}

/// One of the recognized image-inclusion syntaxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// `{% include figure.html filename="..." %}`, the preferred syntax.
    FigureInclude,
    /// `<img src="...">`.
    ImgTag,
}

impl Pattern {
    /// All candidate patterns, preferred first.
    pub const ALL: &'static [Pattern] = &[Pattern::FigureInclude, Pattern::ImgTag];

    /// Short human-readable name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Pattern::FigureInclude => "figure include",
            Pattern::ImgTag => "<img> tag",
        }
    }

    fn regex(&self) -> &'static Regex {
        match self {
            Pattern::FigureInclude => &FIGURE_RE,
            Pattern::ImgTag => &IMG_RE,
        }
    }
}

/// An image reference extracted from the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Bare filename, no path prefix, surrounding whitespace trimmed.
    pub filename: String,
    /// 1-indexed line number in the original document.
    pub line: usize,
    /// Byte range of the filename within that line.
    pub span: Range<usize>,
}

/// Determine which inclusion pattern the document uses.
///
/// Exactly one candidate must match at least one line. `document` is only
/// used for error messages.
pub fn detect_pattern(lines: &[&str], document: &str) -> Result<Pattern, ExtractError> {
    let in_use: Vec<Pattern> = Pattern::ALL
        .iter()
        .copied()
        .filter(|p| lines.iter().any(|line| p.regex().is_match(line)))
        .collect();

    match in_use.as_slice() {
        [single] => Ok(*single),
        [] => Err(ExtractError::NoReferences {
            document: document.to_string(),
        }),
        several => Err(ExtractError::MixedSyntax {
            document: document.to_string(),
            found: several.iter().map(|p| p.name().to_string()).collect(),
            preferred: Pattern::FigureInclude.name().to_string(),
        }),
    }
}

/// Extract all references matching `pattern`, in document order.
///
/// URLs (`http:`/`https:` values) are skipped. A filename appearing twice is
/// a fatal error: the renamer rewrites by line position, and a second
/// occurrence of the same name is positionally ambiguous.
pub fn extract(
    lines: &[&str],
    pattern: Pattern,
    document: &str,
) -> Result<Vec<Reference>, ExtractError> {
    let mut references: Vec<Reference> = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let Some(caps) = pattern.regex().captures(line) else {
            continue;
        };
        // Group 1 always exists in both patterns
        let m = caps.get(1).unwrap();
        let raw = m.as_str();
        let trimmed = raw.trim();

        if URL_RE.is_match(trimmed) {
            continue;
        }

        if references.iter().any(|r| r.filename == trimmed) {
            return Err(ExtractError::DuplicateReference {
                filename: trimmed.to_string(),
                document: document.to_string(),
            });
        }

        // Narrow the span to the trimmed value so substitution never
        // touches the padding whitespace.
        let lead = raw.len() - raw.trim_start().len();
        let start = m.start() + lead;
        references.push(Reference {
            filename: trimmed.to_string(),
            line: idx + 1,
            span: start..start + trimmed.len(),
        });
    }

    if references.is_empty() {
        return Err(ExtractError::NoReferences {
            document: document.to_string(),
        });
    }
    Ok(references)
}

/// Detect the pattern and extract references in one step.
pub fn extract_references(text: &str, document: &str) -> Result<Vec<Reference>, ExtractError> {
    let lines: Vec<&str> = text.lines().collect();
    let pattern = detect_pattern(&lines, document)?;
    extract(&lines, pattern, document)
}
