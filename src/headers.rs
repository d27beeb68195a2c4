//! Known-header configuration for the normalizer.
//!
//! A [`HeaderSet`] is the only configuration surface of the pipeline: an
//! ordered list of section labels (e.g. "Hint", "Lore") that receive
//! canonical `**Label:**` treatment. Order matters: when a malformed span
//! could match two labels, the earlier label wins.
//!
//! All surface-form patterns are compiled once at construction and reused
//! across every `normalize` call, so per-call cost is matching only.

use regex::Regex;
use std::fmt;

/// Labels recognized out of the box, in priority order.
pub const DEFAULT_LABELS: [&str; 5] = [
    "Hint",
    "Lore",
    "Places of Interest",
    "Strategy",
    "What to focus on",
];

/// Errors that can occur while building a [`HeaderSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderSetError {
    /// The label list was empty.
    Empty,
    /// A label was empty or whitespace-only.
    BlankLabel,
    /// Two labels collide case-insensitively (after whitespace collapse).
    DuplicateLabel(String),
    /// A label produced an uncompilable pattern (e.g. pathological length).
    Pattern(regex::Error),
}

impl fmt::Display for HeaderSetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderSetError::Empty => write!(f, "header set must contain at least one label"),
            HeaderSetError::BlankLabel => write!(f, "header labels must not be blank"),
            HeaderSetError::DuplicateLabel(label) => {
                write!(f, "duplicate header label: {}", label)
            }
            HeaderSetError::Pattern(err) => write!(f, "invalid header pattern: {}", err),
        }
    }
}

impl std::error::Error for HeaderSetError {}

impl From<regex::Error> for HeaderSetError {
    fn from(err: regex::Error) -> Self {
        HeaderSetError::Pattern(err)
    }
}

/// One recognized label plus its compiled surface-form patterns.
///
/// Surface forms covered (all case-insensitive, label-internal spaces match
/// any whitespace run):
/// - `bold_colon`: `**Label:` with optional same-line closing `**` and
///   trailing colons. The exact canonical `**Label:**` also matches this
///   pattern; pass 2 detects it and leaves it byte-identical.
/// - `bold_closed`: `**Label**` with no colon, optional trailing colons.
/// - `bold_dangling`: `** Label` left open at end of line.
/// - `plain_line`: `Label:` at the start of a line (or of the whole text).
/// - `plain_inline`: `Label:` mid-sentence, directly after a word character
///   or sentence-ending punctuation on the same line.
/// - `marker`: the plain canonical marker pass 2 emits, matched by pass 4
///   for re-bolding.
pub(crate) struct Header {
    label: String,
    canonical: String,
    pub(crate) bold_colon: Regex,
    pub(crate) bold_closed: Regex,
    pub(crate) bold_dangling: Regex,
    pub(crate) plain_line: Regex,
    pub(crate) plain_inline: Regex,
    pub(crate) marker: Regex,
}

impl Header {
    fn new(label: String) -> Result<Self, HeaderSetError> {
        let h = flexible(&label);
        let canonical = format!("**{}:**", label);
        Ok(Header {
            bold_colon: Regex::new(&format!(r"(?i)\*\*\s*{}\s*:+(?:[ \t]*\*\*)?:*", h))?,
            bold_closed: Regex::new(&format!(r"(?i)\*\*\s*{}\s*\*\*:*", h))?,
            bold_dangling: Regex::new(&format!(r"(?im)\*\*[ \t]*{}[ \t]*$", h))?,
            plain_line: Regex::new(&format!(r"(?im)^[ \t]*{}[ \t]*:+", h))?,
            plain_inline: Regex::new(&format!(r"(?i)([\w.!?])[ \t]+{}[ \t]*:+", h))?,
            marker: Regex::new(&format!(r"(?im)^[ \t]*{}[ \t]*:\s*", h))?,
            label,
            canonical,
        })
    }

    /// Canonical spelling of the label ("Places of Interest").
    pub(crate) fn label(&self) -> &str {
        &self.label
    }

    /// The one correct rendering: `**Label:**`.
    pub(crate) fn canonical(&self) -> &str {
        &self.canonical
    }

    /// The plain marker pass 2 rewrites every malformed form to.
    pub(crate) fn marker_text(&self) -> String {
        format!("\n\n{}:\n", self.label)
    }
}

/// A validated, ordered set of recognized section labels.
pub struct HeaderSet {
    headers: Vec<Header>,
    headerish: Regex,
}

impl HeaderSet {
    /// Build a header set from an ordered sequence of labels.
    ///
    /// Labels are trimmed and internal whitespace is collapsed to single
    /// spaces before validation; matching is case-insensitive and treats the
    /// remaining single spaces as flexible whitespace.
    pub fn new<I, S>(labels: I) -> Result<Self, HeaderSetError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen: Vec<String> = Vec::new();
        let mut headers = Vec::new();
        for raw in labels {
            let label = collapse_spaces(raw.as_ref());
            if label.is_empty() {
                return Err(HeaderSetError::BlankLabel);
            }
            let key = label.to_lowercase();
            if seen.contains(&key) {
                return Err(HeaderSetError::DuplicateLabel(label));
            }
            seen.push(key);
            headers.push(Header::new(label)?);
        }
        if headers.is_empty() {
            return Err(HeaderSetError::Empty);
        }

        let alternation = headers
            .iter()
            .map(|header| flexible(header.label()))
            .collect::<Vec<_>>()
            .join("|");
        let headerish = Regex::new(&format!(r"(?i)^\s*(?:{})\s*(?::|$)", alternation))?;

        Ok(HeaderSet { headers, headerish })
    }

    /// Canonical label spellings, in priority order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.headers.iter().map(Header::label)
    }

    /// Number of configured labels.
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub(crate) fn headers(&self) -> &[Header] {
        &self.headers
    }

    /// Whether an emphasis span's content is a header token rather than
    /// ordinary bold text. Pass 1 leaves such spans for pass 2.
    pub(crate) fn looks_like_header(&self, span: &str) -> bool {
        self.headerish.is_match(span)
    }
}

impl Default for HeaderSet {
    fn default() -> Self {
        HeaderSet::new(DEFAULT_LABELS).expect("default header labels are valid")
    }
}

impl fmt::Debug for HeaderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

/// "Places   of Interest" -> "Places of Interest".
fn collapse_spaces(label: &str) -> String {
    label.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape a label for use in a pattern, turning each embedded space into a
/// flexible whitespace run: "Places of Interest" -> `Places\s+of\s+Interest`.
fn flexible(label: &str) -> String {
    label
        .split_whitespace()
        .map(|word| regex::escape(word))
        .collect::<Vec<_>>()
        .join(r"\s+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_has_all_labels() {
        let set = HeaderSet::default();
        assert_eq!(set.len(), 5);
        assert_eq!(set.labels().next(), Some("Hint"));
    }

    #[test]
    fn rejects_empty_list() {
        let labels: [&str; 0] = [];
        let err = HeaderSet::new(labels).err();
        assert_eq!(err, Some(HeaderSetError::Empty));
    }

    #[test]
    fn rejects_blank_label() {
        let err = HeaderSet::new(["Hint", "   "]).err();
        assert_eq!(err, Some(HeaderSetError::BlankLabel));
    }

    #[test]
    fn rejects_case_insensitive_duplicates() {
        let err = HeaderSet::new(["Hint", "hint"]).err();
        assert_eq!(err, Some(HeaderSetError::DuplicateLabel("hint".into())));
    }

    #[test]
    fn collapses_internal_whitespace_in_labels() {
        let set = HeaderSet::new(["Places   of  Interest"]).unwrap();
        assert_eq!(set.labels().next(), Some("Places of Interest"));
    }

    #[test]
    fn headerish_matches_whole_labels_only() {
        let set = HeaderSet::default();
        assert!(set.looks_like_header("Hint: go north"));
        assert!(set.looks_like_header(" lore "));
        assert!(set.looks_like_header("Places  of\nInterest:"));
        assert!(!set.looks_like_header("Hints are useful"));
        assert!(!set.looks_like_header("a hint: inside prose"));
    }
}
