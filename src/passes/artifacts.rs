//! Pass 5: artifact cleanup.
//!
//! Final tidy over whitespace and stranded emphasis markers. Everything here
//! only ever removes or shrinks; nothing can produce a new header surface
//! form, which is what lets this pass run last without threatening
//! idempotence. A lone unpaired `**` inside prose is left alone; stripping
//! it cannot be done stably without risking the markers of a correctly
//! bolded header.

use crate::passes::colons;
use once_cell::sync::Lazy;
use regex::Regex;

/// Emphasis pair wrapping nothing (or only same-line whitespace). Kept to a
/// single line so a dangling opener is never bridged to the opening marker
/// of a bolded header further down.
static EMPTY_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*[ \t]*\*\*").unwrap());

/// A line holding nothing but a stray `**`.
static BOLD_ONLY_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[ \t]*\*\*[ \t]*$").unwrap());

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Collapse `**<ws>**` pairs. Shared with pass 1, which applies it up front
/// so header forms hidden behind empty pairs are visible to pass 2.
pub(crate) fn strip_empty_pairs(input: &str) -> String {
    EMPTY_PAIR.replace_all(input, "").into_owned()
}

pub fn cleanup(input: &str) -> String {
    let text = strip_empty_pairs(input);
    let text = BOLD_ONLY_LINE.replace_all(&text, "");
    let text = colons::collapse(&text);
    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
