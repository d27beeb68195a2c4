//! Pass 1: inline-emphasis repair and pre-clean.
//!
//! Everything here operates on content the later passes must not have to
//! reinterpret: line endings, escaped markers, stray brackets, run-on list
//! items, missing spaces, loose `** text **` spans, orphan opening markers
//! in prose, and prepositions glued to capitalized words. Spans whose
//! content is a header token are deliberately left alone: rewriting them is
//! pass 2's job, and tightening `** Hint:**` here would disguise a malformed
//! header as an already-canonical one.

use crate::headers::HeaderSet;
use crate::passes::artifacts;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Bracket runs isolated by whitespace (or text boundaries) on both sides.
/// Brackets glued to content (markdown links, `array[3]`) are not touched.
static STRAY_BRACKETS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[ \t\n])(?:[\[\]][ \t\n]*)+([ \t\n]|$)").unwrap());

/// Numbered list item running on after a sentence: `north. 1. **Go**`.
static LIST_AFTER_SENTENCE_BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*(\d+\.\s*\*\*)").unwrap());

/// Same, plain item: `north. 1. Go`.
static LIST_AFTER_SENTENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*(\d+\.\s+[A-Z])").unwrap());

/// Missing space in a list item: `1.Text` -> `1. Text`.
static LIST_TIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(\d+)\.([A-Z])").unwrap());

/// Missing space after a colon before a capitalized word. The preceding
/// character class keeps URL schemes (`https:`) out of reach.
static COLON_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^htfps*]):([A-Z])").unwrap());

/// Emphasis span with leading/trailing internal whitespace.
static LOOSE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*[ \t]*([^*\n]+?)[ \t]*\*\*").unwrap());

/// Orphan opening marker before running prose: `** Egypt is a place`. A
/// stopword right after the phrase signals ordinary text, not a span the
/// writer meant to close. Runs after loose-span tightening, so a complete
/// pair can never lose its opener here.
static OPEN_BEFORE_STOPWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\*\*[ \t]+([A-Za-z][A-Za-z \t]*?)([ \t]+)(is|are|was|were|has|have|and|or|but|the|a|an|of|to|in|on|at|for|with|as|by|from|serves?|often|usually)([ \t])",
    )
    .unwrap()
});

/// Opening marker whose span runs into sentence punctuation with no closing
/// pair in sight: `see ** note here. more`.
static INCOMPLETE_BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[ \t\n])\*\*[ \t]+([A-Za-z][^*\n]{2,}?)([.!?])([^*]|$)").unwrap());

/// Preposition glued to a capitalized word: `likeContagion`.
static GLUED_PREPOSITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(like|or|and|the|a|an|for|with|from|to|in|on|at|by|as)([A-Z])").unwrap()
});

/// Word glued to the end of an emphasis span: `**bold**word`. Spans are kept
/// to one line so an unpaired marker is never bridged across a paragraph
/// break to the opening marker of a bolded header below it.
static BOLD_THEN_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*\n]+)\*\*([A-Za-z])").unwrap());

/// Word glued to the start of an emphasis span: `word**Bold`.
static WORD_THEN_BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-z])\*\*([A-Z])").unwrap());

/// Run the pre-clean and emphasis repairs.
pub fn repair(input: &str, headers: &HeaderSet) -> String {
    let text = input.replace("\r\n", "\n").replace('\r', "\n");
    let text = text.replace("\\*", "*");
    let text = artifacts::strip_empty_pairs(&text);

    let text = STRAY_BRACKETS.replace_all(&text, |caps: &Captures| {
        caps[0].chars().filter(|c| *c != '[' && *c != ']').collect::<String>()
    });

    let text = LIST_AFTER_SENTENCE_BOLD.replace_all(&text, ".\n\n$1");
    let text = LIST_AFTER_SENTENCE.replace_all(&text, ".\n\n$1");
    let text = LIST_TIGHT.replace_all(&text, "$1. $2");
    // Applied twice: in a chain like `A:B:C` the capital consumed by one
    // match is the preceding character of the next, and non-overlapping
    // matching skips it. The survivors sit at least two characters apart
    // afterwards, so the second application reaches the fixed point.
    let text = COLON_SPACE.replace_all(&text, "$1: $2");
    let text = COLON_SPACE.replace_all(&text, "$1: $2");

    let text = LOOSE_SPAN.replace_all(&text, |caps: &Captures| {
        let span = &caps[1];
        if span.trim().is_empty() {
            String::new()
        } else if headers.looks_like_header(span) {
            caps[0].to_string()
        } else {
            format!("**{}**", span)
        }
    });

    let text = OPEN_BEFORE_STOPWORD.replace_all(&text, |caps: &Captures| {
        if headers.looks_like_header(&caps[1]) {
            caps[0].to_string()
        } else {
            format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4])
        }
    });

    // Applied twice for the same overlap reason as the colon rule: the
    // trailing character one match consumes can be the leading whitespace
    // of the next candidate.
    let text = INCOMPLETE_BOLD.replace_all(&text, drop_incomplete_open(headers));
    let text = INCOMPLETE_BOLD.replace_all(&text, drop_incomplete_open(headers));

    let text = BOLD_THEN_WORD.replace_all(&text, "**$1** $2");
    let text = WORD_THEN_BOLD.replace_all(&text, "$1 **$2");
    let text = GLUED_PREPOSITION.replace_all(&text, "$1 $2");

    text.trim().to_string()
}

fn drop_incomplete_open(headers: &HeaderSet) -> impl Fn(&Captures) -> String + '_ {
    move |caps: &Captures| {
        if headers.looks_like_header(&caps[2]) {
            caps[0].to_string()
        } else {
            format!("{}{}{}{}", &caps[1], &caps[2], &caps[3], &caps[4])
        }
    }
}
