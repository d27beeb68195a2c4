//! Pass 4: header re-bolding.
//!
//! The plain markers pass 2 produced (`Label:` at line start, single colon
//! after pass 3) become `**Label:**` followed by exactly one blank line; all
//! whitespace between the marker and the section body is absorbed into that
//! blank line. Markers at the very start of the text keep their leading
//! newlines here; pass 5 trims them, which is what gives a leading header no
//! blank line above it.
//!
//! Matching is label-driven rather than marker-token-driven on purpose: a
//! plain `Label:` line that reached this pass by any route gets the same
//! canonical treatment.

use crate::headers::HeaderSet;
use regex::NoExpand;

pub fn embolden(input: &str, headers: &HeaderSet) -> String {
    let mut text = input.to_string();
    for header in headers.headers() {
        let canonical = format!("{}\n\n", header.canonical());
        text = header
            .marker
            .replace_all(&text, NoExpand(&canonical))
            .into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::HeaderSet;

    fn run(input: &str) -> String {
        embolden(input, &HeaderSet::default())
    }

    #[test]
    fn bolds_markers_and_spaces_the_body() {
        assert_eq!(run("\n\nHint:\n go north"), "\n\n**Hint:**\n\ngo north");
    }

    #[test]
    fn absorbs_extra_blank_lines_after_marker() {
        assert_eq!(run("Hint:\n\n\n\nbody"), "**Hint:**\n\nbody");
    }

    #[test]
    fn keeps_list_bodies_adjacent() {
        assert_eq!(run("Places of Interest:\n* A\n* B"), "**Places of Interest:**\n\n* A\n* B");
    }

    #[test]
    fn ignores_already_bold_headers() {
        assert_eq!(run("**Hint:**\n\nbody"), "**Hint:**\n\nbody");
    }

    #[test]
    fn ignores_mid_line_labels() {
        assert_eq!(run("the Hint: stays"), "the Hint: stays");
    }
}
