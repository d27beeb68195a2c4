//! Pass 2: header-token normalization.
//!
//! Every malformed surface form of a known header is rewritten to the plain
//! canonical marker `\n\nLabel:\n`. Bolding is deferred to pass 4 so pass 3
//! can operate uniformly on plain colon syntax. Headers are processed in
//! configuration order; a span consumed by one label's pattern is gone before
//! any later label gets to look at it.
//!
//! The one exception is the exact canonical form `**Label:**`, which is left
//! byte-identical wherever it appears: re-wrapping it would break
//! idempotence and corrupt text that was already correct.

use crate::headers::HeaderSet;
use regex::{Captures, NoExpand};

pub fn mark(input: &str, headers: &HeaderSet) -> String {
    let mut text = input.to_string();
    for header in headers.headers() {
        let marker = header.marker_text();

        // Plain line-start forms go first: the bold patterns below emit
        // markers that sit at line start, and plain_line must never see them.
        text = header
            .plain_line
            .replace_all(&text, NoExpand(&marker))
            .into_owned();
        text = header
            .bold_colon
            .replace_all(&text, |caps: &Captures| {
                if &caps[0] == header.canonical() {
                    caps[0].to_string()
                } else {
                    marker.clone()
                }
            })
            .into_owned();
        text = header
            .bold_closed
            .replace_all(&text, NoExpand(&marker))
            .into_owned();
        text = header
            .bold_dangling
            .replace_all(&text, NoExpand(&marker))
            .into_owned();
        text = header
            .plain_inline
            .replace_all(&text, |caps: &Captures| format!("{}{}", &caps[1], marker))
            .into_owned();
    }
    text
}
