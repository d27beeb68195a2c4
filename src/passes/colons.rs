//! Pass 3: colon cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

static COLON_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r":{2,}").unwrap());

/// Collapse any run of two or more colons to a single colon.
pub fn collapse(input: &str) -> String {
    COLON_RUN.replace_all(input, ":").into_owned()
}
