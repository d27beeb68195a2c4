//! Control-tag extraction.
//!
//! Model output carries machine-readable control tags inline with the prose,
//! in the shape `[PREFIX_NAME: value]`. The scanner lifts them out before the
//! markup passes ever see the text: tag payloads are data, not markdown, and
//! must not be "repaired".
//!
//! Payload handling, in the order the scanner applies it:
//!
//! 1. JSON array payloads (`[PREFIX_NAME: [..]]`), parsed with a
//!    single-to-double quote fixup for the model's habit of emitting
//!    `['a', 'b']`.
//! 2. JSON object payloads, collected per tag name so repeated tags
//!    accumulate instead of clobbering each other.
//! 3. Simple scalar payloads. A `PROGRESS` payload is routed to the
//!    dedicated progress field rather than the tag map.
//! 4. Orphaned tag fragments and quoted JSON debris left behind by
//!    truncated completions are stripped.
//!
//! Progress is also recognized in a few looser shapes the model falls back
//! to (`Progress: 73%`, a bare `PROGRESS: n`, a `stateUpdateTags` blob).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Shape a tag prefix must have: uppercase ASCII word, as in `TAG` or `OTK`.
static PREFIX_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9_]*$").unwrap());

/// Bare `PROGRESS: n` without the tag wrapper.
static PROGRESS_BARE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\[?PROGRESS[:\s]+(\d+)").unwrap());

/// Prose-style progress mention, e.g. `game progress: approximately 40%`.
static PROGRESS_PROSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:game progress|progress|completion)[:\s]+(?:approximately\s+)?(\d+)\s*%")
        .unwrap()
});

/// Progress buried in a serialized state-update blob.
static PROGRESS_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)"stateUpdateTags"[^}]*"PROGRESS[:\s]+(\d+)"#).unwrap());

/// Quoted question fragments stranded on their own line when a structured
/// payload gets truncated mid-stream.
static QUOTED_DEBRIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?m)^["'][^"'\n]*\?["'][ \t]*,?[ \t]*\n?"#).unwrap());

/// Errors raised while building a [`TagScanner`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScannerError {
    /// Prefix is not an uppercase ASCII word.
    InvalidPrefix(String),
    /// A derived pattern failed to compile.
    Pattern(regex::Error),
}

impl fmt::Display for ScannerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScannerError::InvalidPrefix(prefix) => {
                write!(f, "invalid tag prefix {:?}: expected an uppercase ASCII word", prefix)
            }
            ScannerError::Pattern(err) => write!(f, "tag pattern: {}", err),
        }
    }
}

impl std::error::Error for ScannerError {}

impl From<regex::Error> for ScannerError {
    fn from(err: regex::Error) -> Self {
        ScannerError::Pattern(err)
    }
}

/// Payload of an extracted control tag.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Plain scalar payload.
    Text(String),
    /// Payload that parsed as JSON (array or single object).
    Json(Value),
    /// Object payloads collected from repeated tags of the same name.
    Objects(Vec<Value>),
}

/// What [`TagScanner::scan`] hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutput {
    /// Input with every recognized tag removed.
    pub content: String,
    /// Extracted tags keyed by name (the part after the prefix).
    pub tags: BTreeMap<String, TagValue>,
    /// Progress percentage, when one was found in any recognized shape.
    pub progress: Option<u8>,
}

/// Compiled tag patterns for one prefix.
pub struct TagScanner {
    prefix: String,
    json_array: Regex,
    json_object: Regex,
    simple: Regex,
    progress: Regex,
    orphan: Regex,
}

impl TagScanner {
    pub fn new(prefix: &str) -> Result<Self, ScannerError> {
        if !PREFIX_SHAPE.is_match(prefix) {
            return Err(ScannerError::InvalidPrefix(prefix.to_string()));
        }
        Ok(TagScanner {
            prefix: prefix.to_string(),
            json_array: Regex::new(&format!(
                r"(?s)\[{prefix}_([A-Z][A-Z0-9_]*):\s*(\[.*?\])\s*\]"
            ))?,
            json_object: Regex::new(&format!(
                r"(?s)\[{prefix}_([A-Z][A-Z0-9_]*):\s*(\{{.*?\}})\s*\]"
            ))?,
            simple: Regex::new(&format!(
                r"\[{prefix}_([A-Z][A-Z0-9_]*):\s*([^\[\]]+?)\s*\]"
            ))?,
            progress: Regex::new(&format!(r"(?i)\[{prefix}_PROGRESS[:\s]+(\d+)"))?,
            orphan: Regex::new(&format!(r"\[{prefix}_[A-Z0-9_]*:[^\]]*\]"))?,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Lift every recognized tag out of `input`.
    ///
    /// Total: unparseable payloads are left in place for the orphan sweep
    /// rather than reported as errors.
    pub fn scan(&self, input: &str) -> ScanOutput {
        let progress = self.extract_progress(input);
        let mut tags: BTreeMap<String, TagValue> = BTreeMap::new();

        let text = self
            .json_array
            .replace_all(input, |caps: &Captures| match parse_json_payload(&caps[2]) {
                Some(value) => {
                    tags.insert(caps[1].to_string(), TagValue::Json(value));
                    String::new()
                }
                None => caps[0].to_string(),
            })
            .into_owned();

        let mut objects: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        let text = self
            .json_object
            .replace_all(&text, |caps: &Captures| match parse_json_payload(&caps[2]) {
                Some(value) => {
                    objects.entry(caps[1].to_string()).or_default().push(value);
                    String::new()
                }
                None => caps[0].to_string(),
            })
            .into_owned();
        for (name, values) in objects {
            tags.insert(name, TagValue::Objects(values));
        }

        let text = self
            .simple
            .replace_all(&text, |caps: &Captures| {
                let name = &caps[1];
                // PROGRESS rides the tag syntax but is state, not content;
                // it lives in its own field and never enters the map.
                if name != "PROGRESS" {
                    tags.insert(name.to_string(), TagValue::Text(caps[2].to_string()));
                }
                String::new()
            })
            .into_owned();

        let text = self.orphan.replace_all(&text, "").into_owned();
        let content = QUOTED_DEBRIS.replace_all(&text, "").into_owned();

        ScanOutput {
            content,
            tags,
            progress,
        }
    }

    /// Try each progress shape in order of reliability; the first capture
    /// that parses to a percentage in range wins.
    fn extract_progress(&self, input: &str) -> Option<u8> {
        let candidates = [&self.progress, &*PROGRESS_BARE, &*PROGRESS_PROSE, &*PROGRESS_STATE];
        for pattern in candidates {
            if let Some(caps) = pattern.captures(input) {
                if let Ok(value) = caps[1].parse::<u8>() {
                    if value <= 100 {
                        return Some(value);
                    }
                }
            }
        }
        None
    }
}

impl fmt::Debug for TagScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagScanner")
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Parse a JSON payload, retrying once with single quotes swapped for double
/// quotes. The model writes `['a', 'b']` more often than not.
fn parse_json_payload(raw: &str) -> Option<Value> {
    serde_json::from_str(raw)
        .or_else(|_| serde_json::from_str(&raw.replace('\'', "\"")))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scanner() -> TagScanner {
        TagScanner::new("TAG").unwrap()
    }

    #[test]
    fn rejects_bad_prefixes() {
        assert_eq!(
            TagScanner::new("tag").err(),
            Some(ScannerError::InvalidPrefix("tag".to_string()))
        );
        assert!(TagScanner::new("").is_err());
        assert!(TagScanner::new("T AG").is_err());
        assert!(TagScanner::new("OTK").is_ok());
    }

    #[test]
    fn extracts_simple_text_tag() {
        let out = scanner().scan("[TAG_ITEM: rusty sword] take it");
        assert_eq!(out.content, " take it");
        assert_eq!(
            out.tags.get("ITEM"),
            Some(&TagValue::Text("rusty sword".to_string()))
        );
        assert_eq!(out.progress, None);
    }

    #[test]
    fn extracts_json_array_with_quote_fixup() {
        let out = scanner().scan("[TAG_INVENTORY: ['sword', 'shield']] done");
        assert_eq!(out.content, " done");
        assert_eq!(
            out.tags.get("INVENTORY"),
            Some(&TagValue::Json(json!(["sword", "shield"])))
        );
    }

    #[test]
    fn collects_repeated_object_tags() {
        let out = scanner().scan(r#"[TAG_NPC: {"name": "Ana"}] [TAG_NPC: {"name": "Bo"}]"#);
        assert_eq!(
            out.tags.get("NPC"),
            Some(&TagValue::Objects(vec![
                json!({"name": "Ana"}),
                json!({"name": "Bo"}),
            ]))
        );
    }

    #[test]
    fn routes_progress_tag_to_progress_field() {
        let out = scanner().scan("[TAG_PROGRESS: 42] go north");
        assert_eq!(out.progress, Some(42));
        assert!(out.tags.is_empty());
        assert_eq!(out.content, " go north");
    }

    #[test]
    fn rejects_out_of_range_progress() {
        let out = scanner().scan("[TAG_PROGRESS: 250] go");
        assert_eq!(out.progress, None);
        assert!(out.tags.is_empty());
    }

    #[test]
    fn finds_prose_progress() {
        let out = scanner().scan("You are at game progress: approximately 40% now.");
        assert_eq!(out.progress, Some(40));
        assert_eq!(out.content, "You are at game progress: approximately 40% now.");
    }

    #[test]
    fn strips_orphan_fragments_and_debris() {
        let out = scanner().scan("[TAG_: broken] keep\n\"what now?\",\nrest");
        assert_eq!(out.content, " keep\nrest");
        assert!(out.tags.is_empty());
    }

    #[test]
    fn foreign_prefix_is_untouched(){
        let out = scanner().scan("[OTHER_ITEM: x] text");
        assert_eq!(out.content, "[OTHER_ITEM: x] text");
        assert!(out.tags.is_empty());
    }
}
