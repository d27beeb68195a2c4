//! High-level entry points: the [`normalize`] function and the [`Pipeline`]
//! handle that combines control-tag extraction with normalization.

use crate::config::TagmendConfig;
use crate::headers::{HeaderSet, HeaderSetError};
use crate::passes::{artifacts, bolding, colons, emphasis, header_marks};
use crate::tags::{ScannerError, TagScanner, TagValue};
use std::collections::BTreeMap;
use std::fmt;

/// Normalize malformed section-tag markup.
///
/// Runs the five rewrite passes in their fixed order. Total over all inputs:
/// empty strings, binary-looking text, and unmatched emphasis markers all
/// degrade to best-effort cleanup, never an error. Applying the function to
/// its own output returns it unchanged.
///
/// ```
/// use tagmend::{normalize, HeaderSet};
///
/// let headers = HeaderSet::default();
/// let out = normalize("Places of Interest:\n* A\n* B", &headers);
/// assert_eq!(out, "**Places of Interest:**\n\n* A\n* B");
/// assert_eq!(normalize(&out, &headers), out);
/// ```
pub fn normalize(input: &str, headers: &HeaderSet) -> String {
    let text = emphasis::repair(input, headers);
    let text = header_marks::mark(&text, headers);
    let text = colons::collapse(&text);
    let text = bolding::embolden(&text, headers);
    artifacts::cleanup(&text)
}

/// Errors that can occur while assembling a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Headers(HeaderSetError),
    Scanner(ScannerError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Headers(err) => write!(f, "header configuration: {}", err),
            PipelineError::Scanner(err) => write!(f, "tag scanner configuration: {}", err),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<HeaderSetError> for PipelineError {
    fn from(err: HeaderSetError) -> Self {
        PipelineError::Headers(err)
    }
}

impl From<ScannerError> for PipelineError {
    fn from(err: ScannerError) -> Self {
        PipelineError::Scanner(err)
    }
}

/// Result of running a raw chat completion through the full pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Render-ready markdown.
    pub content: String,
    /// Control tags lifted out of the raw stream.
    pub tags: BTreeMap<String, TagValue>,
    /// Reported progress percentage, if the stream carried one.
    pub progress: Option<u8>,
}

/// Tag extraction followed by markup normalization, behind one handle.
///
/// Construct once at startup and share by reference; both stages are pure
/// and the handle is safe to use from any number of threads.
pub struct Pipeline {
    headers: HeaderSet,
    scanner: TagScanner,
    extract_progress: bool,
}

impl Pipeline {
    pub fn new(headers: HeaderSet, scanner: TagScanner) -> Self {
        Pipeline {
            headers,
            scanner,
            extract_progress: true,
        }
    }

    /// Assemble a pipeline from a loaded configuration.
    pub fn from_config(config: &TagmendConfig) -> Result<Self, PipelineError> {
        let headers = HeaderSet::new(&config.headers.labels)?;
        let scanner = TagScanner::new(&config.tags.prefix)?;
        Ok(Pipeline {
            headers,
            scanner,
            extract_progress: config.tags.extract_progress,
        })
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    /// Scan out control tags, then normalize what remains.
    pub fn run(&self, raw: &str) -> PipelineOutput {
        let scanned = self.scanner.scan(raw);
        PipelineOutput {
            content: normalize(&scanned.content, &self.headers),
            tags: scanned.tags,
            progress: if self.extract_progress {
                scanned.progress
            } else {
                None
            },
        }
    }
}
