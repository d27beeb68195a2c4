//! # tagmend
//!
//! Deterministic repair of malformed section-tag markup in AI-generated chat
//! text. The producer (an external LLM) is unreliable about formatting: it
//! emits section headers like `Hint`, `Lore`, or `Places of Interest` with
//! inconsistent `**` emphasis, stray colons, and irregular spacing. This crate
//! rewrites that output into a canonical, consistently bolded markdown
//! structure that a chat UI can render directly.
//!
//! The core contract is [`normalize`]: a pure, total function over strings.
//! It never fails, never panics, and is idempotent: normalizing already
//! normalized text is a no-op.
//!
//! ```
//! use tagmend::{normalize, HeaderSet};
//!
//! let headers = HeaderSet::default();
//! let fixed = normalize("** Hint: Go north.** Lore: Old ruins.", &headers);
//! assert_eq!(fixed, "**Hint:**\n\nGo north.\n\n**Lore:**\n\nOld ruins.");
//! ```
//!
//! Raw chat streams also carry machine-readable control tags
//! (`[TAG_NAME: value]`) that must be stripped before rendering; see
//! [`TagScanner`]. [`Pipeline`] combines tag extraction and normalization
//! behind a single handle:
//!
//! ```
//! use tagmend::Pipeline;
//!
//! let pipeline = Pipeline::from_config(&tagmend::config::load_defaults()?)?;
//! let out = pipeline.run("[TAG_PROGRESS: 42] Hint: head north");
//! assert_eq!(out.progress, Some(42));
//! assert_eq!(out.content, "**Hint:**\n\nhead north");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod headers;
pub mod passes;
pub mod pipeline;
pub mod tags;

pub use headers::{HeaderSet, HeaderSetError, DEFAULT_LABELS};
pub use pipeline::{normalize, Pipeline, PipelineError, PipelineOutput};
pub use tags::{ScanOutput, ScannerError, TagScanner, TagValue};
