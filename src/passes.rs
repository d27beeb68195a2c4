//! The ordered rewrite passes behind [`normalize`](crate::normalize).
//!
//! Each pass is a total, stateless function from string to string; the
//! pipeline is their fixed composition:
//!
//! 1. [`emphasis`]: inline-emphasis repair and pre-clean
//! 2. [`header_marks`]: malformed header forms to plain canonical markers
//! 3. [`colons`]: colon-run collapse
//! 4. [`bolding`]: marker re-bolding with canonical blank-line spacing
//! 5. [`artifacts`]: stray-marker and whitespace cleanup
//!
//! Pass order is load-bearing. Every content-level repair that could expose
//! a header surface form (bracket stripping, list spacing, colon spacing)
//! lives in pass 1, before header recognition, so a single application sees
//! everything there is to see; that is what makes the whole composition
//! idempotent. Passes 3-5 only ever shrink whitespace, colon runs, and
//! orphaned markers, none of which can create a new header form.

pub mod artifacts;
pub mod bolding;
pub mod colons;
pub mod emphasis;
pub mod header_marks;
