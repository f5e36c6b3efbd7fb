//! Document diff reporter.
//!
//! Compares an actual document (typically captured from an external tool)
//! against an expected one (typically a fixture file) and produces a bounded,
//! ordered description of where they diverge.
//!
//! ## Entry point
//!
//! ```
//! use fixdiff_core::diff::{compare, render_text_report, CompareOptions, Document};
//!
//! let report = compare(
//!     &Document::new("a\nb\nc"),
//!     &Document::new("a\nX\nc"),
//!     &CompareOptions::default(),
//! );
//! assert!(!report.matches);
//! print!("{}", render_text_report(&report));
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: identical inputs produce identical reports.
//! - **Purity**: no I/O, no shared state; safe to call from any thread.
//! - **Bounded output**: at most `max_reported` entries, while the total
//!   divergence count always covers the whole documents.

pub mod engine;
pub mod model;
pub mod render;

pub use engine::{compare, first_differing_offset, offset_context};
pub use model::{
    CompareOptions, DiffEntry, DiffReport, Document, LineContent, OffsetContext,
    DEFAULT_CONTEXT_RADIUS,
};
pub use render::{render_json_report, render_offset_context, render_text_report};
