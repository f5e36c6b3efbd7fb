//! fixdiff Core - text comparison kernel
//!
//! This crate provides the pieces of fixdiff that do not touch the outside
//! world:
//! - Line-oriented document comparison with bounded divergence reports
//! - Absolute first-differing-offset detection
//! - Text and JSON rendering of comparison reports
//! - The canonical error facility (`ExError`, `ExErrorKind`)
//! - The structured logging facility shared by every fixdiff crate

pub mod diff;
pub mod errors;
pub mod logging_facility;

// Used by the logging macros so that callers need not depend on core-types.
#[doc(hidden)]
pub use fixdiff_core_types as core_types;

// Re-export commonly used types
pub use diff::{
    compare, first_differing_offset, render_text_report, CompareOptions, DiffEntry, DiffReport,
    Document, LineContent,
};
pub use errors::{ExError, ExErrorKind};
