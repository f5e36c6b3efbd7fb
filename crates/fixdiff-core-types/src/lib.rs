//! Core types shared across fixdiff facilities
//!
//! This crate provides foundational types used by the logging facility,
//! the error facility and the harness:
//!
//! - **Correlation types**: RunId
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;

pub use correlation::RunId;
