//! Note domain model.
//!
//! # Responsibility
//! - Define the block (`format`) and note (`note`) records.
//! - Keep all derived text projections next to the data they read.
//!
//! # Invariants
//! - A note's content lives only in its encoded `description`.
//! - Model code never fails on malformed stored data; it degrades to defaults.

pub mod format;
pub mod note;
