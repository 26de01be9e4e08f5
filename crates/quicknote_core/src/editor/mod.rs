//! Block editor protocol.
//!
//! # Responsibility
//! - Describe block-list mutations as commands (`command`).
//! - Tie a command stream and the auto-save timer to one note (`session`).
//!
//! # Invariants
//! - A loaded block list always starts with a HEADING block.
//! - Block uids are unique within one session.

pub mod command;
pub mod session;
