//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note persistence port consumed by the model and services.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod note_repo;
