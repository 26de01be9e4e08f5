//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into use-case level APIs.
//! - Keep UI/FFI layers decoupled from storage details.
//! - Define the credential and share ports the UI plugs into.

pub mod access;
pub mod actions;
pub mod note_service;
pub mod share;
