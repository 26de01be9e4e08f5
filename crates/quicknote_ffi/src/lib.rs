//! Flutter-facing bindings for QuickNote core.
//!
//! Only `api` is scanned by the bridge code generator.

pub mod api;
