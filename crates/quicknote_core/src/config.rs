//! Core configuration defaults.
//!
//! # Responsibility
//! - Hold tunables shared by the editor and model layers.
//! - Accept partial overrides from host-provided JSON/serde sources.
//!
//! # Invariants
//! - Missing fields fall back to the compiled defaults.

use serde::Deserialize;
use std::time::Duration;

/// Default ARGB color assigned to new notes.
pub const DEFAULT_NOTE_COLOR: u32 = 0xFF00796B;

/// Auto-save period while an editing session is active.
pub const DEFAULT_AUTOSAVE_INTERVAL_MS: u64 = 1_000;

/// Editor tunables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub autosave_interval_ms: u64,
    pub default_color: u32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            autosave_interval_ms: DEFAULT_AUTOSAVE_INTERVAL_MS,
            default_color: DEFAULT_NOTE_COLOR,
        }
    }
}

impl EditorConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_millis(self.autosave_interval_ms)
    }
}
