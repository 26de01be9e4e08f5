//! Locked-note access gate.
//!
//! # Responsibility
//! - Gate view/edit/share actions on locked notes behind credential checks.
//!
//! # Invariants
//! - A failed verification re-prompts; it never aborts the flow.
//! - Only the prompt itself can end the flow without running the action.
//! - Secrets are never logged.

use crate::model::note::Note;
use log::{debug, info};

/// Credential collaborator.
pub trait CredentialVerifier {
    fn verify(&self, secret: &str) -> bool;
}

/// Verifies against a fixed pincode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PincodeVerifier {
    pincode: String,
}

impl PincodeVerifier {
    pub fn new(pincode: impl Into<String>) -> Self {
        Self {
            pincode: pincode.into(),
        }
    }
}

impl CredentialVerifier for PincodeVerifier {
    fn verify(&self, secret: &str) -> bool {
        !self.pincode.is_empty() && self.pincode == secret
    }
}

/// Result of a gated action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessOutcome<T> {
    Granted(T),
    /// The prompt was dismissed before a successful verification.
    Cancelled,
}

/// Runs `action` on `note`, asking for credentials first when it is locked.
///
/// `prompt` receives the number of failed attempts so far and returns the
/// entered secret, or `None` when the user dismisses the prompt.
pub fn with_unlocked<V, P, A, T>(
    note: &Note,
    verifier: &V,
    mut prompt: P,
    action: A,
) -> AccessOutcome<T>
where
    V: CredentialVerifier + ?Sized,
    P: FnMut(u32) -> Option<String>,
    A: FnOnce(&Note) -> T,
{
    if !note.locked {
        return AccessOutcome::Granted(action(note));
    }

    let mut failures = 0u32;
    loop {
        let Some(secret) = prompt(failures) else {
            info!(
                "event=note_unlock module=access status=cancelled uid={:?} failures={failures}",
                note.uid
            );
            return AccessOutcome::Cancelled;
        };
        if verifier.verify(&secret) {
            info!(
                "event=note_unlock module=access status=ok uid={:?} failures={failures}",
                note.uid
            );
            return AccessOutcome::Granted(action(note));
        }
        failures = failures.saturating_add(1);
        debug!(
            "event=note_unlock module=access status=retry uid={:?} failures={failures}",
            note.uid
        );
    }
}

/// Single-attempt variant of [`with_unlocked`] for callers that collect the
/// secret up front. A missing or wrong secret yields `Cancelled`.
pub fn with_secret<V, A, T>(
    note: &Note,
    verifier: &V,
    secret: Option<&str>,
    action: A,
) -> AccessOutcome<T>
where
    V: CredentialVerifier + ?Sized,
    A: FnOnce(&Note) -> T,
{
    let mut offered = secret.map(str::to_string);
    with_unlocked(note, verifier, move |_| offered.take(), action)
}
