//! Deduplication of phase-completion handling.
//!
//! Expiry handling used to be deferred in the training screens to let other
//! state settle, which meant one expiry could be delivered more than once
//! for the same second. The guard makes completion handling idempotent: a
//! signature of (phase, series index) is recorded when handled, and a
//! repeat of the same signature is refused.

use serde::{Deserialize, Serialize};

use crate::exercise::Phase;

/// Dedup key for one phase completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub phase: Phase,
    pub series_index: u32,
}

impl Signature {
    pub fn new(phase: Phase, series_index: u32) -> Self {
        Self {
            phase,
            series_index,
        }
    }
}

/// Records the last handled completion signature and refuses repeats.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransitionGuard {
    last_handled: Option<Signature>,
}

impl TransitionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a completion with this signature may be handled.
    ///
    /// Returns `false` if it equals the last handled signature — the caller
    /// must then skip every side effect for this expiry. Otherwise the
    /// signature is recorded and handling may proceed.
    pub fn should_handle(&mut self, signature: Signature) -> bool {
        if self.last_handled == Some(signature) {
            return false;
        }
        self.last_handled = Some(signature);
        true
    }

    /// Forget the recorded signature. Called on a full reset to `ready`, so
    /// a re-run of the exercise can handle the same signatures again.
    pub fn clear(&mut self) {
        self.last_handled = None;
    }

    pub fn last_handled(&self) -> Option<Signature> {
        self.last_handled
    }
}
