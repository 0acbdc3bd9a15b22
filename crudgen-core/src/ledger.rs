//! Emission ledger.
//!
//! The ledger records which fully-qualified artifact names have been claimed
//! during one run. The same logical artifact can be requested from more than
//! one trigger site (a generic type's declaration and a field of that type
//! elsewhere); only the first claim proceeds to emission.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Run-scoped, append-only set of claimed artifact names.
///
/// `try_claim` is an atomic test-and-set, so a ledger can be shared between
/// threads behind an `Arc`.
#[derive(Debug, Default)]
pub struct EmissionLedger {
    claimed: Mutex<HashSet<String>>,
}

impl EmissionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `name`.
    ///
    /// Returns `true` the first time a name is claimed and `false` on every
    /// later call with the same name.
    pub fn try_claim(&self, name: &str) -> bool {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if claimed.contains(name) {
            return false;
        }
        claimed.insert(name.to_string())
    }

    /// Whether `name` has been claimed.
    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(name)
    }

    /// Number of claimed names.
    pub fn len(&self) -> usize {
        self.claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been claimed yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Claimed names, sorted.
    pub fn claimed(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .claimed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
