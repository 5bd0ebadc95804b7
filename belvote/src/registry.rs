//! Duplicate tracking for one verification session.

use std::collections::HashSet;
use std::sync::Mutex;

/// Tracks which payload hashes have been accepted in the current session,
/// enforcing one ballot per hash. Owned by the session and passed by
/// reference into each ballot check; independent sessions use independent
/// registries.
///
/// `accept` is an atomic check-and-insert, so ballots may be verified
/// concurrently against a shared registry.
#[derive(Debug, Default)]
pub struct BallotRegistry {
    seen: Mutex<HashSet<String>>,
}

impl BallotRegistry {
    pub fn new() -> Self {
        BallotRegistry::default()
    }

    /// Records the hash and returns true the first time it is seen;
    /// returns false on every subsequent call with the same hash.
    pub fn accept(&self, payload_hash: &str) -> bool {
        let mut seen = self
            .seen
            .lock()
            .expect("belvote: ballot registry lock poisoned");
        seen.insert(payload_hash.to_string())
    }

    pub fn len(&self) -> usize {
        self.seen
            .lock()
            .expect("belvote: ballot registry lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
