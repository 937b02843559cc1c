//! Fingerprint-based deduplication
//!
//! A run may be retried wholesale by the outer trigger, redelivering
//! records that already went out. The ledger catches that: each message
//! is fingerprinted and sent at most once per run. State is scoped to a
//! single run - construct a fresh ledger per invocation.

use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::sync::Mutex;

/// Deduplication key derived from sender, recipient and subject.
///
/// Address comparison is case-insensitive; subject text is compared
/// as-is. The body deliberately does not participate: two records with
/// the same (from, to, subject) but different bodies count as the same
/// message. Fields are hashed with an explicit unit separator so the
/// key is reproducible and field boundaries cannot collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

const FIELD_SEPARATOR: [u8; 1] = [0x1f];

impl Fingerprint {
    pub fn of(from_address: &str, to_address: &str, subject: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(from_address.to_lowercase().as_bytes());
        hasher.update(FIELD_SEPARATOR);
        hasher.update(to_address.to_lowercase().as_bytes());
        hasher.update(FIELD_SEPARATOR);
        hasher.update(subject.as_bytes());
        Self(hasher.finalize().into())
    }
}

/// Run-scoped set of fingerprints of already-dispatched messages,
/// shared across all concurrent send tasks.
#[derive(Debug, Default)]
pub struct DedupLedger {
    seen: Mutex<HashSet<Fingerprint>>,
}

impl DedupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check membership and insert if absent.
    ///
    /// Returns `true` if the fingerprint was already present (skip the
    /// send), `false` if newly inserted (proceed). Two tasks racing on
    /// the same fingerprint cannot both get `false`.
    pub fn seen_or_mark(&self, fp: Fingerprint) -> bool {
        let mut seen = self.seen.lock().expect("dedup ledger lock poisoned");
        !seen.insert(fp)
    }

    pub fn len(&self) -> usize {
        self.seen.lock().expect("dedup ledger lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
