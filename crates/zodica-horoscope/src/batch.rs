//! Batch generation bookkeeping
//!
//! A batch covers all twelve signs for one date bucket. The author ledger
//! tracks how often each quote author has been credited within the batch
//! so the coordinator can spread attributions around. The cap is a
//! best-effort content-quality heuristic: when the retry budget runs out
//! the over-cap record is kept, because twelve cards with one duplicate
//! author beat eleven cards and an error.

use std::collections::{BTreeMap, HashMap};

use zodica_core::{Horoscope, Sign};

/// Per-sign outcome of one batch invocation
///
/// Every sign lands in exactly one of the two maps; a failed generation
/// never aborts the rest of the batch.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: BTreeMap<Sign, Horoscope>,
    pub errors: BTreeMap<Sign, String>,
}

impl BatchOutcome {
    /// Signs that produced a record, in zodiac order
    pub fn generated_signs(&self) -> Vec<Sign> {
        self.results.keys().copied().collect()
    }
}

/// Quote-author usage counts for one batch invocation
///
/// Scoped strictly to a single batch: reset on every call, never shared
/// across concurrent invocations.
#[derive(Debug)]
pub(crate) struct AuthorLedger {
    counts: HashMap<String, u32>,
    cap: u32,
}

impl AuthorLedger {
    pub(crate) fn new(cap: u32) -> Self {
        Self {
            counts: HashMap::new(),
            cap,
        }
    }

    /// Count one use of `author` and return the new total
    pub(crate) fn record(&mut self, author: &str) -> u32 {
        let count = self.counts.entry(author.to_owned()).or_insert(0);
        *count += 1;
        *count
    }

    /// Whether `author` is now credited more often than the cap allows
    pub(crate) fn exceeds_cap(&self, author: &str) -> bool {
        self.count(author) > self.cap
    }

    /// Whether a retry result crediting `author` is acceptable as a
    /// replacement for `over_used`
    pub(crate) fn accepts_replacement(&self, author: &str, over_used: &str) -> bool {
        author != over_used && self.count(author) < self.cap
    }

    /// Swap one recorded use of `old` for a use of `new`
    pub(crate) fn replace(&mut self, old: &str, new: &str) {
        if let Some(count) = self.counts.get_mut(old) {
            *count = count.saturating_sub(1);
        }
        self.record(new);
    }

    pub(crate) fn count(&self, author: &str) -> u32 {
        self.counts.get(author).copied().unwrap_or(0)
    }

    /// Highest usage count across all authors
    #[cfg(test)]
    pub(crate) fn max_count(&self) -> u32 {
        self.counts.values().copied().max().unwrap_or(0)
    }
}
