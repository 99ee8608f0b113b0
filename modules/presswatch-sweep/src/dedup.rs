//! Per-sweep, per-topic URL claim set.
//!
//! Seeded with the topic's already-persisted URLs and consulted with atomic
//! check-and-insert before any scrape or insert. Scoped to one topic-sweep
//! and passed in explicitly — no global state, so topics can run in parallel
//! and tests stay hermetic.

use std::collections::HashSet;
use std::sync::Mutex;

pub struct SweepDedup {
    seen: Mutex<HashSet<String>>,
}

impl SweepDedup {
    pub fn new(known: HashSet<String>) -> Self {
        Self {
            seen: Mutex::new(known),
        }
    }

    /// Atomically claim a URL. Returns true if this caller is the first to
    /// see it this sweep (and it was not already persisted); a false return
    /// means skip — do not scrape, do not insert.
    pub fn claim(&self, url: &str) -> bool {
        self.seen
            .lock()
            .expect("dedup set lock poisoned")
            .insert(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_claim_wins_second_loses() {
        let dedup = SweepDedup::new(HashSet::new());
        assert!(dedup.claim("https://example.com/a"));
        assert!(!dedup.claim("https://example.com/a"));
    }

    #[test]
    fn known_urls_are_preclaimed() {
        let known: HashSet<String> = ["https://example.com/old".to_string()].into();
        let dedup = SweepDedup::new(known);
        assert!(!dedup.claim("https://example.com/old"));
        assert!(dedup.claim("https://example.com/new"));
    }

    #[test]
    fn concurrent_claims_yield_exactly_one_winner() {
        use std::sync::Arc;

        let dedup = Arc::new(SweepDedup::new(HashSet::new()));
        let mut handles = Vec::new();
        for _ in 0..16 {
            let dedup = Arc::clone(&dedup);
            handles.push(std::thread::spawn(move || {
                dedup.claim("https://example.com/contested")
            }));
        }
        let results: Vec<bool> = handles
            .into_iter()
            .map(|h| h.join().expect("claim thread panicked"))
            .collect();
        assert_eq!(results.iter().filter(|&&won| won).count(), 1);
    }
}
