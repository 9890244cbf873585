//! Bounded least-recently-used cache for repeated identical requests.
//!
//! Sits in front of the engine at the orchestration layer, keyed by the
//! canonical serialization of the constraints. At capacity the
//! least-recently-accessed entry is evicted; every successful lookup
//! promotes its entry to most-recently-used.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;

use crate::engine::assemble::Fingerprint;
use crate::engine::constraints::FingerprintConstraints;

#[derive(Debug)]
pub struct SampleCache {
    capacity: usize,
    entries: FxHashMap<String, Fingerprint>,
    /// Access order, least recent first.
    order: VecDeque<String>,
}

impl SampleCache {
    /// A zero capacity would make every insert evict itself; clamp to 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: FxHashMap::default(),
            order: VecDeque::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a cached fingerprint, promoting the entry on hit.
    pub fn get(&mut self, constraints: &FingerprintConstraints) -> Option<Fingerprint> {
        let key = constraints.canonical_key();
        let hit = self.entries.get(&key).cloned()?;
        self.promote(&key);
        Some(hit)
    }

    /// Stores a fingerprint, evicting the least-recently-used entry when
    /// at capacity.
    pub fn insert(&mut self, constraints: &FingerprintConstraints, fingerprint: Fingerprint) {
        let key = constraints.canonical_key();
        if self.entries.insert(key.clone(), fingerprint).is_some() {
            self.promote(&key);
            return;
        }
        self.order.push_back(key);
        if self.entries.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.entries.remove(&evicted);
            }
        }
    }

    fn promote(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            let key = self.order.remove(pos).expect("position just found");
            self.order.push_back(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FingerprintEngine;

    fn fingerprint(seed: u64) -> Fingerprint {
        let mut engine = FingerprintEngine::from_seed(seed).unwrap();
        engine.sample(&FingerprintConstraints::default()).unwrap()
    }

    #[test]
    fn hit_returns_stored_fingerprint() {
        let mut cache = SampleCache::new(4);
        let constraints = FingerprintConstraints::new().device_type("desktop");
        assert!(cache.get(&constraints).is_none());
        let fp = fingerprint(1);
        cache.insert(&constraints, fp.clone());
        assert_eq!(cache.get(&constraints).unwrap().content_hash, fp.content_hash);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = SampleCache::new(2);
        let a = FingerprintConstraints::new().device_type("desktop");
        let b = FingerprintConstraints::new().device_type("mobile");
        let c = FingerprintConstraints::new().device_type("tablet");
        cache.insert(&a, fingerprint(1));
        cache.insert(&b, fingerprint(2));
        // Touch `a` so `b` becomes least recently used.
        assert!(cache.get(&a).is_some());
        cache.insert(&c, fingerprint(3));
        assert!(cache.get(&b).is_none());
        assert!(cache.get(&a).is_some());
        assert!(cache.get(&c).is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn reinsert_same_key_keeps_single_entry() {
        let mut cache = SampleCache::new(2);
        let a = FingerprintConstraints::new().device_type("desktop");
        cache.insert(&a, fingerprint(1));
        cache.insert(&a, fingerprint(2));
        assert_eq!(cache.len(), 1);
    }
}
