//! Explicit memoization for the expensive pipeline stages.
//!
//! Keys are content hashes of the raw input bytes, so an unchanged dataset
//! is never re-parsed or re-geocoded within a session, and any edit to the
//! input automatically misses. Lifecycle is manual: [`AnalysisCache::invalidate`]
//! and [`AnalysisCache::clear`].

use std::collections::HashMap;
use std::sync::Arc;
use xxhash_rust::xxh64::xxh64;

use crate::listing::Listing;

/// Content key for a raw dataset.
pub fn dataset_key(bytes: &[u8]) -> u64 {
    xxh64(bytes, 0)
}

/// Keyed slots for the loaded and the enriched listing collections.
#[derive(Debug, Default)]
pub struct AnalysisCache {
    loaded: HashMap<u64, Arc<Vec<Listing>>>,
    enriched: HashMap<u64, Arc<Vec<Listing>>>,
}

impl AnalysisCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self, key: u64) -> Option<Arc<Vec<Listing>>> {
        self.loaded.get(&key).cloned()
    }

    pub fn store_loaded(&mut self, key: u64, listings: Arc<Vec<Listing>>) {
        self.loaded.insert(key, listings);
    }

    pub fn enriched(&self, key: u64) -> Option<Arc<Vec<Listing>>> {
        self.enriched.get(&key).cloned()
    }

    pub fn store_enriched(&mut self, key: u64, listings: Arc<Vec<Listing>>) {
        self.enriched.insert(key, listings);
    }

    /// Drops both slots for one dataset, forcing recompute on next access.
    pub fn invalidate(&mut self, key: u64) {
        self.loaded.remove(&key);
        self.enriched.remove(&key);
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
        self.enriched.clear();
    }
}
