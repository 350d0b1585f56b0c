use std::collections::{HashMap, VecDeque};

use crate::dataset::PointId;
use crate::search::Route;

/// Default number of cached route outcomes.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Cache hit/miss counters, exposed for instrumentation and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

type CacheKey = (PointId, PointId);

/// Size-capped LRU memoization of route search outcomes.
///
/// Keys are normalized to `(min, max)` since the graph is undirected: the
/// route for (B, A) is the reverse of (A, B) with the same distance, so one
/// entry serves both directions. Negative outcomes ("no route") are cached
/// too, as `None`. The cache never invalidates individual entries; the
/// facade discards it wholesale when the graph is rebuilt.
#[derive(Debug, Default)]
pub struct RouteCache {
    capacity: usize,
    entries: HashMap<CacheKey, Option<Route>>,
    recency: VecDeque<CacheKey>,
    hits: u64,
    misses: u64,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
            recency: VecDeque::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached outcome for the pair, oriented from `start` to `goal`.
    ///
    /// The outer `Option` is hit-or-miss; the inner one distinguishes a
    /// cached route from a cached "no route" result.
    pub fn get(&mut self, start: PointId, goal: PointId) -> Option<Option<Route>> {
        let key = normalize(start, goal);
        match self.entries.get(&key) {
            Some(outcome) => {
                let outcome = outcome.clone();
                self.hits += 1;
                self.touch(key);
                if start <= goal {
                    Some(outcome)
                } else {
                    Some(outcome.map(|route| route.reversed()))
                }
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Record a search outcome for the pair, evicting the least recently
    /// used entry when full.
    pub fn insert(&mut self, start: PointId, goal: PointId, outcome: Option<Route>) {
        let key = normalize(start, goal);
        let canonical = if start <= goal {
            outcome
        } else {
            outcome.map(|route| route.reversed())
        };

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(oldest) = self.recency.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        self.entries.insert(key, canonical);
        self.touch(key);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }

    fn touch(&mut self, key: CacheKey) {
        self.recency.retain(|existing| *existing != key);
        self.recency.push_back(key);
    }
}

fn normalize(start: PointId, goal: PointId) -> CacheKey {
    if start <= goal {
        (start, goal)
    } else {
        (goal, start)
    }
}
