use std::collections::HashMap;

use crate::board::Grid;

use super::expectimax::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    grid: u128,
    node: Node,
    depth: i32,
}

/// Values of already searched positions, valid for a single search.
pub struct EvaluationCache {
    cache: HashMap<CacheKey, f64, fxhash::FxBuildHasher>,
    hit_counter: u64,
    lookup_counter: u64,
}

impl EvaluationCache {
    pub fn new() -> Self {
        Self {
            cache: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            hit_counter: 0,
            lookup_counter: 0,
        }
    }

    pub fn get(&mut self, grid: Grid, node: Node, depth: i32) -> Option<f64> {
        self.lookup_counter += 1;

        let key = CacheKey {
            grid: grid.as_u128(),
            node,
            depth,
        };

        let value = self.cache.get(&key).copied();
        if value.is_some() {
            self.hit_counter += 1;
        }

        value
    }

    pub fn insert(&mut self, grid: Grid, node: Node, depth: i32, value: f64) {
        let key = CacheKey {
            grid: grid.as_u128(),
            node,
            depth,
        };

        self.cache.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.cache.clear();
        self.hit_counter = 0;
        self.lookup_counter = 0;
    }

    pub fn hit_rate(&self) -> f64 {
        if self.lookup_counter == 0 {
            return 0.0;
        }

        self.hit_counter as f64 / self.lookup_counter as f64
    }

    pub fn hit_counter(&self) -> u64 {
        self.hit_counter
    }

    pub fn lookup_counter(&self) -> u64 {
        self.lookup_counter
    }
}

impl Default for EvaluationCache {
    fn default() -> Self {
        Self::new()
    }
}
