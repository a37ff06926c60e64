//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Zi.
//! The Zi project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! # Random Source Module
//!
//! Every random decision made by ZiAug (which composite child to use, which
//! character to substitute, which accepted candidate to continue from, the
//! final shuffle) draws from a [`ZiRng`] handle that is passed in explicitly.
//! Clones share one underlying stream, so a recipe and all of its
//! transformations stay reproducible under a single seed.
//!
//! ```rust
//! use ziaug::rng::ZiRng;
//!
//! let rng = ZiRng::seeded(42);
//! let mut items = vec![1, 2, 3, 4];
//! rng.shuffle(&mut items);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::errors::{Result, ZiError};

/// Shared, seedable pseudo-random source.
#[derive(Clone)]
pub struct ZiRng {
    inner: Arc<Mutex<StdRng>>,
}

impl fmt::Debug for ZiRng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZiRng").finish_non_exhaustive()
    }
}

impl Default for ZiRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ZiRng {
    /// Deterministic source for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            inner: Arc::new(Mutex::new(StdRng::from_entropy())),
        }
    }

    /// Builds a seeded source when a seed is given, an entropy-backed one otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StdRng> {
        // A panic while holding the lock cannot leave StdRng in an invalid state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Uniform index in `0..upper`. Returns 0 when `upper` is 0.
    pub fn index(&self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        self.lock().gen_range(0..upper)
    }

    /// Uniform integer in the inclusive range.
    pub fn range_inclusive(&self, low: i64, high: i64) -> i64 {
        if low >= high {
            return low;
        }
        self.lock().gen_range(low..=high)
    }

    /// Uniform float in `[low, high)`.
    pub fn range_f64(&self, low: f64, high: f64) -> f64 {
        if low >= high {
            return low;
        }
        self.lock().gen_range(low..high)
    }

    pub fn choose<'a, T>(&self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut *self.lock())
    }

    pub fn shuffle<T>(&self, items: &mut [T]) {
        items.shuffle(&mut *self.lock());
    }

    /// Draws `amount` distinct elements (fewer when the slice is shorter).
    pub fn sample<T: Clone>(&self, items: &[T], amount: usize) -> Vec<T> {
        let mut guard = self.lock();
        items
            .choose_multiple(&mut *guard, amount.min(items.len()))
            .cloned()
            .collect()
    }

    /// Orders `0..weights.len()` by successive weighted draws without replacement.
    pub fn weighted_order(&self, weights: &[f64]) -> Result<Vec<usize>> {
        let mut remaining: Vec<usize> = (0..weights.len()).collect();
        let mut order = Vec::with_capacity(weights.len());
        let mut guard = self.lock();

        while !remaining.is_empty() {
            let current: Vec<f64> = remaining.iter().map(|&i| weights[i]).collect();
            let dist = WeightedIndex::new(&current)
                .map_err(|err| ZiError::validation(format!("invalid weights: {err}")))?;
            let picked = dist.sample(&mut *guard);
            order.push(remaining.remove(picked));
        }

        Ok(order)
    }
}
