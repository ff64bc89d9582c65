//! Seeded random streams.
//!
//! Three consumers draw from this type: setup takes piece tags from a
//! `"piece-tags"` stream, the digest keys a fresh generator on every call,
//! and search samples moves and hidden layouts from a generator the caller
//! owns. All of them are ChaCha8, so one seed fixes every draw.
//!
//! ```
//! use plateau_engine::core::GameRng;
//!
//! let mut tags = GameRng::new(42).for_context("piece-tags");
//! let mut again = GameRng::new(42).for_context("piece-tags");
//! assert_eq!(tags.next_u64(), again.next_u64());
//! ```

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Deterministic generator for setup, digests and search sampling.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// A separate stream keyed by `context`. The same seed and context
    /// always give the same stream, so adding a consumer never shifts the
    /// draws another consumer sees.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = FxHasher::default();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform pick from `slice`.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Index drawn with probability proportional to its weight. `None` when
    /// there is nothing with positive weight.
    pub fn choose_weighted(&mut self, weights: &[f32]) -> Option<usize> {
        let dist = WeightedIndex::new(weights).ok()?;
        Some(dist.sample(&mut self.inner))
    }

    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Resume a generator exactly where `state` was taken.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Position of a `GameRng` in its stream, for checkpointing a search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position.
    pub word_pos: u128,
}
