//! Injected randomness.
//!
//! The engine only ever asks one question of a random source: "give me an
//! integer in `[0, max)`". That question is the `RandomSource` trait. Deck
//! shuffling and hint selection both go through it, so a game is fully
//! reproducible from its seed, and tests can script the answers with a
//! closure.
//!
//! ```
//! use set_engine::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.below(81), b.below(81));
//!
//! // Any FnMut(usize) -> usize is a random source too.
//! let mut always_zero = |_max: usize| 0;
//! assert_eq!(always_zero.below(10), 0);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of uniformly distributed integers.
pub trait RandomSource {
    /// Return an integer in `[0, max)`. `max` is always at least 1.
    fn below(&mut self, max: usize) -> usize;
}

impl<F> RandomSource for F
where
    F: FnMut(usize) -> usize,
{
    fn below(&mut self, max: usize) -> usize {
        self(max)
    }
}

/// Deterministic RNG backed by ChaCha8.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Stream fully determined by `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this RNG was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn below(&mut self, max: usize) -> usize {
        self.inner.gen_range(0..max)
    }
}

/// Unbiased in-place Fisher-Yates shuffle driven by `rng`.
///
/// Walks from the back of the slice, swapping each position with a draw from
/// the still-unshuffled prefix.
///
/// # Panics
///
/// Panics if `rng` returns a value outside `[0, max)`.
pub fn shuffle<T, R: RandomSource + ?Sized>(items: &mut [T], rng: &mut R) {
    let mut position = items.len();
    while position > 0 {
        let pick = rng.below(position);
        assert!(
            pick < position,
            "random source returned {pick}, expected a value below {position}"
        );
        position -= 1;
        items.swap(position, pick);
    }
}

/// Pick one element uniformly at random, or `None` for an empty slice.
pub fn choose<'a, T, R: RandomSource + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.below(items.len()))
}
