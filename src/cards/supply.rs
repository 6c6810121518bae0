//! The face-down supply cards are dealt from.
//!
//! Built once (every encoding, `shoe` times over), shuffled once, then only
//! ever drawn from the front. Running dry is permanent.

use smallvec::SmallVec;
use std::collections::VecDeque;

use super::card::{Card, COMBINATIONS};
use crate::core::rng::{self, RandomSource};

/// Ordered, finite source of cards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Supply {
    cards: VecDeque<Card>,
}

impl Supply {
    /// Build `shoe` full decks and shuffle them with `rng`.
    ///
    /// ```
    /// use set_engine::cards::Supply;
    /// use set_engine::core::GameRng;
    ///
    /// let supply = Supply::shuffled(2, &mut GameRng::new(1));
    /// assert_eq!(supply.len(), 162);
    /// ```
    pub fn shuffled<R: RandomSource + ?Sized>(shoe: usize, rng: &mut R) -> Self {
        let mut cards: Vec<Card> = (0..COMBINATIONS * shoe)
            .map(|i| Card::make((i % COMBINATIONS) as u8))
            .collect();
        rng::shuffle(&mut cards, rng);
        Self {
            cards: cards.into(),
        }
    }

    /// Use `cards` as-is; the first card is drawn first.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Remove up to `count` cards from the front.
    ///
    /// Returns fewer than `count` when the supply is nearly exhausted.
    pub fn draw(&mut self, count: usize) -> SmallVec<[Card; 3]> {
        let count = count.min(self.cards.len());
        self.cards.drain(..count).collect()
    }

    /// Cards left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the supply has run out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remaining cards in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;

    #[test]
    fn test_shuffled_contains_each_card_once_per_deck() {
        let supply = Supply::shuffled(1, &mut GameRng::new(3));
        let mut encodings: Vec<u8> = supply.iter().map(|c| c.encoding()).collect();
        encodings.sort_unstable();
        let expected: Vec<u8> = (0..81).collect();
        assert_eq!(encodings, expected);
    }

    #[test]
    fn test_shoe_repeats_every_card() {
        let supply = Supply::shuffled(3, &mut GameRng::new(3));
        assert_eq!(supply.len(), 243);
        for card in Card::all() {
            assert_eq!(supply.iter().filter(|&&c| c == card).count(), 3);
        }
    }

    #[test]
    fn test_same_seed_same_order() {
        let a = Supply::shuffled(1, &mut GameRng::new(11));
        let b = Supply::shuffled(1, &mut GameRng::new(11));
        let c = Supply::shuffled(1, &mut GameRng::new(12));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_draw_front_to_back() {
        let mut supply = Supply::from_cards((0..5).map(Card::make));

        let first = supply.draw(3);
        assert_eq!(first.as_slice(), &[Card::make(0), Card::make(1), Card::make(2)]);

        let rest = supply.draw(3);
        assert_eq!(rest.as_slice(), &[Card::make(3), Card::make(4)]);

        assert!(supply.is_empty());
        assert!(supply.draw(3).is_empty());
    }
}
