//! Slot arena for the face-up cards.
//!
//! ## Slots
//!
//! The market is a row of slots, each holding a card or empty. Taking a set
//! empties its three slots and nothing else moves, so "slot k" keeps naming
//! the same card until that card leaves. New cards go into the lowest empty
//! slots first and are appended once no gaps remain. `clean_up` is the only
//! operation that shifts cards.
//!
//! ## Solution cache
//!
//! `solution()` scans present cards for a set in ascending slot order
//! (`i < j < k`, first hit wins). The scan is O(n³), so its result is cached
//! until the next `push_cards`, `pop_set` or `clean_up`.

use im::Vector;
use std::cell::OnceCell;

use crate::cards::{Card, CardSet};
use crate::error::{Result, SetError};

/// Position of a slot in the market.
pub type SlotIndex = usize;

/// Default number of present cards the market must show.
pub const MARKET_MINIMUM: usize = 9;

/// Default number of cards added per refill step.
pub const MARKET_INCREASE: usize = 3;

/// The shared pool of face-up cards.
#[derive(Clone, Debug)]
pub struct Market {
    slots: Vector<Option<Card>>,
    minimum: usize,
    solution: OnceCell<Option<[SlotIndex; 3]>>,
}

impl Default for Market {
    fn default() -> Self {
        Self::new()
    }
}

impl Market {
    /// Create an empty market with the standard 9-card minimum.
    #[must_use]
    pub fn new() -> Self {
        Self::with_minimum(MARKET_MINIMUM)
    }

    /// Create an empty market that counts as full from `minimum` cards.
    #[must_use]
    pub fn with_minimum(minimum: usize) -> Self {
        Self {
            slots: Vector::new(),
            minimum,
            solution: OnceCell::new(),
        }
    }

    // === Queries ===

    /// All slots, including gaps.
    #[must_use]
    pub fn slots(&self) -> &Vector<Option<Card>> {
        &self.slots
    }

    /// Number of slots, including gaps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the market has no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding a card.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// The card in a slot, if the slot exists and is occupied.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<Card> {
        self.slots.get(slot).copied().flatten()
    }

    /// Occupied slots with their cards, in slot order.
    pub fn cards(&self) -> impl Iterator<Item = (SlotIndex, Card)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|card| (i, card)))
    }

    /// Minimum present cards for the market to count as full.
    #[must_use]
    pub fn minimum(&self) -> usize {
        self.minimum
    }

    /// Slots of any one set among the present cards.
    #[must_use]
    pub fn solution(&self) -> Option<[SlotIndex; 3]> {
        *self.solution.get_or_init(|| self.scan())
    }

    /// Cards of the current solution.
    #[must_use]
    pub fn solution_cards(&self) -> Option<CardSet> {
        let [a, b, c] = self.solution()?;
        Some([self.get(a)?, self.get(b)?, self.get(c)?])
    }

    /// Whether any set can be made.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.solution().is_some()
    }

    /// Playable and showing at least the minimum number of cards.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.is_playable() && self.present_count() >= self.minimum
    }

    /// Cards in three distinct occupied slots.
    ///
    /// Fails without side effects if a slot is out of range, empty, or named
    /// twice.
    pub fn check(&self, slots: [SlotIndex; 3]) -> Result<CardSet> {
        for (i, &slot) in slots.iter().enumerate() {
            if slots[..i].contains(&slot) {
                return Err(SetError::RepeatedSlot(slot));
            }
        }

        let mut cards = [Card::make(0); 3];
        for (card, &slot) in cards.iter_mut().zip(slots.iter()) {
            *card = match self.slots.get(slot) {
                None => {
                    return Err(SetError::SlotOutOfRange {
                        index: slot,
                        len: self.slots.len(),
                    })
                }
                Some(None) => return Err(SetError::EmptySlot(slot)),
                Some(Some(card)) => *card,
            };
        }
        Ok(cards)
    }

    /// Resolve card values to distinct occupied slots.
    ///
    /// Duplicates (multi-deck shoes) resolve to the lowest unused slot.
    pub fn locate(&self, cards: &CardSet) -> Result<[SlotIndex; 3]> {
        let mut found: [SlotIndex; 3] = [0; 3];
        for (i, card) in cards.iter().enumerate() {
            found[i] = self
                .cards()
                .find(|(slot, c)| c == card && !found[..i].contains(slot))
                .map(|(slot, _)| slot)
                .ok_or(SetError::CardNotInMarket(*card))?;
        }
        Ok(found)
    }

    // === Mutation ===

    /// Add cards, filling the lowest empty slots first, then appending.
    pub fn push_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        let mut gap = 0;
        for card in cards {
            while gap < self.slots.len() && self.slots[gap].is_some() {
                gap += 1;
            }
            if gap < self.slots.len() {
                self.slots.set(gap, Some(card));
            } else {
                self.slots.push_back(Some(card));
            }
        }
        self.invalidate();
    }

    /// Empty three slots, returning their cards in the order named.
    ///
    /// Other slots keep their positions. Fails without side effects under the
    /// same conditions as `check`.
    pub fn pop_set(&mut self, slots: [SlotIndex; 3]) -> Result<CardSet> {
        let cards = self.check(slots)?;
        for slot in slots {
            self.slots.set(slot, None);
        }
        self.invalidate();
        Ok(cards)
    }

    /// Drop every gap, shifting later cards down.
    pub fn clean_up(&mut self) {
        self.slots = self.slots.iter().filter(|slot| slot.is_some()).copied().collect();
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.solution = OnceCell::new();
    }

    fn scan(&self) -> Option<[SlotIndex; 3]> {
        let present: Vec<(SlotIndex, Card)> = self.cards().collect();
        let n = present.len();
        for i in 0..n {
            for j in i + 1..n {
                for k in j + 1..n {
                    if Card::is_set(present[i].1, present[j].1, present[k].1) {
                        return Some([present[i].0, present[j].0, present[k].0]);
                    }
                }
            }
        }
        None
    }
}
