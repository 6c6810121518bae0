//! Card fixtures shared by the integration tests.

#![allow(dead_code)]

use set_engine::Card;

fn cards(encodings: &[u8]) -> Vec<Card> {
    encodings.iter().map(|&e| Card::make(e)).collect()
}

/// Twelve cards in six duplicate pairs; no three of them form a set.
pub fn no_set() -> Vec<Card> {
    cards(&[57, 57, 3, 3, 19, 19, 37, 37, 1, 1, 2, 2])
}

/// Deals an 8-card market whose only set sits in slots 1, 3 and 6.
/// Slots 0, 1 and 2 are not a set.
pub fn single_set() -> Vec<Card> {
    cards(&[57, 66, 57, 39, 3, 3, 12, 19])
}

/// Two rounds of play.
///
/// The first deal shows 9 cards with the set in slots 1, 3 and 6 and leaves
/// 2 in the supply. Taking it refills slots 1 and 3, leaving a second set in
/// slots 1, 3 and 8 and an empty supply. Taking that finishes the game.
pub fn two_rounds() -> Vec<Card> {
    cards(&[57, 66, 57, 39, 3, 3, 12, 19, 66, 39, 12])
}
