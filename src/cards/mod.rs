//! Cards and the supply they are dealt from.
//!
//! - `Card`: immutable value, one of 81 attribute combinations.
//! - `Supply`: shuffled deck (or shoe of decks), drawn front to back.

pub mod card;
pub mod supply;

pub use card::{
    Card, CardSet, Color, Opacity, Quantity, Shape, COMBINATIONS, DETAILS_COUNT, DETAILS_SIZE,
};
pub use supply::Supply;
