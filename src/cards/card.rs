//! The 81 Set cards and the set predicate.
//!
//! A card has four ternary attributes. Its encoding packs them base 3,
//! color in the lowest digit:
//!
//! ```text
//! encoding = color + 3·shape + 9·quantity + 27·opacity
//! ```
//!
//! Three cards form a set when every attribute is either the same on all
//! three cards or different on all three. With values in {0, 1, 2} that is
//! exactly "the three values sum to a multiple of 3", which is the test
//! `is_set` uses.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetError};

/// Values each attribute can take.
pub const DETAILS_SIZE: usize = 3;

/// Attributes per card.
pub const DETAILS_COUNT: usize = 4;

/// Number of distinct cards: `DETAILS_SIZE ^ DETAILS_COUNT`.
pub const COMBINATIONS: usize = 81;

/// Three cards, in the order they were named.
pub type CardSet = [Card; 3];

macro_rules! attribute {
    ($(#[$meta:meta])* $name:ident { $a:ident => $la:literal, $b:ident => $lb:literal, $c:ident => $lc:literal }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $a,
            $b,
            $c,
        }

        impl $name {
            /// Every value, in encoding order.
            pub const ALL: [$name; 3] = [$name::$a, $name::$b, $name::$c];

            /// Ternary digit of this value.
            #[must_use]
            pub const fn index(self) -> u8 {
                self as u8
            }

            /// Value for a ternary digit, wrapping modulo 3.
            #[must_use]
            pub const fn from_index(index: u8) -> Self {
                Self::ALL[(index % 3) as usize]
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(match self {
                    $name::$a => $la,
                    $name::$b => $lb,
                    $name::$c => $lc,
                })
            }
        }
    };
}

attribute!(
    /// Ink color.
    Color { Blue => "blue", Red => "red", Green => "green" }
);
attribute!(
    /// Symbol drawn on the card.
    Shape { Square => "square", Circle => "circle", Triangle => "triangle" }
);
attribute!(
    /// How many symbols are drawn.
    Quantity { One => "one", Two => "two", Three => "three" }
);
attribute!(
    /// Fill of the symbols.
    Opacity { Solid => "solid", Half => "half", Empty => "empty" }
);

/// One Set card. Cards compare by value.
///
/// ```
/// use set_engine::cards::{Card, Color, Opacity, Quantity, Shape};
///
/// let card = Card::new(Color::Red, Shape::Circle, Quantity::Two, Opacity::Empty);
/// assert_eq!(card.encoding(), 1 + 3 + 9 + 2 * 27);
/// assert_eq!(Card::make(card.encoding()), card);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Card {
    pub color: Color,
    pub shape: Shape,
    pub quantity: Quantity,
    pub opacity: Opacity,
}

impl Card {
    /// Create a card from its attributes.
    #[must_use]
    pub const fn new(color: Color, shape: Shape, quantity: Quantity, opacity: Opacity) -> Self {
        Self {
            color,
            shape,
            quantity,
            opacity,
        }
    }

    /// Decode a card, wrapping the encoding modulo 81.
    #[must_use]
    pub const fn make(encoding: u8) -> Self {
        let e = encoding % COMBINATIONS as u8;
        Self {
            color: Color::from_index(e),
            shape: Shape::from_index(e / 3),
            quantity: Quantity::from_index(e / 9),
            opacity: Opacity::from_index(e / 27),
        }
    }

    /// Decode a card, rejecting encodings outside `[0, 81)`.
    pub fn try_from_encoding(encoding: u8) -> Result<Self> {
        if (encoding as usize) < COMBINATIONS {
            Ok(Self::make(encoding))
        } else {
            Err(SetError::EncodingOutOfRange(encoding))
        }
    }

    /// The unique base-3 encoding of this card, in `[0, 81)`.
    #[must_use]
    pub const fn encoding(self) -> u8 {
        self.color.index()
            + self.shape.index() * 3
            + self.quantity.index() * 9
            + self.opacity.index() * 27
    }

    /// Attribute digits in encoding order: color, shape, quantity, opacity.
    #[must_use]
    pub const fn details(self) -> [u8; DETAILS_COUNT] {
        [
            self.color.index(),
            self.shape.index(),
            self.quantity.index(),
            self.opacity.index(),
        ]
    }

    /// Whether three cards form a set.
    ///
    /// Order-independent. Identical cards (possible with a multi-deck shoe)
    /// form a set, since every attribute is all-equal.
    #[must_use]
    pub fn is_set(a: Card, b: Card, c: Card) -> bool {
        let (a, b, c) = (a.details(), b.details(), c.details());
        (0..DETAILS_COUNT).all(|i| (a[i] + b[i] + c[i]) % DETAILS_SIZE as u8 == 0)
    }

    /// `is_set` over a `CardSet`.
    #[must_use]
    pub fn forms_set(cards: &CardSet) -> bool {
        Self::is_set(cards[0], cards[1], cards[2])
    }

    /// All 81 cards in encoding order.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..COMBINATIONS as u8).map(Card::make)
    }
}

impl TryFrom<u8> for Card {
    type Error = SetError;

    fn try_from(encoding: u8) -> Result<Self> {
        Self::try_from_encoding(encoding)
    }
}

impl From<Card> for u8 {
    fn from(card: Card) -> u8 {
        card.encoding()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}-{}-{}-{}",
            self.color, self.shape, self.quantity, self.opacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(color: Color, shape: Shape, quantity: Quantity, opacity: Opacity) -> Card {
        Card::new(color, shape, quantity, opacity)
    }

    #[test]
    fn test_encoding_extremes() {
        assert_eq!(
            card(Color::Blue, Shape::Square, Quantity::One, Opacity::Solid).encoding(),
            0
        );
        assert_eq!(
            card(Color::Green, Shape::Triangle, Quantity::Three, Opacity::Empty).encoding(),
            80
        );
    }

    #[test]
    fn test_encoding_digit_order() {
        assert_eq!(Card::make(1).color, Color::Red);
        assert_eq!(Card::make(3).shape, Shape::Circle);
        assert_eq!(Card::make(9).quantity, Quantity::Two);
        assert_eq!(Card::make(27).opacity, Opacity::Half);
    }

    #[test]
    fn test_make_wraps() {
        assert_eq!(Card::make(81), Card::make(0));
        assert_eq!(Card::make(85), Card::make(4));
        assert_eq!(Card::make(255), Card::make(255 % 81));
    }

    #[test]
    fn test_try_from_encoding_is_strict() {
        assert_eq!(Card::try_from_encoding(80).unwrap(), Card::make(80));
        assert_eq!(Card::try_from(81), Err(SetError::EncodingOutOfRange(81)));
    }

    #[test]
    fn test_all_is_in_encoding_order() {
        let cards: Vec<_> = Card::all().collect();
        assert_eq!(cards.len(), COMBINATIONS);
        for (i, c) in cards.iter().enumerate() {
            assert_eq!(c.encoding() as usize, i);
        }
    }

    #[test]
    fn test_all_different_is_set() {
        let a = card(Color::Blue, Shape::Circle, Quantity::One, Opacity::Empty);
        let b = card(Color::Green, Shape::Square, Quantity::Two, Opacity::Half);
        let c = card(Color::Red, Shape::Triangle, Quantity::Three, Opacity::Solid);
        assert!(Card::is_set(a, b, c));
    }

    #[test]
    fn test_two_equal_is_not_set() {
        let a = card(Color::Blue, Shape::Circle, Quantity::One, Opacity::Empty);
        let b = card(Color::Blue, Shape::Circle, Quantity::One, Opacity::Empty);
        let c = card(Color::Green, Shape::Circle, Quantity::One, Opacity::Empty);
        assert!(!Card::is_set(a, b, c));
    }

    #[test]
    fn test_identical_cards_are_set() {
        let a = Card::make(5);
        assert!(Card::is_set(a, a, a));
    }

    #[test]
    fn test_forms_set() {
        let set = [Card::make(0), Card::make(1), Card::make(2)];
        assert!(Card::forms_set(&set));
        let not_set = [Card::make(1), Card::make(2), Card::make(3)];
        assert!(!Card::forms_set(&not_set));
    }

    #[test]
    fn test_display() {
        let c = card(Color::Red, Shape::Triangle, Quantity::Two, Opacity::Half);
        assert_eq!(c.to_string(), "red-triangle-two-half");
    }

    #[test]
    fn test_card_serde() {
        let c = Card::make(42);
        let json = serde_json::to_string(&c).unwrap();
        let back: Card = serde_json::from_str(&json).unwrap();
        assert_eq!(c, back);
    }
}
