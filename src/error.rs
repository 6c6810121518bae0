//! Usage and contract errors.
//!
//! Only caller mistakes are errors. Game-rule outcomes (an invalid set, a
//! banned player, no hint available) are ordinary return values.

use thiserror::Error;

use crate::cards::Card;
use crate::core::PlayerId;
use crate::market::SlotIndex;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, SetError>;

/// A contract violation raised to the immediate caller.
///
/// Every operation that returns one of these has left the game untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetError {
    #[error("slot {index} is out of range (market has {len} slots)")]
    SlotOutOfRange { index: SlotIndex, len: usize },

    #[error("slot {0} is empty")]
    EmptySlot(SlotIndex),

    #[error("slot {0} was named more than once")]
    RepeatedSlot(SlotIndex),

    #[error("card {0} is not in the market")]
    CardNotInMarket(Card),

    #[error("{0} is not registered in this game")]
    UnknownPlayer(PlayerId),

    #[error("players can only be added before the game starts")]
    RegistrationClosed,

    #[error("at most 255 players are supported")]
    TooManyPlayers,

    #[error("the game has already been started")]
    AlreadyStarted,

    #[error("the game is not in progress")]
    NotInProgress,

    #[error("cards can not be loaded into a game that has started")]
    GameStarted,

    #[error("encoding {0} is outside [0, 81)")]
    EncodingOutOfRange(u8),
}
