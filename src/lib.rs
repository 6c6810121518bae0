//! # set-engine
//!
//! A rules engine for the real-time card game Set.
//!
//! ## Design Principles
//!
//! 1. **Cards Are Values**: A card is four attributes packed into one
//!    encoding in `[0, 81)`. Equality, hashing and the set rule all work on
//!    values, so a shoe of several decks needs no card identities.
//!
//! 2. **Stable Slots**: Taking a set empties three market slots and moves
//!    nothing else. A slot index keeps naming the same card until it leaves.
//!
//! 3. **Injected Effects**: Randomness (`RandomSource`), time (`Clock`),
//!    scoring and ban escalation are all supplied by the host, so every game
//!    can be replayed exactly in tests.
//!
//! ## Architecture
//!
//! - **Synchronous Core**: `Game` is a plain state machine. Every command
//!   either fails with a `SetError` and changes nothing, or applies fully.
//!
//! - **Persistent Data Structures**: Market slots and taken sets use `im-rs`,
//!   so snapshots share structure with the live game.
//!
//! - **Events Out**: Observers subscribe to a Tokio channel of `GameEvent`s.
//!   `SharedGame` adds a lock and timers that lift bans on schedule.
//!
//! ## Modules
//!
//! - `core`: Player ids, RNG, clocks, configuration
//! - `cards`: Card encoding, the set rule, the supply
//! - `market`: Face-up slots and the cached solution
//! - `players`: Player state, scoring and timeout policies
//! - `game`: The orchestrator, its events and the shared wrapper
//! - `error`: Contract violations
//!
//! ## Example
//!
//! ```
//! use set_engine::{Game, GameConfig};
//!
//! let mut game = Game::new(GameConfig::new().with_seed(3));
//! let ada = game.add_player("ada").unwrap();
//! game.start().unwrap();
//!
//! let slots = game.market().solution().unwrap();
//! assert!(game.take_set(ada, slots).unwrap());
//! assert_eq!(game.player(ada).unwrap().score(), 1);
//! ```

pub mod cards;
pub mod core;
pub mod error;
pub mod game;
pub mod market;
pub mod players;

// Re-export commonly used types
pub use crate::core::{
    Clock, GameConfig, GameRng, ManualClock, PlayerId, PlayerMap, RandomSource, SystemClock,
    TokioClock,
};

pub use crate::cards::{Card, CardSet, Color, Opacity, Quantity, Shape, Supply, COMBINATIONS};

pub use crate::market::{Market, SlotIndex};

pub use crate::players::{Player, ScoringPolicy, TimeoutPolicy};

pub use crate::game::{
    EventReceiver, Game, GameBuilder, GameEvent, GameSnapshot, GameStatus, SharedGame, TakeOutcome,
};

pub use crate::error::{Result, SetError};
