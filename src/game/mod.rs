//! Game orchestration.
//!
//! - `Game`: the synchronous state machine. Owns supply, market and players.
//! - `GameEvent`: what a game reports to its subscribers.
//! - `SharedGame`: a `Game` behind a lock, with Tokio timers for unbans.

pub mod events;
#[allow(clippy::module_inception)]
pub mod game;
pub mod shared;

pub use events::{EventBus, EventReceiver, GameEvent};
pub use game::{Game, GameBuilder, GameSnapshot, GameStatus, TakeOutcome};
pub use shared::SharedGame;
