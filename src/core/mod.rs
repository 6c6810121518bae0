//! Core engine types: players, RNG, clocks, configuration.
//!
//! These are the building blocks shared by the market, the players and the
//! game orchestrator. None of them know the rules of Set.

pub mod clock;
pub mod config;
pub mod player;
pub mod rng;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::GameConfig;
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, RandomSource};
