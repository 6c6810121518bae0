//! Participants: their state and the rules that score them.

pub mod player;
pub mod policy;

pub use player::Player;
pub use policy::{ScoringPolicy, TimeoutPolicy};
