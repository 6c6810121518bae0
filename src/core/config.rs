//! Game configuration.
//!
//! Numeric knobs of a game, set at construction with builder methods.
//! Behavioural policies (scoring, ban timeouts) are closures and live in
//! `crate::players::policy`; the RNG and clock are injected through
//! `crate::game::GameBuilder`.

use serde::{Deserialize, Serialize};

use crate::cards::COMBINATIONS;

/// Complete numeric configuration of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of full 81-card decks combined into the supply.
    pub shoe: usize,

    /// Present cards the market must show before it counts as full.
    pub market_minimum: usize,

    /// Cards drawn from the supply per refill step.
    pub market_increase: usize,

    /// Seed for the default `GameRng`.
    pub seed: u64,

    /// Re-seed a player's ban timeout (policy applied to zero) after each
    /// successful take. When false, timeouts only ever move on bans.
    pub reset_timeout_on_take: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shoe: 1,
            market_minimum: 9,
            market_increase: 3,
            seed: 0,
            reset_timeout_on_take: false,
        }
    }
}

impl GameConfig {
    /// Create the standard configuration: one deck, 9-card market grown
    /// 3 cards at a time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of decks in the shoe.
    #[must_use]
    pub fn with_shoe(mut self, shoe: usize) -> Self {
        assert!(shoe > 0, "Shoe must hold at least 1 deck");
        self.shoe = shoe;
        self
    }

    /// Set the minimum market display size.
    #[must_use]
    pub fn with_market_minimum(mut self, minimum: usize) -> Self {
        self.market_minimum = minimum;
        self
    }

    /// Set the refill increment.
    #[must_use]
    pub fn with_market_increase(mut self, increase: usize) -> Self {
        assert!(increase > 0, "Market must grow by at least 1 card");
        self.market_increase = increase;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reset ban timeouts after every successful take.
    #[must_use]
    pub fn reset_timeout_on_take(mut self) -> Self {
        self.reset_timeout_on_take = true;
        self
    }

    /// Total cards in a freshly built supply.
    #[must_use]
    pub fn supply_size(&self) -> usize {
        COMBINATIONS * self.shoe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GameConfig::new();

        assert_eq!(config.shoe, 1);
        assert_eq!(config.market_minimum, 9);
        assert_eq!(config.market_increase, 3);
        assert!(!config.reset_timeout_on_take);
        assert_eq!(config.supply_size(), 81);
    }

    #[test]
    fn test_builder() {
        let config = GameConfig::new()
            .with_shoe(2)
            .with_market_minimum(12)
            .with_market_increase(4)
            .with_seed(99)
            .reset_timeout_on_take();

        assert_eq!(config.supply_size(), 162);
        assert_eq!(config.market_minimum, 12);
        assert_eq!(config.market_increase, 4);
        assert_eq!(config.seed, 99);
        assert!(config.reset_timeout_on_take);
    }

    #[test]
    #[should_panic(expected = "Shoe must hold at least 1 deck")]
    fn test_zero_shoe() {
        let _ = GameConfig::new().with_shoe(0);
    }

    #[test]
    #[should_panic(expected = "Market must grow by at least 1 card")]
    fn test_zero_increase() {
        let _ = GameConfig::new().with_market_increase(0);
    }

    #[test]
    fn test_config_serde() {
        let config = GameConfig::new().with_seed(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
