//! The game orchestrator.
//!
//! ## Lifecycle
//!
//! `NotStarted` → `start()` → `InProgress` → `Finished`. Players register and
//! cards load only before the start. The game finishes by itself as soon as
//! the supply is empty and the market holds no set, so `Finished` is reached
//! at most once and never left.
//!
//! ## Claims
//!
//! `attempt` is the one entry point for claiming a set. It validates the
//! slots, lifts any ban that has run out, ignores players still banned, and
//! then either takes the set (score, refill, maybe finish) or bans the
//! player for their current timeout.
//!
//! ## Time
//!
//! Bans end at a reading of the injected `Clock`. Expired bans are lifted
//! lazily before each attempt and by `expire_bans`, which `SharedGame` calls
//! from timers. Playing time runs from `start()` to the finish, excluding
//! paused stretches.

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::events::{EventBus, EventReceiver, GameEvent};
use crate::cards::{Card, CardSet, Supply};
use crate::core::rng::{self, GameRng, RandomSource};
use crate::core::{Clock, GameConfig, PlayerId, PlayerMap, SystemClock};
use crate::error::{Result, SetError};
use crate::market::{Market, SlotIndex};
use crate::players::{Player, ScoringPolicy, TimeoutPolicy};

/// Where a game is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Finished,
}

/// What happened to a claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakeOutcome {
    /// The cards formed a set and now belong to the player.
    Taken(CardSet),
    /// Not a set; the player sits out for `timeout`.
    Banned { timeout: Duration },
    /// The player was already banned. Nothing changed.
    Ignored,
}

impl TakeOutcome {
    #[must_use]
    pub fn is_taken(&self) -> bool {
        matches!(self, TakeOutcome::Taken(_))
    }
}

/// Point-in-time view of a game, cheap to take and serializable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub status: GameStatus,
    pub market: Vector<Option<Card>>,
    pub players: Vector<Player>,
    pub supply_remaining: usize,
    pub elapsed: Duration,
}

/// Builder for a `Game` with injected rules, randomness and time.
///
/// ```
/// use std::time::Duration;
/// use set_engine::core::{GameConfig, ManualClock};
/// use set_engine::game::Game;
/// use set_engine::players::TimeoutPolicy;
///
/// let clock = ManualClock::new();
/// let game = Game::builder()
///     .config(GameConfig::new().with_seed(7))
///     .timeouts(TimeoutPolicy::doubling(Duration::from_secs(1)))
///     .clock(clock.clone())
///     .build();
/// assert_eq!(game.supply_remaining(), 81);
/// ```
#[derive(Default)]
pub struct GameBuilder {
    config: GameConfig,
    scoring: ScoringPolicy,
    timeouts: TimeoutPolicy,
    rng: Option<Box<dyn RandomSource + Send>>,
    clock: Option<Arc<dyn Clock>>,
    cards: Option<Vec<Card>>,
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn timeouts(mut self, timeouts: TimeoutPolicy) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Random source for shuffling and hints. Defaults to `GameRng` seeded
    /// from the config.
    pub fn rng(mut self, rng: impl RandomSource + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Clock for bans and playing time. Defaults to `SystemClock`.
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Deal exactly these cards, first card first, instead of shuffled decks.
    pub fn cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards = Some(cards.into_iter().collect());
        self
    }

    pub fn build(self) -> Game {
        let mut rng: Box<dyn RandomSource + Send> = match self.rng {
            Some(rng) => rng,
            None => Box::new(GameRng::new(self.config.seed)),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock::new()),
        };
        let supply = match self.cards {
            Some(cards) => Supply::from_cards(cards),
            None => Supply::shuffled(self.config.shoe, &mut *rng),
        };

        Game {
            market: Market::with_minimum(self.config.market_minimum),
            supply,
            players: PlayerMap::new(),
            names: FxHashMap::default(),
            status: GameStatus::NotStarted,
            scoring: self.scoring,
            timeouts: self.timeouts,
            rng,
            clock,
            events: EventBus::new(),
            played: Duration::ZERO,
            running_since: None,
            paused: false,
            config: self.config,
        }
    }
}

/// A game of Set: supply, market, players and the rules that tie them.
pub struct Game {
    config: GameConfig,
    supply: Supply,
    market: Market,
    players: PlayerMap<Player>,
    names: FxHashMap<String, PlayerId>,
    status: GameStatus,
    scoring: ScoringPolicy,
    timeouts: TimeoutPolicy,
    rng: Box<dyn RandomSource + Send>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    /// Playing time banked before the current running stretch.
    played: Duration,
    /// Clock reading when the current running stretch began.
    running_since: Option<Duration>,
    paused: bool,
}

impl Game {
    /// Game with default rules, a shuffled supply and the system clock.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        GameBuilder::new().config(config).build()
    }

    #[must_use]
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&mut self) -> EventReceiver {
        self.events.subscribe()
    }

    // === Setup ===

    /// Register a player, or return the id already registered under `name`.
    pub fn add_player(&mut self, name: impl Into<String>) -> Result<PlayerId> {
        if self.status != GameStatus::NotStarted {
            return Err(SetError::RegistrationClosed);
        }
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            return Ok(id);
        }

        // push() refuses the 256th player, so the id never wraps.
        let id = PlayerId::new(self.players.player_count() as u8);
        self.players
            .push(Player::new(id, name.clone()))
            .ok_or(SetError::TooManyPlayers)?;
        self.names.insert(name.clone(), id);

        debug!(player = %id, %name, "player added");
        self.events.emit(GameEvent::PlayerAdded { player: id, name });
        Ok(id)
    }

    /// Replace the supply with `cards`, dealt first card first.
    pub fn load_cards(&mut self, cards: impl IntoIterator<Item = Card>) -> Result<()> {
        if self.status != GameStatus::NotStarted {
            return Err(SetError::GameStarted);
        }
        self.supply = Supply::from_cards(cards);
        debug!(cards = self.supply.len(), "supply loaded");
        Ok(())
    }

    /// Seed every player's timeout, fill the market and begin play.
    ///
    /// A supply that can never show a set finishes the game right here.
    pub fn start(&mut self) -> Result<()> {
        if self.status != GameStatus::NotStarted {
            return Err(SetError::AlreadyStarted);
        }
        self.status = GameStatus::InProgress;

        for player in self.players.values_mut() {
            let timeout = self.timeouts.next(Duration::ZERO, player);
            player.set_timeout(timeout);
        }
        if !self.paused {
            self.running_since = Some(self.clock.now());
        }

        info!(
            players = self.players.player_count(),
            supply = self.supply.len(),
            "game started"
        );
        self.events.emit(GameEvent::GameStarted);
        self.refill();
        Ok(())
    }

    // === Claims ===

    /// Claim the cards in `slots` for `player`.
    ///
    /// Errors leave the game untouched. Otherwise expired bans are lifted
    /// first, then the claim is ignored, taken or punished.
    pub fn attempt(&mut self, player: PlayerId, slots: [SlotIndex; 3]) -> Result<TakeOutcome> {
        if self.status != GameStatus::InProgress {
            return Err(SetError::NotInProgress);
        }
        if self.players.get(player).is_none() {
            return Err(SetError::UnknownPlayer(player));
        }
        let cards = self.market.check(slots)?;

        self.expire_bans();
        if self.players[player].is_banned() {
            debug!(%player, ?slots, "claim from banned player ignored");
            return Ok(TakeOutcome::Ignored);
        }

        if Card::forms_set(&cards) {
            self.take(player, slots)
        } else {
            Ok(self.ban(player))
        }
    }

    /// `attempt`, reduced to whether the set was taken.
    pub fn take_set(&mut self, player: PlayerId, slots: [SlotIndex; 3]) -> Result<bool> {
        self.attempt(player, slots).map(|outcome| outcome.is_taken())
    }

    /// Claim by card value rather than slot.
    pub fn take_cards(&mut self, player: PlayerId, cards: CardSet) -> Result<bool> {
        let slots = self.market.locate(&cards)?;
        self.take_set(player, slots)
    }

    /// Whether the cards in `slots` form a set. Changes nothing.
    pub fn check(&self, slots: [SlotIndex; 3]) -> Result<bool> {
        Ok(Card::forms_set(&self.market.check(slots)?))
    }

    fn take(&mut self, id: PlayerId, slots: [SlotIndex; 3]) -> Result<TakeOutcome> {
        let cards = self.market.pop_set(slots)?;

        let delta = self.scoring.on_take(&self.players[id]);
        let player = &mut self.players[id];
        player.record_take(cards, delta);
        if self.config.reset_timeout_on_take {
            let timeout = self.timeouts.next(Duration::ZERO, player);
            player.set_timeout(timeout);
        }
        let score = player.score();

        // Hint slots name the old solution.
        for player in self.players.values_mut() {
            player.clear_hints();
        }

        debug!(player = %id, ?slots, score, "set taken");
        self.events.emit(GameEvent::SetTaken {
            player: id,
            slots,
            cards,
        });
        self.refill();
        Ok(TakeOutcome::Taken(cards))
    }

    fn ban(&mut self, id: PlayerId) -> TakeOutcome {
        let now = self.clock.now();
        let delta = self.scoring.on_ban(&self.players[id]);

        let player = &mut self.players[id];
        let timeout = player.timeout();
        player.apply_ban(now + timeout, delta);
        let next = self.timeouts.next(timeout, player);
        player.set_timeout(next);

        debug!(player = %id, ?timeout, ?next, "player banned");
        self.events.emit(GameEvent::PlayerBanned {
            player: id,
            timeout,
        });
        TakeOutcome::Banned { timeout }
    }

    // === Bans ===

    /// Lift every ban that has run out. Returns the players unbanned.
    pub fn expire_bans(&mut self) -> Vec<PlayerId> {
        let now = self.clock.now();
        let lifted: Vec<PlayerId> = self
            .players
            .values_mut()
            .filter_map(|player| player.lift_ban_if_expired(now).then(|| player.id()))
            .collect();

        for &player in &lifted {
            debug!(%player, "player unbanned");
            self.events.emit(GameEvent::PlayerUnbanned { player });
        }
        lifted
    }

    /// Earliest clock reading at which a current ban runs out.
    #[must_use]
    pub fn next_unban_at(&self) -> Option<Duration> {
        self.players.values().filter_map(Player::banned_until).min()
    }

    // === Hints ===

    /// Reveal one more slot of the current solution to `player`.
    ///
    /// Returns false, changing nothing, when the market has no set or the
    /// player already knows all three slots.
    pub fn get_new_hint(&mut self, id: PlayerId) -> Result<bool> {
        let player = self.players.get(id).ok_or(SetError::UnknownPlayer(id))?;
        let Some(solution) = self.market.solution() else {
            return Ok(false);
        };

        let fresh: SmallVec<[SlotIndex; 3]> = solution
            .into_iter()
            .filter(|slot| !player.hint_slots().contains(slot))
            .collect();
        let Some(&slot) = rng::choose(&fresh, &mut *self.rng) else {
            return Ok(false);
        };
        let Some(card) = self.market.get(slot) else {
            return Ok(false);
        };

        let delta = self.scoring.on_hint(player);
        self.players[id].add_hint(slot, delta);

        debug!(player = %id, slot, %card, "hint given");
        self.events.emit(GameEvent::HintGiven {
            player: id,
            slot,
            card,
        });
        Ok(true)
    }

    /// Cards behind the hints `player` holds, in the order revealed.
    pub fn hint_cards(&self, id: PlayerId) -> Result<SmallVec<[Card; 3]>> {
        let player = self.players.get(id).ok_or(SetError::UnknownPlayer(id))?;
        Ok(player
            .hint_slots()
            .iter()
            .filter_map(|&slot| self.market.get(slot))
            .collect())
    }

    // === Market upkeep ===

    fn refill(&mut self) {
        while !self.supply.is_empty() && !self.market.is_full() {
            let drawn = self.supply.draw(self.config.market_increase);
            self.market.push_cards(drawn);
        }
        debug_assert!(self.supply.is_empty() || self.market.is_full());

        if self.is_done() {
            self.finish();
        } else {
            let present = self.market.present_count();
            let supply_remaining = self.supply.len();
            debug!(present, supply_remaining, "market filled");
            self.events.emit(GameEvent::MarketFilled {
                present,
                supply_remaining,
            });
        }
    }

    /// Close the gaps left by taken sets.
    ///
    /// Cards shift to lower slots, so outstanding hints are dropped.
    pub fn compact_market(&mut self) {
        self.market.clean_up();
        for player in self.players.values_mut() {
            player.clear_hints();
        }
        debug!(slots = self.market.len(), "market compacted");
    }

    // === Termination ===

    /// No cards left to deal and no set on the table.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.supply.is_empty() && !self.market.is_playable()
    }

    fn finish(&mut self) {
        if self.status != GameStatus::InProgress {
            return;
        }
        self.bank_running_time();
        self.status = GameStatus::Finished;

        let winners = self.winners();
        info!(?winners, elapsed = ?self.played, "game finished");
        self.events.emit(GameEvent::GameFinished { winners });
    }

    /// Highest score, if anyone is playing.
    #[must_use]
    pub fn max_score(&self) -> Option<i64> {
        self.players.values().map(Player::score).max()
    }

    /// Every player holding the highest score.
    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        let Some(best) = self.max_score() else {
            return Vec::new();
        };
        self.players
            .values()
            .filter(|player| player.score() == best)
            .map(Player::id)
            .collect()
    }

    /// Scores in registration order.
    #[must_use]
    pub fn scores(&self) -> Vec<(PlayerId, i64)> {
        self.players
            .values()
            .map(|player| (player.id(), player.score()))
            .collect()
    }

    // === Playing time ===

    /// Stop the playing-time counter. Idempotent.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.bank_running_time();
        debug!(elapsed = ?self.played, "game paused");
    }

    /// Restart the playing-time counter. Idempotent.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if self.status == GameStatus::InProgress {
            self.running_since = Some(self.clock.now());
        }
        debug!(elapsed = ?self.played, "game resumed");
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Time played: from the start, minus pauses, frozen at the finish.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        let running = self
            .running_since
            .map_or(Duration::ZERO, |since| self.clock.now().saturating_sub(since));
        self.played + running
    }

    fn bank_running_time(&mut self) {
        if let Some(since) = self.running_since.take() {
            self.played += self.clock.now().saturating_sub(since);
        }
    }

    // === Queries ===

    #[must_use]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == GameStatus::InProgress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.status == GameStatus::Finished
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn market(&self) -> &Market {
        &self.market
    }

    #[must_use]
    pub fn supply_remaining(&self) -> usize {
        self.supply.len()
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Id registered under `name`.
    #[must_use]
    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.names.get(name).copied()
    }

    /// Players in registration order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            status: self.status,
            market: self.market.slots().clone(),
            players: self.players.values().cloned().collect(),
            supply_remaining: self.supply.len(),
            elapsed: self.elapsed(),
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("status", &self.status)
            .field("market", &self.market)
            .field("supply_remaining", &self.supply.len())
            .field("players", &self.players)
            .finish_non_exhaustive()
    }
}
