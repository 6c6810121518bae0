//! A game shared between tasks, with timed unbans.
//!
//! `Game` lifts bans lazily, on the next claim or `expire_bans` call. When
//! a host needs `PlayerUnbanned` to arrive on time with no other activity,
//! it wraps the game in a `SharedGame`. Every ban then schedules a Tokio
//! timer that wakes when the ban runs out and lifts it.
//!
//! Timers sleep on Tokio time, so pair this with `TokioClock`. Timers hold
//! only a weak reference to the game and are aborted once it finishes or
//! the last handle is dropped.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::debug;

use super::events::EventReceiver;
use super::game::{Game, GameSnapshot, TakeOutcome};
use crate::cards::CardSet;
use crate::core::PlayerId;
use crate::error::Result;
use crate::market::SlotIndex;

struct Inner {
    game: Mutex<Game>,
    timers: Mutex<JoinSet<()>>,
    runtime: Handle,
}

/// Cloneable handle to a game driven from several tasks.
#[derive(Clone)]
pub struct SharedGame {
    inner: Arc<Inner>,
}

impl SharedGame {
    /// Wrap `game`, scheduling timers on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn new(game: Game) -> Self {
        Self::with_runtime(game, Handle::current())
    }

    /// Wrap `game`, scheduling timers on `runtime`.
    #[must_use]
    pub fn with_runtime(game: Game, runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                game: Mutex::new(game),
                timers: Mutex::new(JoinSet::new()),
                runtime,
            }),
        }
    }

    /// Run `f` against the game while holding its lock.
    pub fn read<R>(&self, f: impl FnOnce(&Game) -> R) -> R {
        f(&*self.inner.game.lock())
    }

    pub fn subscribe(&self) -> EventReceiver {
        self.inner.game.lock().subscribe()
    }

    pub fn add_player(&self, name: impl Into<String>) -> Result<PlayerId> {
        self.inner.game.lock().add_player(name)
    }

    pub fn start(&self) -> Result<()> {
        let finished = {
            let mut game = self.inner.game.lock();
            game.start()?;
            game.is_finished()
        };
        self.settle_timers(None, finished);
        Ok(())
    }

    /// See `Game::attempt`. A ban also schedules its unban.
    pub fn attempt(&self, player: PlayerId, slots: [SlotIndex; 3]) -> Result<TakeOutcome> {
        let (outcome, finished) = {
            let mut game = self.inner.game.lock();
            let outcome = game.attempt(player, slots)?;
            (outcome, game.is_finished())
        };

        let ban = match outcome {
            TakeOutcome::Banned { timeout } => Some(timeout),
            _ => None,
        };
        self.settle_timers(ban, finished);
        Ok(outcome)
    }

    pub fn take_set(&self, player: PlayerId, slots: [SlotIndex; 3]) -> Result<bool> {
        self.attempt(player, slots).map(|outcome| outcome.is_taken())
    }

    pub fn take_cards(&self, player: PlayerId, cards: CardSet) -> Result<bool> {
        let slots = self.inner.game.lock().market().locate(&cards)?;
        self.take_set(player, slots)
    }

    pub fn get_new_hint(&self, player: PlayerId) -> Result<bool> {
        self.inner.game.lock().get_new_hint(player)
    }

    pub fn compact_market(&self) {
        self.inner.game.lock().compact_market();
    }

    pub fn pause(&self) {
        self.inner.game.lock().pause();
    }

    pub fn resume(&self) {
        self.inner.game.lock().resume();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.game.lock().is_finished()
    }

    #[must_use]
    pub fn winners(&self) -> Vec<PlayerId> {
        self.inner.game.lock().winners()
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.game.lock().snapshot()
    }

    /// Unban timers that have not fired yet.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        let mut timers = self.inner.timers.lock();
        while timers.try_join_next().is_some() {}
        timers.len()
    }

    fn settle_timers(&self, ban: Option<Duration>, finished: bool) {
        let mut timers = self.inner.timers.lock();
        while timers.try_join_next().is_some() {}

        if finished {
            // Dropping a JoinSet aborts everything in it.
            *timers = JoinSet::new();
            return;
        }
        if let Some(timeout) = ban {
            let game = Arc::downgrade(&self.inner);
            timers.spawn_on(unban_after(game, timeout), &self.inner.runtime);
            debug!(?timeout, pending = timers.len(), "unban scheduled");
        }
    }
}

async fn unban_after(game: Weak<Inner>, timeout: Duration) {
    tokio::time::sleep(timeout).await;
    if let Some(inner) = game.upgrade() {
        inner.game.lock().expire_bans();
    }
}

impl std::fmt::Debug for SharedGame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedGame")
            .field("game", &*self.inner.game.lock())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::core::TokioClock;
    use crate::game::GameEvent;
    use crate::players::TimeoutPolicy;

    fn hint_market() -> Vec<Card> {
        [57, 66, 57, 39, 3, 3, 12, 19].map(Card::make).to_vec()
    }

    fn shared() -> SharedGame {
        let game = Game::builder()
            .cards(hint_market())
            .clock(TokioClock::new())
            .timeouts(TimeoutPolicy::constant(Duration::from_secs(3)))
            .build();
        SharedGame::new(game)
    }

    #[tokio::test(start_paused = true)]
    async fn test_ban_lifts_without_activity() {
        let game = shared();
        let p = game.add_player("ada").unwrap();
        game.start().unwrap();
        let mut events = game.subscribe();

        game.attempt(p, [0, 1, 2]).unwrap();
        assert_eq!(game.pending_timers(), 1);

        tokio::time::sleep(Duration::from_millis(3001)).await;

        assert!(game.read(|g| !g.player(p).unwrap().is_banned()));
        assert_eq!(game.pending_timers(), 0);

        let seen: Vec<GameEvent> = std::iter::from_fn(|| events.try_recv().ok()).collect();
        assert_eq!(seen.last(), Some(&GameEvent::PlayerUnbanned { player: p }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_claims_ignored_until_timer_fires() {
        let game = shared();
        let p = game.add_player("ada").unwrap();
        game.start().unwrap();

        game.attempt(p, [0, 1, 2]).unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(game.attempt(p, [1, 3, 6]), Ok(TakeOutcome::Ignored));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(game.take_set(p, [1, 3, 6]).unwrap());
        assert!(game.is_finished());
    }
}
