//! Per-player state.
//!
//! A `Player` is a record the game writes to. Callers can read every field,
//! but all mutation goes through the game: taking a set, being banned or
//! unbanned, receiving a hint.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::time::Duration;

use crate::cards::CardSet;
use crate::core::PlayerId;
use crate::market::SlotIndex;

/// Score, bans, hints and claimed sets of one participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    score: i64,
    taken: Vector<CardSet>,
    /// Clock reading at which the current ban ends.
    banned_until: Option<Duration>,
    timeout: Duration,
    /// Market slots of the current solution already revealed to this player.
    hints: SmallVec<[SlotIndex; 3]>,
    ban_count: u32,
    hint_count: u32,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            score: 0,
            taken: Vector::new(),
            banned_until: None,
            timeout: Duration::ZERO,
            hints: SmallVec::new(),
            ban_count: 0,
            hint_count: 0,
        }
    }

    // === Queries ===

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn score(&self) -> i64 {
        self.score
    }

    /// Sets claimed so far, oldest first.
    #[must_use]
    pub fn taken_sets(&self) -> &Vector<CardSet> {
        &self.taken
    }

    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.banned_until.is_some()
    }

    /// When the current ban lifts, on the game's clock.
    #[must_use]
    pub fn banned_until(&self) -> Option<Duration> {
        self.banned_until
    }

    /// Length of the next ban.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Slots of the current solution revealed to this player.
    #[must_use]
    pub fn hint_slots(&self) -> &[SlotIndex] {
        &self.hints
    }

    #[must_use]
    pub fn ban_count(&self) -> u32 {
        self.ban_count
    }

    #[must_use]
    pub fn hint_count(&self) -> u32 {
        self.hint_count
    }

    // === Game-driven updates ===

    pub(crate) fn record_take(&mut self, set: CardSet, delta: i64) {
        self.taken.push_back(set);
        self.score += delta;
    }

    pub(crate) fn apply_ban(&mut self, until: Duration, delta: i64) {
        self.banned_until = Some(until);
        self.ban_count += 1;
        self.score += delta;
    }

    /// Lift the ban if it has run out by `now`. Returns true if lifted.
    pub(crate) fn lift_ban_if_expired(&mut self, now: Duration) -> bool {
        match self.banned_until {
            Some(until) if until <= now => {
                self.banned_until = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub(crate) fn add_hint(&mut self, slot: SlotIndex, delta: i64) {
        self.hints.push(slot);
        self.hint_count += 1;
        self.score += delta;
    }

    pub(crate) fn clear_hints(&mut self) {
        self.hints.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;

    fn player() -> Player {
        Player::new(PlayerId::new(0), "ada".to_string())
    }

    #[test]
    fn test_new_player_is_clean() {
        let p = player();
        assert_eq!(p.name(), "ada");
        assert_eq!(p.score(), 0);
        assert!(p.taken_sets().is_empty());
        assert!(!p.is_banned());
        assert!(p.hint_slots().is_empty());
        assert_eq!(p.ban_count(), 0);
        assert_eq!(p.hint_count(), 0);
    }

    #[test]
    fn test_record_take() {
        let mut p = player();
        let set = [Card::make(0), Card::make(1), Card::make(2)];
        p.record_take(set, 1);

        assert_eq!(p.score(), 1);
        assert_eq!(p.taken_sets().len(), 1);
        assert_eq!(p.taken_sets()[0], set);
    }

    #[test]
    fn test_ban_lifts_only_after_expiry() {
        let mut p = player();
        p.apply_ban(Duration::from_secs(5), -1);

        assert!(p.is_banned());
        assert_eq!(p.ban_count(), 1);
        assert_eq!(p.score(), -1);

        assert!(!p.lift_ban_if_expired(Duration::from_secs(4)));
        assert!(p.is_banned());

        assert!(p.lift_ban_if_expired(Duration::from_secs(5)));
        assert!(!p.is_banned());
        assert!(!p.lift_ban_if_expired(Duration::from_secs(6)));
    }

    #[test]
    fn test_hints_clear_but_count_stays() {
        let mut p = player();
        p.add_hint(3, 0);
        p.add_hint(7, 0);
        assert_eq!(p.hint_slots(), &[3, 7]);

        p.clear_hints();
        assert!(p.hint_slots().is_empty());
        assert_eq!(p.hint_count(), 2);
    }
}
