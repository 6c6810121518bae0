//! Pluggable scoring and ban-timeout rules.
//!
//! Both policies are closures over the player's current state, so variant
//! rules (hints cost a point, repeated mistakes double the ban) plug in
//! without touching the game loop.

use std::time::Duration;

use super::player::Player;

type ScoreFn = Box<dyn Fn(&Player) -> i64 + Send + Sync>;
type TimeoutFn = Box<dyn Fn(Duration, &Player) -> Duration + Send + Sync>;

/// Score deltas for the three scored events.
///
/// Defaults: +1 per set taken, 0 per hint, 0 per ban.
///
/// ```
/// use set_engine::players::ScoringPolicy;
///
/// // Hints cost half a set, mistakes cost a whole one.
/// let policy = ScoringPolicy::new()
///     .with_take(|_| 2)
///     .with_hint(|_| -1)
///     .with_ban(|_| -2);
/// # let _ = policy;
/// ```
pub struct ScoringPolicy {
    take: ScoreFn,
    hint: ScoreFn,
    ban: ScoreFn,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            take: Box::new(|_| 1),
            hint: Box::new(|_| 0),
            ban: Box::new(|_| 0),
        }
    }
}

impl ScoringPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta applied when a player takes a set.
    #[must_use]
    pub fn with_take(mut self, f: impl Fn(&Player) -> i64 + Send + Sync + 'static) -> Self {
        self.take = Box::new(f);
        self
    }

    /// Delta applied when a player receives a hint.
    #[must_use]
    pub fn with_hint(mut self, f: impl Fn(&Player) -> i64 + Send + Sync + 'static) -> Self {
        self.hint = Box::new(f);
        self
    }

    /// Delta applied when a player is banned.
    #[must_use]
    pub fn with_ban(mut self, f: impl Fn(&Player) -> i64 + Send + Sync + 'static) -> Self {
        self.ban = Box::new(f);
        self
    }

    pub(crate) fn on_take(&self, player: &Player) -> i64 {
        (self.take)(player)
    }

    pub(crate) fn on_hint(&self, player: &Player) -> i64 {
        (self.hint)(player)
    }

    pub(crate) fn on_ban(&self, player: &Player) -> i64 {
        (self.ban)(player)
    }
}

impl std::fmt::Debug for ScoringPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringPolicy").finish_non_exhaustive()
    }
}

/// Computes a player's next ban length from the previous one.
///
/// Called with `previous = 0` when the game starts, then after every ban
/// with the ban just served.
pub struct TimeoutPolicy {
    next: TimeoutFn,
}

impl Default for TimeoutPolicy {
    fn default() -> Self {
        Self::constant(Duration::from_secs(3))
    }
}

impl TimeoutPolicy {
    /// Arbitrary escalation rule.
    #[must_use]
    pub fn new(f: impl Fn(Duration, &Player) -> Duration + Send + Sync + 'static) -> Self {
        Self { next: Box::new(f) }
    }

    /// Every ban lasts `timeout`.
    #[must_use]
    pub fn constant(timeout: Duration) -> Self {
        Self::new(move |_, _| timeout)
    }

    /// First ban lasts `base`, each later one twice the previous.
    ///
    /// ```
    /// use std::time::Duration;
    /// use set_engine::players::TimeoutPolicy;
    ///
    /// let policy = TimeoutPolicy::doubling(Duration::from_millis(100));
    /// # let _ = policy;
    /// ```
    #[must_use]
    pub fn doubling(base: Duration) -> Self {
        Self::new(move |previous, _| {
            if previous.is_zero() {
                base
            } else {
                previous.saturating_mul(2)
            }
        })
    }

    pub(crate) fn next(&self, previous: Duration, player: &Player) -> Duration {
        (self.next)(previous, player)
    }
}

impl std::fmt::Debug for TimeoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeoutPolicy").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    fn player() -> Player {
        Player::new(PlayerId::new(0), "p".to_string())
    }

    #[test]
    fn test_default_scoring() {
        let policy = ScoringPolicy::default();
        let p = player();
        assert_eq!(policy.on_take(&p), 1);
        assert_eq!(policy.on_hint(&p), 0);
        assert_eq!(policy.on_ban(&p), 0);
    }

    #[test]
    fn test_scoring_sees_player_state() {
        let policy = ScoringPolicy::new().with_take(|p| 1 + p.taken_sets().len() as i64);
        let mut p = player();
        assert_eq!(policy.on_take(&p), 1);

        p.record_take([crate::cards::Card::make(0); 3], 1);
        assert_eq!(policy.on_take(&p), 2);
    }

    #[test]
    fn test_constant_timeout() {
        let policy = TimeoutPolicy::constant(Duration::from_millis(40));
        let p = player();
        assert_eq!(policy.next(Duration::ZERO, &p), Duration::from_millis(40));
        assert_eq!(policy.next(Duration::from_secs(9), &p), Duration::from_millis(40));
    }

    #[test]
    fn test_doubling_timeout() {
        let policy = TimeoutPolicy::doubling(Duration::from_millis(1));
        let p = player();

        let mut timeout = Duration::ZERO;
        let mut seen = Vec::new();
        for _ in 0..3 {
            timeout = policy.next(timeout, &p);
            seen.push(timeout.as_millis());
        }
        assert_eq!(seen, vec![1, 2, 4]);
    }
}
