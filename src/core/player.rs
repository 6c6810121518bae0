//! Player handles and the registry that backs them.
//!
//! ## PlayerId
//!
//! A `PlayerId` is the position at which a player registered: the first
//! player to join is `PlayerId(0)`. At most 255 players fit in one game.
//!
//! ## PlayerMap
//!
//! Registration-ordered storage indexed by `PlayerId`. Entries are only
//! ever appended, so an id handed out once stays valid for the life of the
//! map.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Registration-order handle for a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Position in registration order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Append-only per-player storage.
///
/// ```
/// use set_engine::core::{PlayerId, PlayerMap};
///
/// let mut scores: PlayerMap<i64> = PlayerMap::new();
/// let ada = scores.push(0).unwrap();
/// let bob = scores.push(3).unwrap();
///
/// scores[ada] += 1;
/// assert_eq!(scores[ada], 1);
/// assert_eq!(scores.get(bob), Some(&3));
/// assert_eq!(scores.get(PlayerId::new(9)), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    entries: Vec<T>,
}

impl<T> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PlayerMap<T> {
    /// Most players one map holds; ids are a single byte.
    pub const MAX_PLAYERS: usize = u8::MAX as usize;

    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register the next player. `None` once the map is full.
    pub fn push(&mut self, value: T) -> Option<PlayerId> {
        let id = u8::try_from(self.entries.len()).ok().filter(|&i| i < u8::MAX)?;
        self.entries.push(value);
        Some(PlayerId(id))
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for `player`, or `None` if that id was never handed out.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.entries.get(player.index())
    }

    /// Entries in registration order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.iter_mut()
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    /// Panics for an id this map never handed out.
    fn index(&self, player: PlayerId) -> &T {
        &self.entries[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.entries[player.index()]
    }
}
