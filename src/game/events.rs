//! Observable game events.
//!
//! Each `Game` owns its own `EventBus`. Subscribers get an unbounded Tokio
//! receiver; the game never blocks on them and forgets receivers that have
//! been dropped. Sending needs no runtime, so purely synchronous hosts can
//! drain with `try_recv`.
//!
//! Events arrive in the order they happen:
//!
//! ```text
//! PlayerAdded* → GameStarted → MarketFilled
//!   → (SetTaken → MarketFilled | PlayerBanned | PlayerUnbanned | HintGiven)*
//!   → GameFinished
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::warn;

use crate::cards::{Card, CardSet};
use crate::core::PlayerId;
use crate::market::SlotIndex;

/// Receiving end of a game's event stream.
pub type EventReceiver = UnboundedReceiver<GameEvent>;

/// Something observable that happened in a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayerAdded {
        player: PlayerId,
        name: String,
    },
    GameStarted,
    /// The market was (re)filled and play continues.
    MarketFilled {
        present: usize,
        supply_remaining: usize,
    },
    SetTaken {
        player: PlayerId,
        slots: [SlotIndex; 3],
        cards: CardSet,
    },
    PlayerBanned {
        player: PlayerId,
        timeout: Duration,
    },
    PlayerUnbanned {
        player: PlayerId,
    },
    HintGiven {
        player: PlayerId,
        slot: SlotIndex,
        card: Card,
    },
    /// Terminal; sent exactly once.
    GameFinished {
        winners: Vec<PlayerId>,
    },
}

impl GameEvent {
    /// The player this event concerns, if any.
    #[must_use]
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            GameEvent::PlayerAdded { player, .. }
            | GameEvent::SetTaken { player, .. }
            | GameEvent::PlayerBanned { player, .. }
            | GameEvent::PlayerUnbanned { player }
            | GameEvent::HintGiven { player, .. } => Some(*player),
            GameEvent::GameStarted
            | GameEvent::MarketFilled { .. }
            | GameEvent::GameFinished { .. } => None,
        }
    }
}

/// Fan-out of events to every live subscriber.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<UnboundedSender<GameEvent>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. It sees events from now on.
    pub fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Deliver `event` to every subscriber, dropping closed ones.
    pub fn emit(&mut self, event: GameEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            warn!(dropped, "event subscribers went away");
        }
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_subscriber_sees_event() {
        let mut bus = EventBus::new();
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.emit(GameEvent::GameStarted);

        assert_eq!(a.try_recv().unwrap(), GameEvent::GameStarted);
        assert_eq!(b.try_recv().unwrap(), GameEvent::GameStarted);
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let mut bus = EventBus::new();
        bus.emit(GameEvent::GameStarted);
        let mut late = bus.subscribe();
        assert!(late.try_recv().is_err());
    }

    #[test]
    fn test_dropped_subscriber_is_forgotten() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.emit(GameEvent::GameStarted);

        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn test_event_player() {
        let p = PlayerId::new(2);
        assert_eq!(GameEvent::PlayerUnbanned { player: p }.player(), Some(p));
        assert_eq!(GameEvent::GameStarted.player(), None);
    }

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::PlayerBanned {
            player: PlayerId::new(1),
            timeout: Duration::from_millis(1500),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
