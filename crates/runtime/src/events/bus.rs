//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{LifecycleEvent, RoundEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Battle creation, joins, and completion
    Lifecycle,
    /// Locked actions and resolved rounds
    Round,
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    Lifecycle(LifecycleEvent),
    Round(RoundEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Lifecycle(_) => Topic::Lifecycle,
            Event::Round(_) => Topic::Round,
        }
    }
}

impl From<LifecycleEvent> for Event {
    fn from(event: LifecycleEvent) -> Self {
        Event::Lifecycle(event)
    }
}

impl From<RoundEvent> for Event {
    fn from(event: RoundEvent) -> Self {
        Event::Round(event)
    }
}

struct Channels {
    lifecycle: broadcast::Sender<Event>,
    round: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                lifecycle: broadcast::channel(capacity).0,
                round: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Lifecycle => &self.channels.lifecycle,
            Topic::Round => &self.channels.round,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: impl Into<Event>) {
        let event = event.into();
        let topic = event.topic();

        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duel_core::{BattleId, PlayerId};

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut rounds = bus.subscribe(Topic::Round);
        let mut lifecycle = bus.subscribe(Topic::Lifecycle);

        bus.publish(LifecycleEvent::PlayerJoined {
            battle_id: BattleId::from("b"),
            player_id: PlayerId(2),
        });
        bus.publish(RoundEvent::ActionLocked {
            battle_id: BattleId::from("b"),
            round_number: 1,
            player_id: PlayerId(1),
        });

        assert_eq!(rounds.recv().await.unwrap().topic(), Topic::Round);
        assert_eq!(lifecycle.recv().await.unwrap().topic(), Topic::Lifecycle);
        assert!(rounds.try_recv().is_err());
    }

    #[test]
    fn publishing_without_subscribers_is_harmless() {
        let bus = EventBus::new();
        bus.publish(RoundEvent::ActionLocked {
            battle_id: BattleId::from("b"),
            round_number: 1,
            player_id: PlayerId(1),
        });
    }
}
