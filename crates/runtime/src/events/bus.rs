//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use super::types::{StateEvent, TurnEvent};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Turn loop events (turn started, combat ended)
    Turn,
    /// Combat state changes (actions, save requests)
    State,
}

impl Topic {
    pub const ALL: [Topic; 2] = [Topic::Turn, Topic::State];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Turn(TurnEvent),
    State(StateEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Turn(_) => Topic::Turn,
            Event::State(_) => Topic::State,
        }
    }
}

impl From<TurnEvent> for Event {
    fn from(event: TurnEvent) -> Self {
        Event::Turn(event)
    }
}

impl From<StateEvent> for Event {
    fn from(event: StateEvent) -> Self {
        Event::State(event)
    }
}

#[derive(Debug)]
struct Channels {
    turn: broadcast::Sender<Event>,
    state: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front and never change.
#[derive(Clone, Debug)]
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
                turn: broadcast::channel(capacity).0,
                state: broadcast::channel(capacity).0,
            }),
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

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Turn => &self.channels.turn,
            Topic::State => &self.channels.state,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
