//! Cloneable façade for observing and steering a running combat.
//!
//! [`CombatHandle`] hides channel plumbing: it streams events from specific
//! topics and carries the exit request to the orchestrator.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};

use crate::events::{Event, EventBus, Topic};

/// Client-facing handle to interact with a combat
#[derive(Clone, Debug)]
pub struct CombatHandle {
    event_bus: EventBus,
    exit_tx: Arc<watch::Sender<bool>>,
}

impl CombatHandle {
    pub(crate) fn new(event_bus: EventBus) -> Self {
        let (exit_tx, _exit_rx) = watch::channel(false);
        Self {
            event_bus,
            exit_tx: Arc::new(exit_tx),
        }
    }

    /// Ask the combat to leave for its exit destination.
    ///
    /// The request is honored between a commit and the next time advance,
    /// never in the middle of an action.
    pub fn request_exit(&self) {
        self.exit_tx.send_replace(true);
    }

    pub fn exit_requested(&self) -> bool {
        *self.exit_tx.borrow()
    }

    /// Resolves once an exit has been requested through any clone.
    pub async fn exit_signal(&self) {
        let mut exit_rx = self.exit_tx.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = exit_rx.wait_for(|requested| *requested).await;
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Turn` - Turn started, combat ended
    /// - `Topic::State` - Resolved actions, save requests, rejected choices
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
